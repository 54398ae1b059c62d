//! Video URL to video id extraction
//!
//! Accepts the common URL shapes users paste (standard watch URLs, short
//! links, embed URLs, `/v/` paths, and any URL carrying a `v=` query
//! parameter) and extracts the 11-character video id. Anything else is
//! rejected; the queue only ever stores canonical ids.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::protocol::VideoId;

/// One pattern covering all accepted URL shapes. The capture group is
/// the 11-character id itself.
static VIDEO_ID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:https?://)?(?:www\.)?(?:youtube\.com/(?:[^/\n\s]+/\S+/|(?:v|e(?:mbed)?)/|\S*?[?&]v=)|youtu\.be/)([a-zA-Z0-9_-]{11})",
    )
    .expect("video id pattern is valid")
});

/// Extract the canonical video id from pasted user input
///
/// Returns `None` when the input contains no recognizable video URL,
/// including bare ids without a host (the queue accepts URLs only).
pub fn extract_video_id(input: &str) -> Option<VideoId> {
    VIDEO_ID_PATTERN
        .captures(input.trim())
        .and_then(|captures| captures.get(1))
        .map(|id| VideoId::new(id.as_str()))
}
