//! Media surface abstraction
//!
//! The embedded video player sits behind [`MediaSurface`]. Commands are
//! fire-and-forget: issuing one never reports whether playback actually
//! changed. The surface speaks back asynchronously through
//! [`SurfaceEvent`]s, which the embedder feeds into the session input
//! queue. The reconciler treats those notifications as the only truth
//! about what the player is doing.

use crate::error::Result;
use cowatch_common::VideoId;

/// Playback states a surface can report
///
/// Implementations map their player's vocabulary onto these four and do
/// not forward anything else (cue/unstarted states carry no meaning
/// here).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceState {
    Playing,
    Paused,
    Buffering,
    Ended,
}

/// Asynchronous notifications from the media surface
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    /// The player finished initializing and accepts commands from now on
    Ready,

    /// The player entered a new playback state
    StateChanged(SurfaceState),

    /// The player hit a media error (bad id, undecodable stream, ...)
    Error { message: String },
}

/// Command interface to the embedded video player
///
/// `load` begins playback from `start` once enough data is buffered, the
/// usual embedded-player semantics. Commands issued before [`is_ready`]
/// returns true may be silently lost, which is why callers check
/// readiness first.
///
/// [`is_ready`]: MediaSurface::is_ready
pub trait MediaSurface: Send + Sync {
    /// Whether the player has initialized and accepts commands
    fn is_ready(&self) -> bool;

    /// Load `video` and begin playback from `start` seconds
    fn load(&self, video: &VideoId, start: f64) -> Result<()>;

    /// Resume or start playback of the loaded video
    fn play(&self) -> Result<()>;

    /// Pause playback, keeping the loaded video
    fn pause(&self) -> Result<()>;

    /// Jump to `time` seconds within the loaded video
    fn seek(&self, time: f64) -> Result<()>;

    /// Id of the currently loaded video, if any
    fn current_video(&self) -> Option<VideoId>;

    /// Current playback position in seconds, if the player can report it
    fn current_time(&self) -> Option<f64>;
}
