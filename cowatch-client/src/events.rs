//! Session event vocabulary
//!
//! Everything the session consumes arrives as a [`SessionInput`] on one
//! queue; everything observers see leaves as a [`SessionUpdate`] on the
//! broadcast channel. Updates serialize cleanly so an embedder can
//! forward them over whatever boundary its UI lives behind.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::bus::BusEvent;
use crate::identity::RosterEntry;
use crate::queue_view::QueueRow;
use crate::surface::SurfaceEvent;
use cowatch_common::{Direction, VideoId};

/// Everything the session task consumes, in arrival order
#[derive(Debug, Clone)]
pub enum SessionInput {
    /// Notification from the media surface
    Surface(SurfaceEvent),

    /// Transport lifecycle or authority message
    Bus(BusEvent),

    /// User gesture forwarded by the embedding UI
    Gesture(UserGesture),
}

/// Gestures the embedding UI forwards
///
/// Raw text inputs are validated here, not in the UI.
#[derive(Debug, Clone)]
pub enum UserGesture {
    /// Claim a display name
    SetName(String),

    /// Submit a video URL for the queue
    SubmitVideo(String),

    /// Move a queue entry one step up or down
    ReorderVideo { video: VideoId, direction: Direction },

    /// Remove a queue entry
    RemoveVideo { video: VideoId },
}

/// Origin of a user-visible notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// Local input validation failed; show inline, nothing was sent
    Validation,

    /// The authority rejected a request or reported a fault
    Authority,
}

/// Updates broadcast to session observers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionUpdate {
    /// Fresh queue render replacing the previous one
    Queue { rows: Vec<QueueRow> },

    /// Fresh roster render replacing the previous one
    Roster { entries: Vec<RosterEntry> },

    /// Authority suggested a default display name; offer it to the
    /// user, it is not claimed
    NameSuggested { name: String },

    /// A video submission passed validation and went out; the UI can
    /// clear its input field
    SubmissionAccepted,

    /// User-visible notice
    Notice { kind: NoticeKind, message: String },

    /// Transport connectivity changed
    Connection {
        connected: bool,
        /// When the change was observed, for diagnostics
        at: DateTime<Utc>,
    },
}
