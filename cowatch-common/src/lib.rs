//! # Cowatch Common Library
//!
//! Shared vocabulary for the cowatch client and any embedding transport:
//! - Wire protocol types (message envelope, client and authority messages)
//! - Domain identifiers (video ids, session ids)
//! - Queue and roster payload records
//! - Video URL to video id extraction

pub mod error;
pub mod protocol;
pub mod video_id;

pub use error::{Error, Result};
pub use protocol::{
    ClientMessage, Direction, Envelope, Participant, QueueEntry, ServerMessage, SessionId, VideoId,
};
pub use video_id::extract_video_id;
