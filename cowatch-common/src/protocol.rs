//! Wire protocol between the client and the session authority
//!
//! Every message on the wire is a named event plus a JSON payload. The
//! authority is the single source of truth: clients report local facts
//! (`sync_play`, `video_ended`, ...) and request changes (`add_video`,
//! `reorder_video`, ...), then apply whatever the authority broadcasts
//! back. Event names and payload key spellings here are the wire contract
//! and must not drift.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::{Error, Result};

/// Identifier of a video, as issued by the video platform (11 characters)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VideoId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Identifier of a connected participant, issued by the authority per connection
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One entry of the shared queue, as carried by `update_queue` snapshots
///
/// Entries only ever arrive inside a full snapshot; the client never
/// patches them individually. The authority may attach extra bookkeeping
/// keys (e.g. the submitter's connection id); those are ignored here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    /// Video identifier
    pub id: VideoId,

    /// Display title resolved by the authority
    pub title: String,

    /// Display name of the participant who submitted the video.
    /// May be absent in older snapshots; renders as "Unknown" then.
    #[serde(default)]
    pub added_by_name: String,
}

/// One participant in the roster, as carried by `update_user_list` snapshots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Connection id issued by the authority
    pub id: SessionId,

    /// Current display name (authority-assigned default until claimed)
    pub name: String,
}

/// Queue reorder direction, one step at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

/// Messages the client sends to the authority
///
/// Serialized form is the wire envelope itself:
/// `{"event": "<name>", "data": <payload>}`, with the data key absent for
/// payload-less messages. Playback reports state facts; queue messages
/// are requests the authority answers with fresh snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Claim a display name for this connection
    SetName { name: String },

    /// Local playback genuinely started or resumed at `time` seconds
    SyncPlay { time: f64 },

    /// Local playback genuinely paused
    SyncPause,

    /// The current video played to its end
    VideoEnded,

    /// Ask the authority to append a video to the shared queue
    AddVideo {
        #[serde(rename = "videoId")]
        video_id: VideoId,
    },

    /// Ask the authority to move a queue entry one step up or down
    ReorderVideo {
        #[serde(rename = "videoId")]
        video_id: VideoId,
        direction: Direction,
    },

    /// Ask the authority to remove a queue entry
    RemoveVideo {
        #[serde(rename = "videoId")]
        video_id: VideoId,
    },
}

impl ClientMessage {
    /// Wire event name for this message
    pub fn event_name(&self) -> &'static str {
        match self {
            ClientMessage::SetName { .. } => "set_name",
            ClientMessage::SyncPlay { .. } => "sync_play",
            ClientMessage::SyncPause => "sync_pause",
            ClientMessage::VideoEnded => "video_ended",
            ClientMessage::AddVideo { .. } => "add_video",
            ClientMessage::ReorderVideo { .. } => "reorder_video",
            ClientMessage::RemoveVideo { .. } => "remove_video",
        }
    }

    /// Split into an (event name, payload) envelope for transports that
    /// frame the two separately
    pub fn to_envelope(&self) -> Result<Envelope> {
        let value = serde_json::to_value(self)?;
        Ok(serde_json::from_value(value)?)
    }
}

/// Messages the authority broadcasts to clients
///
/// Queue and roster messages are full snapshots replacing all prior
/// state; playback messages command the local player. The authority
/// sends the current queue and playback position to every client on
/// connect, so a (re)connecting client only waits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Authority-assigned default display name for this connection
    AssignDefaultName { name: String },

    /// Full roster replacement
    UpdateUserList(Vec<Participant>),

    /// Load (or seek within) a video and play from `time` seconds
    PlayVideoAtTime {
        #[serde(rename = "videoId")]
        video_id: VideoId,
        time: f64,
    },

    /// Pause local playback
    PauseVideo,

    /// Load a video and play it from the start
    PlayVideo {
        #[serde(rename = "videoId")]
        video_id: VideoId,
    },

    /// Full queue replacement
    UpdateQueue(Vec<QueueEntry>),

    /// Authority rejected a request or hit a fault
    Error { message: String },
}

impl ServerMessage {
    /// Every event name the client understands, in wire spelling
    pub const EVENT_NAMES: &'static [&'static str] = &[
        "assign_default_name",
        "update_user_list",
        "play_video_at_time",
        "pause_video",
        "play_video",
        "update_queue",
        "error",
    ];
}

/// Transport-neutral frame: event name plus raw JSON payload
///
/// Transports hand inbound traffic to the session in this form so that
/// payload decoding (and its failure handling) stays in one place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Wire event name
    pub event: String,

    /// Raw payload; `Null` when the event carries none
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub data: Value,
}

impl Envelope {
    pub fn new(event: impl Into<String>, data: Value) -> Self {
        Self {
            event: event.into(),
            data,
        }
    }

    /// Decode into a typed authority message
    ///
    /// Distinguishes unknown event names from known events with payloads
    /// of the wrong shape, so callers can log them at different levels.
    pub fn decode(&self) -> Result<ServerMessage> {
        if !ServerMessage::EVENT_NAMES.contains(&self.event.as_str()) {
            return Err(Error::UnknownEvent(self.event.clone()));
        }

        serde_json::from_value(serde_json::json!({
            "event": self.event,
            "data": self.data,
        }))
        .map_err(|source| Error::MalformedPayload {
            event: self.event.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sync_play_wire_shape() {
        let msg = ClientMessage::SyncPlay { time: 12.5 };
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value, json!({"event": "sync_play", "data": {"time": 12.5}}));
    }

    #[test]
    fn payload_less_messages_omit_data() {
        let value = serde_json::to_value(&ClientMessage::SyncPause).unwrap();
        assert_eq!(value, json!({"event": "sync_pause"}));

        let value = serde_json::to_value(&ClientMessage::VideoEnded).unwrap();
        assert_eq!(value, json!({"event": "video_ended"}));
    }

    #[test]
    fn queue_requests_use_camel_case_video_key() {
        let value = serde_json::to_value(&ClientMessage::AddVideo {
            video_id: VideoId::from("dQw4w9WgXcQ"),
        })
        .unwrap();
        assert_eq!(
            value,
            json!({"event": "add_video", "data": {"videoId": "dQw4w9WgXcQ"}})
        );

        let value = serde_json::to_value(&ClientMessage::ReorderVideo {
            video_id: VideoId::from("dQw4w9WgXcQ"),
            direction: Direction::Down,
        })
        .unwrap();
        assert_eq!(
            value,
            json!({
                "event": "reorder_video",
                "data": {"videoId": "dQw4w9WgXcQ", "direction": "down"}
            })
        );
    }

    #[test]
    fn to_envelope_splits_name_and_payload() {
        let envelope = ClientMessage::SetName {
            name: "Ada".to_string(),
        }
        .to_envelope()
        .unwrap();

        assert_eq!(envelope.event, "set_name");
        assert_eq!(envelope.data, json!({"name": "Ada"}));
    }

    #[test]
    fn decode_play_video_at_time() {
        let envelope = Envelope::new(
            "play_video_at_time",
            json!({"videoId": "dQw4w9WgXcQ", "time": 42.5}),
        );

        let msg = envelope.decode().unwrap();
        assert_eq!(
            msg,
            ServerMessage::PlayVideoAtTime {
                video_id: VideoId::from("dQw4w9WgXcQ"),
                time: 42.5,
            }
        );
    }

    #[test]
    fn decode_pause_without_payload() {
        let envelope = Envelope::new("pause_video", Value::Null);
        assert_eq!(envelope.decode().unwrap(), ServerMessage::PauseVideo);
    }

    #[test]
    fn decode_queue_snapshot_ignores_extra_keys() {
        let envelope = Envelope::new(
            "update_queue",
            json!([
                {"id": "dQw4w9WgXcQ", "title": "First", "added_by_name": "Ada", "added_by_id": "s1"},
                {"id": "aqz-KE-bpKQ", "title": "Second"}
            ]),
        );

        let msg = envelope.decode().unwrap();
        let ServerMessage::UpdateQueue(entries) = msg else {
            panic!("expected queue snapshot");
        };
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].added_by_name, "Ada");
        // Missing attribution deserializes as empty, not as an error
        assert_eq!(entries[1].added_by_name, "");
    }

    #[test]
    fn decode_rejects_unknown_event() {
        let envelope = Envelope::new("rewind_tape", Value::Null);
        match envelope.decode() {
            Err(Error::UnknownEvent(event)) => assert_eq!(event, "rewind_tape"),
            other => panic!("expected UnknownEvent, got {:?}", other),
        }
    }

    #[test]
    fn decode_rejects_malformed_queue_payload() {
        let envelope = Envelope::new("update_queue", json!({"current": "dQw4w9WgXcQ"}));
        match envelope.decode() {
            Err(Error::MalformedPayload { event, .. }) => assert_eq!(event, "update_queue"),
            other => panic!("expected MalformedPayload, got {:?}", other),
        }
    }

    #[test]
    fn envelope_round_trips_through_json() {
        let envelope = Envelope::new("play_video", json!({"videoId": "dQw4w9WgXcQ"}));
        let text = serde_json::to_string(&envelope).unwrap();
        let back: Envelope = serde_json::from_str(&text).unwrap();
        assert_eq!(back, envelope);
    }
}
