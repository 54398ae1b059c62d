//! Queue snapshot rendering and gestures
//!
//! The queue is never mutated locally. Every change is a request to the
//! authority, answered by a fresh full snapshot, and rendering is
//! wholesale: rows are recomputed from the snapshot each time. Move
//! affordances are disabled at the edges so impossible moves cannot be
//! gestured in the first place.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use cowatch_common::{extract_video_id, ClientMessage, Direction, QueueEntry, VideoId};

/// Attribution shown when a snapshot entry carries no submitter name
const UNKNOWN_SUBMITTER: &str = "Unknown";

/// One renderable queue row with its gesture affordances
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueRow {
    /// Snapshot entry backing this row
    pub entry: QueueEntry,

    /// Move-up affordance; disabled on the first row
    pub can_move_up: bool,

    /// Move-down affordance; disabled on the last row
    pub can_move_down: bool,

    /// Thumbnail image URL derived from the video id
    pub thumbnail_url: String,

    /// Submitter attribution, "Unknown" when the snapshot has none
    pub added_by: String,
}

/// Renders authoritative queue snapshots and validates queue gestures
#[derive(Debug, Default)]
pub struct QueueView {
    rows: Vec<QueueRow>,
}

impl QueueView {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Currently rendered rows
    pub fn rows(&self) -> &[QueueRow] {
        &self.rows
    }

    /// Replace the render with a fresh snapshot, returning the new rows
    pub fn apply_snapshot(&mut self, entries: Vec<QueueEntry>) -> Vec<QueueRow> {
        let count = entries.len();

        self.rows = entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                let added_by = if entry.added_by_name.is_empty() {
                    UNKNOWN_SUBMITTER.to_string()
                } else {
                    entry.added_by_name.clone()
                };

                QueueRow {
                    thumbnail_url: thumbnail_url(&entry.id),
                    can_move_up: index > 0,
                    can_move_down: index + 1 < count,
                    added_by,
                    entry,
                }
            })
            .collect();

        debug!("Rendered queue snapshot: {} entries", count);
        self.rows.clone()
    }

    /// Validate a reorder gesture against the rendered affordances
    ///
    /// `None` means the gesture names a row that is not rendered or an
    /// affordance that is disabled; the control the user would press does
    /// not exist, so nothing is sent.
    pub fn reorder_request(&self, video: &VideoId, direction: Direction) -> Option<ClientMessage> {
        let row = self.rows.iter().find(|row| &row.entry.id == video)?;

        let enabled = match direction {
            Direction::Up => row.can_move_up,
            Direction::Down => row.can_move_down,
        };
        if !enabled {
            debug!(
                "Ignoring {} reorder of {}: affordance disabled",
                direction.as_str(),
                video
            );
            return None;
        }

        Some(ClientMessage::ReorderVideo {
            video_id: video.clone(),
            direction,
        })
    }

    /// Validate a remove gesture; `None` when the row is not rendered
    pub fn remove_request(&self, video: &VideoId) -> Option<ClientMessage> {
        if !self.rows.iter().any(|row| &row.entry.id == video) {
            debug!("Ignoring removal of {}: not in rendered queue", video);
            return None;
        }

        Some(ClientMessage::RemoveVideo {
            video_id: video.clone(),
        })
    }
}

/// Build a submission request from raw user input
///
/// Rejections carry user-facing text; nothing reaches the wire unless a
/// video id was extracted.
pub fn add_request(input: &str) -> Result<ClientMessage> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidInput("Please enter a video URL.".to_string()));
    }

    match extract_video_id(trimmed) {
        Some(video_id) => Ok(ClientMessage::AddVideo { video_id }),
        None => Err(Error::InvalidInput(
            "Could not find a video id in that URL.".to_string(),
        )),
    }
}

fn thumbnail_url(video: &VideoId) -> String {
    format!("https://img.youtube.com/vi/{}/mqdefault.jpg", video)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, added_by: &str) -> QueueEntry {
        QueueEntry {
            id: VideoId::from(id),
            title: format!("Title for {}", id),
            added_by_name: added_by.to_string(),
        }
    }

    #[test]
    fn sole_entry_has_both_moves_disabled() {
        let mut view = QueueView::new();
        let rows = view.apply_snapshot(vec![entry("aaaaaaaaaaa", "Ada")]);

        assert_eq!(rows.len(), 1);
        assert!(!rows[0].can_move_up);
        assert!(!rows[0].can_move_down);
    }

    #[test]
    fn edges_disable_exactly_one_affordance_each() {
        let mut view = QueueView::new();
        let rows = view.apply_snapshot(vec![
            entry("aaaaaaaaaaa", "Ada"),
            entry("bbbbbbbbbbb", "Grace"),
            entry("ccccccccccc", "Edsger"),
        ]);

        assert!(!rows[0].can_move_up);
        assert!(rows[0].can_move_down);

        assert!(rows[1].can_move_up);
        assert!(rows[1].can_move_down);

        assert!(rows[2].can_move_up);
        assert!(!rows[2].can_move_down);
    }

    #[test]
    fn snapshot_replaces_previous_render_wholesale() {
        let mut view = QueueView::new();
        view.apply_snapshot(vec![
            entry("aaaaaaaaaaa", "Ada"),
            entry("bbbbbbbbbbb", "Grace"),
        ]);
        let rows = view.apply_snapshot(vec![entry("ccccccccccc", "Edsger")]);

        assert_eq!(rows.len(), 1);
        assert_eq!(view.rows().len(), 1);
        assert_eq!(view.rows()[0].entry.id, VideoId::from("ccccccccccc"));
    }

    #[test]
    fn missing_attribution_renders_as_unknown() {
        let mut view = QueueView::new();
        let rows = view.apply_snapshot(vec![entry("aaaaaaaaaaa", "")]);

        assert_eq!(rows[0].added_by, "Unknown");
    }

    #[test]
    fn thumbnail_is_derived_from_the_video_id() {
        let mut view = QueueView::new();
        let rows = view.apply_snapshot(vec![entry("dQw4w9WgXcQ", "Ada")]);

        assert_eq!(
            rows[0].thumbnail_url,
            "https://img.youtube.com/vi/dQw4w9WgXcQ/mqdefault.jpg"
        );
    }

    #[test]
    fn reorder_respects_disabled_affordances() {
        let mut view = QueueView::new();
        view.apply_snapshot(vec![
            entry("aaaaaaaaaaa", "Ada"),
            entry("bbbbbbbbbbb", "Grace"),
        ]);

        let first = VideoId::from("aaaaaaaaaaa");
        assert_eq!(view.reorder_request(&first, Direction::Up), None);
        assert_eq!(
            view.reorder_request(&first, Direction::Down),
            Some(ClientMessage::ReorderVideo {
                video_id: first.clone(),
                direction: Direction::Down,
            })
        );

        let last = VideoId::from("bbbbbbbbbbb");
        assert_eq!(view.reorder_request(&last, Direction::Down), None);
    }

    #[test]
    fn gestures_on_unrendered_rows_are_ignored() {
        let mut view = QueueView::new();
        view.apply_snapshot(vec![entry("aaaaaaaaaaa", "Ada")]);

        let absent = VideoId::from("zzzzzzzzzzz");
        assert_eq!(view.reorder_request(&absent, Direction::Down), None);
        assert_eq!(view.remove_request(&absent), None);
    }

    #[test]
    fn remove_is_available_on_every_rendered_row() {
        let mut view = QueueView::new();
        view.apply_snapshot(vec![
            entry("aaaaaaaaaaa", "Ada"),
            entry("bbbbbbbbbbb", "Grace"),
        ]);

        for id in ["aaaaaaaaaaa", "bbbbbbbbbbb"] {
            let video = VideoId::from(id);
            assert_eq!(
                view.remove_request(&video),
                Some(ClientMessage::RemoveVideo {
                    video_id: video.clone(),
                })
            );
        }
    }

    #[test]
    fn add_request_validates_before_sending() {
        match add_request("   ") {
            Err(Error::InvalidInput(message)) => assert!(message.contains("enter")),
            other => panic!("expected InvalidInput, got {:?}", other),
        }

        match add_request("https://example.com/clip") {
            Err(Error::InvalidInput(_)) => {}
            other => panic!("expected InvalidInput, got {:?}", other),
        }

        assert_eq!(
            add_request("https://youtu.be/dQw4w9WgXcQ").unwrap(),
            ClientMessage::AddVideo {
                video_id: VideoId::from("dQw4w9WgXcQ"),
            }
        );
    }
}
