//! Playback reconciliation engine
//!
//! Owns every piece of echo-guard state: the settle phase, the intent
//! mirror, the parked pending load, and the last locally-known position.
//! Remote commands come in through the `apply_*` methods, surface
//! notifications through the `on_*` methods; both run on the session
//! task, never concurrently.

use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::bus::EventBus;
use crate::playback::transitions::{settle_transition, Outcome, ReportKind, SettlePhase};
use crate::surface::{MediaSurface, SurfaceState};
use cowatch_common::{ClientMessage, VideoId};

/// The reconciler's view of the player, mirroring its last classified
/// notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackIntent {
    /// Nothing commanded or observed yet
    Idle,

    /// A remote load is parked until the surface reports ready
    LoadingQueued,

    Playing,
    Paused,
    Buffering,
    Ended,
}

impl From<SurfaceState> for PlaybackIntent {
    fn from(state: SurfaceState) -> Self {
        match state {
            SurfaceState::Playing => PlaybackIntent::Playing,
            SurfaceState::Paused => PlaybackIntent::Paused,
            SurfaceState::Buffering => PlaybackIntent::Buffering,
            SurfaceState::Ended => PlaybackIntent::Ended,
        }
    }
}

/// A remote load that arrived before the surface was ready
///
/// Only the newest one is kept; it is consumed exactly once when the
/// surface reports ready.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingLoad {
    pub video: VideoId,
    pub start: f64,
}

/// Keeps the local player in step with the authority without echo loops
///
/// A remote command applied to the player makes the player emit the same
/// notifications a user gesture would. Reporting those back would bounce
/// the command around the room, so every remotely-driven command is
/// bracketed: enter `AwaitingSettle` before issuing, swallow
/// notifications until the command lands on Playing or Paused.
pub struct PlaybackReconciler {
    surface: Arc<dyn MediaSurface>,
    bus: Arc<dyn EventBus>,

    /// Echo-guard phase
    phase: SettlePhase,

    /// Mirror of the last classified notification
    intent: PlaybackIntent,

    /// Remote load parked until the surface is ready
    pending: Option<PendingLoad>,

    /// Kind of the last outbound report; duplicates are re-sent, this
    /// only feeds the log
    last_reported: Option<ReportKind>,

    /// Position last known locally, the fallback when the surface
    /// cannot report one
    last_known_time: f64,
}

impl PlaybackReconciler {
    pub fn new(surface: Arc<dyn MediaSurface>, bus: Arc<dyn EventBus>) -> Self {
        Self {
            surface,
            bus,
            phase: SettlePhase::Idle,
            intent: PlaybackIntent::Idle,
            pending: None,
            last_reported: None,
            last_known_time: 0.0,
        }
    }

    /// Current echo-guard phase
    pub fn phase(&self) -> SettlePhase {
        self.phase
    }

    /// Current intent mirror
    pub fn intent(&self) -> PlaybackIntent {
        self.intent
    }

    /// The parked remote load, if any
    pub fn pending_load(&self) -> Option<&PendingLoad> {
        self.pending.as_ref()
    }

    /// Position the reconciler last knew, in seconds
    pub fn last_known_time(&self) -> f64 {
        self.last_known_time
    }

    /// Apply `play_video_at_time`: load or seek, then play from `time`
    pub fn apply_play_at(&mut self, video: &VideoId, time: f64) {
        if !self.surface.is_ready() {
            info!("Surface not ready, parking load of {} at {}s", video, time);
            self.pending = Some(PendingLoad {
                video: video.clone(),
                start: time,
            });
            self.intent = PlaybackIntent::LoadingQueued;
            return;
        }

        // Guard up before the surface can emit anything
        self.phase = SettlePhase::AwaitingSettle;

        if self.surface.current_video().as_ref() == Some(video) {
            debug!("Seeking current video to {}s", time);
            if let Err(e) = self.surface.seek(time) {
                warn!("Seek failed: {}", e);
            }
            if let Err(e) = self.surface.play() {
                warn!("Play failed: {}", e);
            }
        } else {
            debug!("Loading {} at {}s", video, time);
            if let Err(e) = self.surface.load(video, time) {
                warn!("Load failed: {}", e);
            }
        }

        self.last_known_time = time;
    }

    /// Apply `pause_video`
    ///
    /// Before the surface is ready there is nothing to pause and no way
    /// to park the command, so it is dropped.
    pub fn apply_pause(&mut self) {
        if !self.surface.is_ready() {
            debug!("Pause command before surface ready, dropped");
            return;
        }

        self.phase = SettlePhase::AwaitingSettle;
        if let Err(e) = self.surface.pause() {
            warn!("Pause failed: {}", e);
        }
    }

    /// Apply `play_video`: fresh load, playback from the start
    pub fn apply_play(&mut self, video: &VideoId) {
        if !self.surface.is_ready() {
            info!("Surface not ready, parking load of {} from start", video);
            self.pending = Some(PendingLoad {
                video: video.clone(),
                start: 0.0,
            });
            self.intent = PlaybackIntent::LoadingQueued;
            return;
        }

        self.phase = SettlePhase::AwaitingSettle;
        if let Err(e) = self.surface.load(video, 0.0) {
            warn!("Load failed: {}", e);
        }
        if let Err(e) = self.surface.play() {
            warn!("Play failed: {}", e);
        }
        self.last_known_time = 0.0;
    }

    /// The surface finished initializing; consume any parked load
    pub fn on_ready(&mut self) {
        info!("Media surface ready");

        if let Some(pending) = self.pending.take() {
            info!("Applying parked load: {} at {}s", pending.video, pending.start);
            self.phase = SettlePhase::AwaitingSettle;
            if let Err(e) = self.surface.load(&pending.video, pending.start) {
                warn!("Parked load failed: {}", e);
            }
            self.last_known_time = pending.start;
        }
    }

    /// Classify a playback state notification and act on it
    pub fn on_state_changed(&mut self, observed: SurfaceState) {
        let (next, outcome) = settle_transition(self.phase, observed);
        self.phase = next;
        self.intent = PlaybackIntent::from(observed);

        match outcome {
            Outcome::Suppress => {
                debug!("Suppressed {:?} while awaiting settle", observed);
            }
            Outcome::Settle => {
                debug!("Remote command settled on {:?}", observed);
            }
            Outcome::Observe => {
                debug!("Buffering observed");
            }
            Outcome::Report(kind) => self.report(kind),
        }
    }

    /// The surface hit a media error. Logged only; the guard state must
    /// survive so the next authoritative command still classifies right.
    pub fn on_surface_error(&mut self, message: &str) {
        error!("Media surface error: {}", message);
    }

    fn report(&mut self, kind: ReportKind) {
        if self.last_reported == Some(kind) {
            debug!("Re-reporting {:?} (state unchanged)", kind);
        }

        match kind {
            ReportKind::Playing => {
                // Read the position at classification time, never cached
                let time = self.surface.current_time().unwrap_or(self.last_known_time);
                self.last_known_time = time;
                info!("Reporting local play at {}s", time);
                self.send(ClientMessage::SyncPlay { time });
            }
            ReportKind::Paused => {
                info!("Reporting local pause");
                self.send(ClientMessage::SyncPause);
            }
            ReportKind::Ended => {
                info!("Reporting video ended");
                self.last_known_time = 0.0;
                self.send(ClientMessage::VideoEnded);
            }
        }

        self.last_reported = Some(kind);
    }

    fn send(&self, message: ClientMessage) {
        if let Err(e) = self.bus.send(&message) {
            warn!("Failed to send {}: {}", message.event_name(), e);
        }
    }
}
