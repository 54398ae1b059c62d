//! Session dispatcher and bootstrap
//!
//! One task owns all client state. Surface notifications, transport
//! traffic, and user gestures arrive on one bounded queue and are
//! handled strictly in arrival order, so no two handlers ever run
//! concurrently and the reconciler needs no locks. Observers receive
//! renders and notices over a broadcast channel.

use chrono::Utc;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::bus::{BusEvent, EventBus};
use crate::config::{ClientConfig, ReconnectPolicy};
use crate::error::{Error, Result};
use crate::events::{NoticeKind, SessionInput, SessionUpdate, UserGesture};
use crate::identity::{MemoryNameStore, NameStore, SessionIdentity};
use crate::playback::PlaybackReconciler;
use crate::queue_view::{self, QueueView};
use crate::surface::{MediaSurface, SurfaceEvent};
use cowatch_common::{ClientMessage, Envelope, ServerMessage};

/// Handle for feeding inputs to a running session and observing updates
///
/// Clone freely; all clones feed the same session.
#[derive(Clone)]
pub struct SessionHandle {
    input_tx: mpsc::Sender<SessionInput>,
    update_tx: broadcast::Sender<SessionUpdate>,
}

impl SessionHandle {
    /// Feed a media surface notification
    pub async fn surface_event(&self, event: SurfaceEvent) -> Result<()> {
        self.feed(SessionInput::Surface(event)).await
    }

    /// Feed a transport lifecycle event or authority message
    pub async fn bus_event(&self, event: BusEvent) -> Result<()> {
        self.feed(SessionInput::Bus(event)).await
    }

    /// Feed a user gesture
    pub async fn gesture(&self, gesture: UserGesture) -> Result<()> {
        self.feed(SessionInput::Gesture(gesture)).await
    }

    /// Feed any input; waits when the session queue is full
    pub async fn feed(&self, input: SessionInput) -> Result<()> {
        self.input_tx
            .send(input)
            .await
            .map_err(|_| Error::ChannelClosed)
    }

    /// Subscribe to session updates from this point on
    pub fn subscribe(&self) -> broadcast::Receiver<SessionUpdate> {
        self.update_tx.subscribe()
    }
}

/// The session: owns every component and handles inputs in order
pub struct Session {
    reconciler: PlaybackReconciler,
    queue: QueueView,
    identity: SessionIdentity,
    bus: Arc<dyn EventBus>,
    reconnect: ReconnectPolicy,
    update_tx: broadcast::Sender<SessionUpdate>,
}

impl Session {
    /// Spawn a session task with an in-memory name store
    pub fn spawn(
        config: ClientConfig,
        surface: Arc<dyn MediaSurface>,
        bus: Arc<dyn EventBus>,
    ) -> (SessionHandle, JoinHandle<()>) {
        Self::spawn_with_store(config, surface, bus, Arc::new(MemoryNameStore::new()))
    }

    /// Spawn a session task with the given name store
    pub fn spawn_with_store(
        config: ClientConfig,
        surface: Arc<dyn MediaSurface>,
        bus: Arc<dyn EventBus>,
        store: Arc<dyn NameStore>,
    ) -> (SessionHandle, JoinHandle<()>) {
        info!(
            "Starting session (input capacity {}, update capacity {})",
            config.input_capacity, config.update_capacity
        );

        let (input_tx, input_rx) = mpsc::channel(config.input_capacity);
        let (update_tx, _) = broadcast::channel(config.update_capacity);

        let session = Session {
            reconciler: PlaybackReconciler::new(surface, Arc::clone(&bus)),
            queue: QueueView::new(),
            identity: SessionIdentity::new(store, config.display_name.clone()),
            bus,
            reconnect: config.reconnect,
            update_tx: update_tx.clone(),
        };

        let task = tokio::spawn(session.run(input_rx));
        (
            SessionHandle {
                input_tx,
                update_tx,
            },
            task,
        )
    }

    /// Consume inputs until every handle is dropped
    async fn run(mut self, mut input_rx: mpsc::Receiver<SessionInput>) {
        while let Some(input) = input_rx.recv().await {
            self.handle(input);
        }
        info!("Session input channel closed, stopping");
    }

    fn handle(&mut self, input: SessionInput) {
        match input {
            SessionInput::Surface(event) => self.handle_surface(event),
            SessionInput::Bus(event) => self.handle_bus(event),
            SessionInput::Gesture(gesture) => self.handle_gesture(gesture),
        }
    }

    fn handle_surface(&mut self, event: SurfaceEvent) {
        match event {
            SurfaceEvent::Ready => self.reconciler.on_ready(),
            SurfaceEvent::StateChanged(state) => self.reconciler.on_state_changed(state),
            SurfaceEvent::Error { message } => self.reconciler.on_surface_error(&message),
        }
    }

    fn handle_bus(&mut self, event: BusEvent) {
        match event {
            BusEvent::Connected { session_id } => {
                if let Some(message) = self.identity.on_connected(session_id) {
                    self.send(message);
                }
                match self.reconnect {
                    ReconnectPolicy::AwaitAuthority => {
                        // The authority pushes queue, roster, and playback
                        // position to every client on connect
                        debug!("Awaiting authority state push");
                    }
                }
                self.publish(SessionUpdate::Connection {
                    connected: true,
                    at: Utc::now(),
                });
                // A roster held from before this connect carries self
                // flags computed under the old id
                let entries = self.identity.render_roster();
                if !entries.is_empty() {
                    self.publish(SessionUpdate::Roster { entries });
                }
            }
            BusEvent::Disconnected => {
                info!("Transport disconnected, waiting for reconnect");
                self.publish(SessionUpdate::Connection {
                    connected: false,
                    at: Utc::now(),
                });
            }
            BusEvent::Message(envelope) => self.handle_envelope(envelope),
        }
    }

    /// Decode and route one authority message
    ///
    /// Decode failures drop only this message: previous renders stay in
    /// place and the next valid snapshot heals the gap.
    fn handle_envelope(&mut self, envelope: Envelope) {
        let message = match envelope.decode() {
            Ok(message) => message,
            Err(cowatch_common::Error::UnknownEvent(event)) => {
                debug!("Ignoring unknown event {:?}", event);
                return;
            }
            Err(e) => {
                warn!("Dropping inbound message: {}", e);
                return;
            }
        };

        match message {
            ServerMessage::AssignDefaultName { name } => {
                self.identity.suggest_default(name.clone());
                self.publish(SessionUpdate::NameSuggested { name });
            }
            ServerMessage::UpdateUserList(users) => {
                let entries = self.identity.apply_roster(users);
                self.publish(SessionUpdate::Roster { entries });
            }
            ServerMessage::PlayVideoAtTime { video_id, time } => {
                self.reconciler.apply_play_at(&video_id, time);
            }
            ServerMessage::PauseVideo => self.reconciler.apply_pause(),
            ServerMessage::PlayVideo { video_id } => self.reconciler.apply_play(&video_id),
            ServerMessage::UpdateQueue(entries) => {
                let rows = self.queue.apply_snapshot(entries);
                self.publish(SessionUpdate::Queue { rows });
            }
            ServerMessage::Error { message } => {
                warn!("Authority error: {}", message);
                self.publish(SessionUpdate::Notice {
                    kind: NoticeKind::Authority,
                    message,
                });
            }
        }
    }

    fn handle_gesture(&mut self, gesture: UserGesture) {
        match gesture {
            UserGesture::SetName(raw) => match self.identity.claim(&raw) {
                Ok(message) => self.send(message),
                Err(e) => self.reject(e),
            },
            UserGesture::SubmitVideo(raw) => match queue_view::add_request(&raw) {
                Ok(message) => {
                    self.send(message);
                    self.publish(SessionUpdate::SubmissionAccepted);
                }
                Err(e) => self.reject(e),
            },
            UserGesture::ReorderVideo { video, direction } => {
                if let Some(message) = self.queue.reorder_request(&video, direction) {
                    self.send(message);
                }
            }
            UserGesture::RemoveVideo { video } => {
                if let Some(message) = self.queue.remove_request(&video) {
                    self.send(message);
                }
            }
        }
    }

    /// Surface a rejected gesture to the user without sending anything
    fn reject(&self, error: Error) {
        let message = match error {
            Error::InvalidInput(message) => message,
            other => other.to_string(),
        };
        self.publish(SessionUpdate::Notice {
            kind: NoticeKind::Validation,
            message,
        });
    }

    fn send(&self, message: ClientMessage) {
        if let Err(e) = self.bus.send(&message) {
            warn!("Failed to send {}: {}", message.event_name(), e);
        }
    }

    fn publish(&self, update: SessionUpdate) {
        // No observers is fine; updates are a live feed, not a log
        let _ = self.update_tx.send(update);
    }
}
