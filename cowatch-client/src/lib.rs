//! # Cowatch Client Library
//!
//! Client core for collaborative video watching: one shared playback
//! timeline and one shared queue, driven by a central authority.
//!
//! **Purpose:** Reconcile locally-observed player events against
//! remotely-commanded playback without the two feeding back into each
//! other, render authoritative queue and roster snapshots, and translate
//! user gestures into outbound requests.
//!
//! **Architecture:** All state lives in a single session task fed by one
//! input queue (player notifications, authority messages, user
//! gestures); observers receive render and notice updates over a
//! broadcast channel. The media player and the transport stay behind the
//! [`surface::MediaSurface`] and [`bus::EventBus`] traits supplied by
//! the embedder.

pub mod bus;
pub mod config;
pub mod error;
pub mod events;
pub mod identity;
pub mod playback;
pub mod queue_view;
pub mod session;
pub mod surface;

pub use config::{ClientConfig, ReconnectPolicy};
pub use error::{Error, Result};
pub use session::{Session, SessionHandle};
