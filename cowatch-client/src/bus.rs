//! Event bus abstraction over the transport to the authority
//!
//! The session talks to the authority exclusively through [`EventBus`];
//! the concrete transport (websocket, socket.io bridge, in-process pair)
//! is the embedder's concern. Inbound traffic and the connection
//! lifecycle arrive as [`BusEvent`]s fed into the session input queue.
//! While connected, delivery is assumed ordered per direction; across a
//! disconnect nothing is retained or replayed.

use tokio::sync::mpsc;

use crate::error::{Error, Result};
use cowatch_common::{ClientMessage, Envelope, SessionId};

/// Outbound half of the transport
pub trait EventBus: Send + Sync {
    /// Hand a message to the transport for delivery to the authority
    ///
    /// An error means the transport could not accept the message at all
    /// (e.g. disconnected). Callers treat sends as best-effort.
    fn send(&self, message: &ClientMessage) -> Result<()>;
}

/// Inbound transport traffic and connection lifecycle
#[derive(Debug, Clone, PartialEq)]
pub enum BusEvent {
    /// Transport (re)connected; `session_id` is this connection's
    /// authority-issued identity
    Connected { session_id: SessionId },

    /// Transport lost the connection
    Disconnected,

    /// A framed message from the authority
    Message(Envelope),
}

/// [`EventBus`] backed by an unbounded channel
///
/// The simplest transport adapter: the embedder drains the receiver and
/// writes each message to its connection. Also the bus of choice in
/// tests.
pub struct ChannelBus {
    tx: mpsc::UnboundedSender<ClientMessage>,
}

impl ChannelBus {
    /// Create a bus and the receiver the transport drains
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ClientMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl EventBus for ChannelBus {
    fn send(&self, message: &ClientMessage) -> Result<()> {
        self.tx
            .send(message.clone())
            .map_err(|_| Error::Bus("transport channel closed".to_string()))
    }
}
