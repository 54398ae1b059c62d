//! Common error types for cowatch

use thiserror::Error;

/// Common result type for cowatch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors shared by the protocol layer and its consumers
#[derive(Error, Debug)]
pub enum Error {
    /// Inbound envelope named an event this client does not know
    #[error("Unknown event: {0}")]
    UnknownEvent(String),

    /// Inbound payload did not match the expected shape for its event
    #[error("Malformed {event} payload: {source}")]
    MalformedPayload {
        event: String,
        #[source]
        source: serde_json::Error,
    },

    /// Outbound message could not be serialized
    #[error("Encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}
