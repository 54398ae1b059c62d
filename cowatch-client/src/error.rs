//! Error types for the cowatch client

use thiserror::Error;

/// Result type for client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Client error types
#[derive(Error, Debug)]
pub enum Error {
    /// Wire protocol error from the common layer
    #[error("Protocol error: {0}")]
    Protocol(#[from] cowatch_common::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A media surface command could not be issued
    #[error("Media surface error: {0}")]
    Surface(String),

    /// The event bus could not accept an outbound message
    #[error("Event bus error: {0}")]
    Bus(String),

    /// Invalid user input, message is suitable for direct display
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The session task is gone and can no longer accept input
    #[error("Session channel closed")]
    ChannelClosed,
}
