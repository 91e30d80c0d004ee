//! Protocol error types.

use thiserror::Error;

/// Convenience alias for protocol results.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors produced while encoding or decoding wire messages.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Inbound frame is not a well-formed message
    #[error("decode error: {0}")]
    Decode(String),

    /// Outbound message could not be serialized
    #[error("encode error: {0}")]
    Encode(String),
}
