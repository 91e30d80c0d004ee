//! Transport error types.

use thiserror::Error;

/// Errors returned synchronously by transport operations.
///
/// Failures that happen later, on the I/O thread, are never returned; they
/// arrive as [`crate::QueuedEvent::Error`] and [`crate::QueuedEvent::Closed`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Connection could not be set up (duplicate open, bad address or header,
    /// thread spawn failure, unsupported backend).
    #[error("transport setup failed: {0}")]
    SetupFailed(String),

    /// The socket is not open.
    #[error("transport closed")]
    Closed,
}
