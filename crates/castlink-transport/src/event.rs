//! Events produced by transport threads.

/// Close code for a clean, requested shutdown.
pub const CLOSE_CODE_NORMAL: u16 = 1000;

/// Close code when the connection dropped without a close handshake.
pub const CLOSE_CODE_ABNORMAL: u16 = 1006;

/// Close code when a graceful shutdown did not finish in time and the
/// connection was torn down by force.
pub const CLOSE_CODE_ABORTED: u16 = 4999;

/// One observation from a transport, queued for the consumer thread.
///
/// Consumed exactly once by a drain and then dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueuedEvent {
    /// The connection is established.
    Opened,

    /// A text frame arrived.
    Message(String),

    /// The transport hit an error. A `Closed` follows if the connection is
    /// lost as a result.
    Error {
        /// Transport-specific error code.
        code: i32,
        /// Description.
        message: String,
    },

    /// The connection is gone.
    Closed {
        /// Close code ([`CLOSE_CODE_NORMAL`] for a clean close).
        code: u16,
        /// Close reason.
        reason: String,
    },
}

impl QueuedEvent {
    /// True for a `Closed` event that was not a clean shutdown.
    pub fn is_abnormal_close(&self) -> bool {
        matches!(self, Self::Closed { code, .. } if *code != CLOSE_CODE_NORMAL)
    }
}
