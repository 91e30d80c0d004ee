//! Session errors.
//!
//! Every failure the session observes is delivered to `on_error` subscribers
//! as an [`crate::ErrorEvent`] built from one of these. The integer codes
//! are stable.

use castlink_proto::ProtocolError;
use castlink_transport::TransportError;
use thiserror::Error;

/// Code for [`SessionError::TransportSetup`].
pub const ERROR_TRANSPORT_SETUP: i32 = -1;
/// Code for [`SessionError::TransportSend`].
pub const ERROR_TRANSPORT_SEND: i32 = -2;
/// Code for [`SessionError::ProvisioningTimeout`].
pub const ERROR_PROVISIONING_TIMEOUT: i32 = -3;
/// Code for [`SessionError::Protocol`].
pub const ERROR_DECODE: i32 = -4;

/// Errors raised by the session orchestrator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Opening the transport failed.
    #[error("transport setup failed: {0}")]
    TransportSetup(TransportError),

    /// A frame could not be handed to the transport.
    #[error("send failed: {0}")]
    TransportSend(TransportError),

    /// The connection closed abnormally.
    #[error("connection closed with code {code}: {reason}")]
    TransportClosed {
        /// Close code.
        code: u16,
        /// Close reason.
        reason: String,
    },

    /// Provisioning did not complete within the configured timeout.
    #[error("provisioning still incomplete, {outstanding} request(s) outstanding")]
    ProvisioningTimeout {
        /// Groups and scenes not yet acknowledged.
        outstanding: usize,
    },

    /// An inbound frame could not be decoded.
    #[error("protocol error: {0}")]
    Protocol(ProtocolError),

    /// The service reported an error.
    #[error("remote error {code}: {message}")]
    Remote {
        /// Service error code.
        code: i32,
        /// Service description.
        message: String,
    },

    /// The transport reported an error.
    #[error("transport error {code}: {message}")]
    Transport {
        /// Transport error code.
        code: i32,
        /// Description.
        message: String,
    },
}

impl SessionError {
    /// Stable integer code reported to subscribers.
    ///
    /// Transport, close and remote errors pass their own code through; the
    /// session's own failures use negative codes.
    pub fn code(&self) -> i32 {
        match self {
            Self::TransportSetup(_) => ERROR_TRANSPORT_SETUP,
            Self::TransportSend(_) => ERROR_TRANSPORT_SEND,
            Self::TransportClosed { code, .. } => i32::from(*code),
            Self::ProvisioningTimeout { .. } => ERROR_PROVISIONING_TIMEOUT,
            Self::Protocol(_) => ERROR_DECODE,
            Self::Remote { code, .. } | Self::Transport { code, .. } => *code,
        }
    }
}
