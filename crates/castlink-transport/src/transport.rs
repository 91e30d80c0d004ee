//! Transport capability and backend selection.

use std::sync::Arc;

use crate::{
    MemoryTransport, NoopTransport, QueuedEvent, SocketConfig, SocketHandle, TransportError,
    TransportSocket,
};

/// A duplex text-frame connection whose inbound side is a mailbox.
///
/// Implementations must be callable from any thread. Inbound traffic is
/// never delivered by callback to the owner; it accumulates until the owner
/// calls [`Transport::drain_events`].
///
/// # Implementations
///
/// - [`TransportSocket`]: WebSocket on a dedicated I/O thread
/// - [`MemoryTransport`]: in-memory, scriptable
/// - [`NoopTransport`]: refuses to open
pub trait Transport: Send + Sync {
    /// Start connecting to `address`, sending `headers` with the handshake.
    ///
    /// Returns once setup is done; the connection itself completes later and
    /// is reported as [`QueuedEvent::Opened`].
    fn open(&self, address: &str, headers: &[(String, String)]) -> Result<(), TransportError>;

    /// Send one text frame.
    fn send(&self, message: &str) -> Result<(), TransportError>;

    /// Tear the connection down. Idempotent.
    fn close(&self);

    /// Take everything queued since the last drain, oldest first, each tagged
    /// with the connection that produced it.
    fn drain_events(&self) -> Vec<(SocketHandle, QueuedEvent)>;

    /// Discard everything queued.
    fn clear_events(&self);

    /// True between a successful `open` and the matching `close`.
    fn is_open(&self) -> bool;

    /// Handle of the most recently opened connection, while it is held.
    ///
    /// Events tagged with any other handle belong to a connection that has
    /// since been replaced.
    fn handle(&self) -> Option<SocketHandle>;
}

/// Which backend to build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportKind {
    /// Real WebSocket connection.
    WebSocket(SocketConfig),
    /// In-memory backend.
    Memory,
    /// Backend for targets without networking.
    Noop,
}

impl Default for TransportKind {
    fn default() -> Self {
        Self::WebSocket(SocketConfig::default())
    }
}

impl TransportKind {
    /// Construct the selected backend.
    pub fn build(&self) -> Arc<dyn Transport> {
        match self {
            Self::WebSocket(config) => Arc::new(TransportSocket::with_config(config.clone())),
            Self::Memory => Arc::new(MemoryTransport::new()),
            Self::Noop => Arc::new(NoopTransport),
        }
    }
}
