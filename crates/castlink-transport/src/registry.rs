//! Process-wide socket registry and native callback entry points.
//!
//! Connection threads do not hold a reference to the socket object that
//! spawned them. They carry an opaque [`SocketHandle`] and report through the
//! `on_*` functions below, which resolve the handle to its mailbox under the
//! registry lock. Once a socket closes its handle is unregistered, so anything
//! a lingering thread reports afterwards is dropped with a diagnostic instead
//! of reaching a consumer that no longer expects it.

use std::{
    collections::HashMap,
    fmt,
    sync::{
        Arc, LazyLock,
        atomic::{AtomicU64, Ordering},
    },
};

use parking_lot::Mutex;

use crate::{EventQueue, QueuedEvent};

/// Opaque identity of one open connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SocketHandle(u64);

impl SocketHandle {
    /// Raw handle value.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SocketHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Mailbox shared by every connection a transport opens. Each entry carries
/// the handle of the connection that produced it.
pub type Mailbox = EventQueue<(SocketHandle, QueuedEvent)>;

/// Handle → mailbox map shared by every transport in the process.
#[derive(Debug, Default)]
pub struct SocketRegistry {
    next_handle: AtomicU64,
    sockets: Mutex<HashMap<SocketHandle, Arc<Mailbox>>>,
}

impl SocketRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a mailbox under a fresh handle.
    pub fn register(&self, mailbox: Arc<Mailbox>) -> SocketHandle {
        let handle = SocketHandle(self.next_handle.fetch_add(1, Ordering::Relaxed) + 1);
        self.sockets.lock().insert(handle, mailbox);
        handle
    }

    /// Remove a handle. Returns `false` if it was not registered.
    pub fn unregister(&self, handle: SocketHandle) -> bool {
        self.sockets.lock().remove(&handle).is_some()
    }

    /// Check whether a handle is registered.
    pub fn contains(&self, handle: SocketHandle) -> bool {
        self.sockets.lock().contains_key(&handle)
    }

    /// Enqueue an event for a handle.
    ///
    /// Returns `false` (and drops the event) if the handle is unknown.
    pub fn dispatch(&self, handle: SocketHandle, event: QueuedEvent) -> bool {
        let mailbox = self.sockets.lock().get(&handle).cloned();
        match mailbox {
            Some(mailbox) => {
                mailbox.enqueue((handle, event));
                true
            },
            None => {
                tracing::debug!(%handle, ?event, "dropping event for unknown socket");
                false
            },
        }
    }

    /// Number of registered sockets.
    pub fn len(&self) -> usize {
        self.sockets.lock().len()
    }

    /// True if no socket is registered.
    pub fn is_empty(&self) -> bool {
        self.sockets.lock().is_empty()
    }
}

static GLOBAL: LazyLock<SocketRegistry> = LazyLock::new(SocketRegistry::new);

/// The process-wide registry.
pub fn global() -> &'static SocketRegistry {
    &GLOBAL
}

/// Connection established.
pub fn on_connect(handle: SocketHandle, message: &str) -> bool {
    tracing::debug!(%handle, message, "socket connected");
    global().dispatch(handle, QueuedEvent::Opened)
}

/// Text frame received.
pub fn on_message(handle: SocketHandle, message: &str) -> bool {
    global().dispatch(handle, QueuedEvent::Message(message.to_owned()))
}

/// Transport error observed.
pub fn on_error(handle: SocketHandle, code: i32, message: &str) -> bool {
    global().dispatch(handle, QueuedEvent::Error { code, message: message.to_owned() })
}

/// Connection closed.
pub fn on_close(handle: SocketHandle, code: u16, reason: &str) -> bool {
    global().dispatch(handle, QueuedEvent::Closed { code, reason: reason.to_owned() })
}
