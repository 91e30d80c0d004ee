//! Transport
//!
//! Owns the physical duplex connection to the streaming service and hands
//! everything it observes to a single consumer through a thread-safe mailbox.
//!
//! # Architecture
//!
//! I/O happens on a dedicated thread per connection. That thread never touches
//! host state: it looks its mailbox up in the process-wide [`registry`] by
//! [`SocketHandle`] and enqueues a [`QueuedEvent`]. The consumer (the session
//! orchestrator, on the host's tick) takes everything queued so far with one
//! buffer swap via [`EventQueue::drain_all`].
//!
//! # Components
//!
//! - [`Transport`]: capability implemented by every backend
//! - [`TransportSocket`]: WebSocket connection on its own thread
//! - [`MemoryTransport`]: in-memory backend for tests and offline runs
//! - [`NoopTransport`]: stand-in for targets without networking
//! - [`EventQueue`]: double-buffered mailbox
//! - [`registry`]: handle → mailbox lookup and native callback entry points

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod error;
mod event;
mod memory;
mod noop;
mod queue;
pub mod registry;
mod socket;
mod transport;

pub use error::TransportError;
pub use event::{CLOSE_CODE_ABORTED, CLOSE_CODE_ABNORMAL, CLOSE_CODE_NORMAL, QueuedEvent};
pub use memory::MemoryTransport;
pub use noop::NoopTransport;
pub use queue::EventQueue;
pub use registry::{Mailbox, SocketHandle};
pub use socket::{
    DEFAULT_CLOSE_TIMEOUT, DEFAULT_JOIN_TIMEOUT, ERROR_CODE_CONNECT, ERROR_CODE_READ,
    ERROR_CODE_RUNTIME, ERROR_CODE_WRITE, SocketConfig, TransportSocket,
};
pub use transport::{Transport, TransportKind};
