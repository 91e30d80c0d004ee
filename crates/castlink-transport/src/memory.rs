//! In-memory transport.
//!
//! Behaves like [`crate::TransportSocket`] from the consumer's side (same
//! registry, same mailbox semantics) but the "remote end" is whoever holds the
//! `MemoryTransport`: tests and the offline demo read what was sent and inject
//! what should arrive.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::{
    CLOSE_CODE_NORMAL, Mailbox, QueuedEvent, SocketHandle, Transport, TransportError, registry,
};

#[derive(Debug, Default)]
struct MemoryState {
    handle: Option<SocketHandle>,
    sent: Vec<String>,
    open_count: usize,
    fail_next_open: Option<String>,
    last_address: Option<String>,
    last_headers: Vec<(String, String)>,
}

/// Scriptable transport backed by the process registry.
#[derive(Debug)]
pub struct MemoryTransport {
    mailbox: Arc<Mailbox>,
    auto_connect: bool,
    state: Mutex<MemoryState>,
}

impl Default for MemoryTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTransport {
    /// Transport that reports `Opened` as soon as it is opened.
    pub fn new() -> Self {
        Self { mailbox: Arc::new(Mailbox::new()), auto_connect: true, state: Mutex::default() }
    }

    /// Transport that stays connecting until [`MemoryTransport::inject_connect`].
    pub fn manual() -> Self {
        Self { auto_connect: false, ..Self::new() }
    }

    /// Make the next `open` fail with [`TransportError::SetupFailed`].
    pub fn fail_next_open(&self, reason: impl Into<String>) {
        self.state.lock().fail_next_open = Some(reason.into());
    }

    /// Number of successful `open` calls so far.
    pub fn open_count(&self) -> usize {
        self.state.lock().open_count
    }

    /// Address passed to the most recent `open`.
    pub fn last_address(&self) -> Option<String> {
        self.state.lock().last_address.clone()
    }

    /// Headers passed to the most recent `open`.
    pub fn last_headers(&self) -> Vec<(String, String)> {
        self.state.lock().last_headers.clone()
    }

    /// Frames sent so far, without consuming them.
    pub fn sent(&self) -> Vec<String> {
        self.state.lock().sent.clone()
    }

    /// Take the frames sent since the last call.
    pub fn take_sent(&self) -> Vec<String> {
        std::mem::take(&mut self.state.lock().sent)
    }

    /// Report the connection as established.
    pub fn inject_connect(&self) -> bool {
        self.handle().is_some_and(|handle| registry::on_connect(handle, "memory"))
    }

    /// Deliver an inbound text frame.
    pub fn inject_message(&self, message: &str) -> bool {
        self.handle().is_some_and(|handle| registry::on_message(handle, message))
    }

    /// Report a transport error.
    pub fn inject_error(&self, code: i32, message: &str) -> bool {
        self.handle().is_some_and(|handle| registry::on_error(handle, code, message))
    }

    /// Report the connection as closed by the remote end.
    pub fn inject_close(&self, code: u16, reason: &str) -> bool {
        let Some(handle) = self.state.lock().handle.take() else {
            return false;
        };
        let delivered = registry::on_close(handle, code, reason);
        registry::global().unregister(handle);
        delivered
    }
}

impl Transport for MemoryTransport {
    fn open(&self, address: &str, headers: &[(String, String)]) -> Result<(), TransportError> {
        let handle = {
            let mut state = self.state.lock();
            if state.handle.is_some() {
                return Err(TransportError::SetupFailed("socket already open".to_string()));
            }
            if let Some(reason) = state.fail_next_open.take() {
                return Err(TransportError::SetupFailed(reason));
            }

            let handle = registry::global().register(Arc::clone(&self.mailbox));
            state.handle = Some(handle);
            state.open_count += 1;
            state.last_address = Some(address.to_owned());
            state.last_headers = headers.to_vec();
            handle
        };

        tracing::debug!(%handle, address, "memory transport opened");
        if self.auto_connect {
            registry::on_connect(handle, "memory");
        }
        Ok(())
    }

    fn send(&self, message: &str) -> Result<(), TransportError> {
        let mut state = self.state.lock();
        if state.handle.is_none() {
            return Err(TransportError::Closed);
        }
        state.sent.push(message.to_owned());
        Ok(())
    }

    fn close(&self) {
        let Some(handle) = self.state.lock().handle.take() else {
            return;
        };
        registry::on_close(handle, CLOSE_CODE_NORMAL, "closed by client");
        registry::global().unregister(handle);
        tracing::debug!(%handle, "memory transport closed");
    }

    fn drain_events(&self) -> Vec<(SocketHandle, QueuedEvent)> {
        self.mailbox.drain_all()
    }

    fn clear_events(&self) {
        self.mailbox.clear();
    }

    fn is_open(&self) -> bool {
        self.state.lock().handle.is_some()
    }

    fn handle(&self) -> Option<SocketHandle> {
        self.state.lock().handle
    }
}
