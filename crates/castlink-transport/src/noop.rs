//! Transport for targets without networking.

use crate::{QueuedEvent, SocketHandle, Transport, TransportError};

/// Transport that can never connect.
///
/// Selected on platforms where no socket backend is available, so session
/// code runs unchanged and reports the failure through its normal error path.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTransport;

impl Transport for NoopTransport {
    fn open(&self, _address: &str, _headers: &[(String, String)]) -> Result<(), TransportError> {
        Err(TransportError::SetupFailed("transport unavailable".to_string()))
    }

    fn send(&self, _message: &str) -> Result<(), TransportError> {
        Err(TransportError::Closed)
    }

    fn close(&self) {}

    fn drain_events(&self) -> Vec<(SocketHandle, QueuedEvent)> {
        Vec::new()
    }

    fn clear_events(&self) {}

    fn is_open(&self) -> bool {
        false
    }

    fn handle(&self) -> Option<SocketHandle> {
        None
    }
}
