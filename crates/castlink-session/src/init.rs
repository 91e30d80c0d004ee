//! Background connect task.
//!
//! One is spawned per accepted `connect`. It opens the transport (unless it
//! is already open) and hands over the provisioning frames, then exits. The
//! session reaps it on a later tick. Cancellation is checked before and after
//! the open, so a `disconnect` racing with the open never leaves a connection
//! behind.

use std::{sync::Arc, thread};

use castlink_transport::{Transport, TransportError};
use tokio_util::sync::CancellationToken;

use crate::SessionError;

/// Inputs captured on the host thread at `connect` time.
#[derive(Debug, Clone)]
pub(crate) struct InitRequest {
    pub(crate) address: String,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) frames: Vec<String>,
}

/// A running init task.
#[derive(Debug)]
pub(crate) struct InitTask {
    cancel: CancellationToken,
    thread: thread::JoinHandle<Result<(), SessionError>>,
}

impl InitTask {
    pub(crate) fn spawn(transport: Arc<dyn Transport>, request: InitRequest) -> Result<Self, SessionError> {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let thread = thread::Builder::new()
            .name("castlink-init".to_string())
            .spawn(move || run(transport.as_ref(), &request, &token))
            .map_err(|e| {
                SessionError::TransportSetup(TransportError::SetupFailed(format!(
                    "failed to spawn init task: {e}"
                )))
            })?;
        Ok(Self { cancel, thread })
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    pub(crate) fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Wait for the task and return its outcome.
    pub(crate) fn join(self) -> Result<(), SessionError> {
        self.thread.join().unwrap_or_else(|_| {
            Err(SessionError::TransportSetup(TransportError::SetupFailed("init task panicked".to_string())))
        })
    }
}

fn run(transport: &dyn Transport, request: &InitRequest, cancel: &CancellationToken) -> Result<(), SessionError> {
    if cancel.is_cancelled() {
        return Ok(());
    }

    if !transport.is_open() {
        transport.open(&request.address, &request.headers).map_err(SessionError::TransportSetup)?;
    }
    if cancel.is_cancelled() {
        tracing::debug!("connect cancelled during open");
        transport.close();
        return Ok(());
    }

    for frame in &request.frames {
        transport.send(frame).map_err(SessionError::TransportSend)?;
    }
    tracing::debug!(frames = request.frames.len(), "provisioning sent");
    Ok(())
}
