//! WebSocket transport on a dedicated I/O thread.
//!
//! Each successful [`TransportSocket::open`] spawns one OS thread running a
//! single-threaded tokio runtime. That thread owns the socket: it connects,
//! reads, writes frames handed over by [`TransportSocket::send`], and performs
//! the close handshake. Everything it observes goes through
//! [`crate::registry`] into the socket's mailbox.
//!
//! # Shutdown
//!
//! ```text
//! close() ──signal──> I/O thread: close frame ──ack──> Closed(1000)
//!    │                       └── no ack within close_timeout ──> Closed(ABORTED)
//!    └── thread not gone within join_timeout ──> detach, Closed(ABORTED)
//! ```
//!
//! In every path the handle is unregistered before `close` returns, so a
//! detached thread can no longer reach the mailbox.

use std::{
    sync::{Arc, mpsc as std_mpsc},
    thread,
    time::Duration,
};

use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::tungstenite::{
    self, Message,
    client::IntoClientRequest,
    handshake::client::Request,
    http::{HeaderName, HeaderValue},
    protocol::{CloseFrame, frame::coding::CloseCode},
};

use crate::{
    CLOSE_CODE_ABNORMAL, CLOSE_CODE_ABORTED, CLOSE_CODE_NORMAL, Mailbox, QueuedEvent,
    SocketHandle, Transport, TransportError, registry,
};

/// Time the I/O thread waits for the peer to acknowledge a close frame.
pub const DEFAULT_CLOSE_TIMEOUT: Duration = Duration::from_secs(2);

/// Time `close` waits for the I/O thread to exit before detaching it.
pub const DEFAULT_JOIN_TIMEOUT: Duration = Duration::from_secs(3);

/// Error code: connection could not be established.
pub const ERROR_CODE_CONNECT: i32 = 1;
/// Error code: reading from the socket failed.
pub const ERROR_CODE_READ: i32 = 2;
/// Error code: writing to the socket failed.
pub const ERROR_CODE_WRITE: i32 = 3;
/// Error code: the I/O thread could not start its runtime.
pub const ERROR_CODE_RUNTIME: i32 = 4;

/// Close code used when the peer closed without a status.
const CLOSE_CODE_NO_STATUS: u16 = 1005;

/// Socket timeouts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocketConfig {
    /// Bound on the close handshake.
    pub close_timeout: Duration,
    /// Bound on waiting for the I/O thread to exit (should exceed
    /// `close_timeout`).
    pub join_timeout: Duration,
}

impl Default for SocketConfig {
    fn default() -> Self {
        Self { close_timeout: DEFAULT_CLOSE_TIMEOUT, join_timeout: DEFAULT_JOIN_TIMEOUT }
    }
}

/// One live I/O thread.
struct Connection {
    handle: SocketHandle,
    shutdown: oneshot::Sender<()>,
    /// Never sent on; disconnects when the thread exits.
    exited: std_mpsc::Receiver<()>,
    thread: thread::JoinHandle<()>,
}

impl Connection {
    fn has_exited(&self) -> bool {
        matches!(self.exited.try_recv(), Err(std_mpsc::TryRecvError::Disconnected))
    }
}

/// WebSocket connection driven by its own thread.
pub struct TransportSocket {
    config: SocketConfig,
    mailbox: Arc<Mailbox>,
    connection: Mutex<Option<Connection>>,
    /// Send lock. Distinct from the mailbox lock.
    outbound: Mutex<Option<mpsc::UnboundedSender<String>>>,
}

impl Default for TransportSocket {
    fn default() -> Self {
        Self::new()
    }
}

impl TransportSocket {
    /// Socket with default timeouts.
    pub fn new() -> Self {
        Self::with_config(SocketConfig::default())
    }

    /// Socket with explicit timeouts.
    pub fn with_config(config: SocketConfig) -> Self {
        Self {
            config,
            mailbox: Arc::new(Mailbox::new()),
            connection: Mutex::new(None),
            outbound: Mutex::new(None),
        }
    }

    fn reap(&self, connection: Connection) {
        let Connection { handle, thread, .. } = connection;
        if thread.join().is_err() {
            tracing::warn!(%handle, "I/O thread panicked");
        }
        registry::global().unregister(handle);
    }
}

impl Transport for TransportSocket {
    fn open(&self, address: &str, headers: &[(String, String)]) -> Result<(), TransportError> {
        let mut slot = self.connection.lock();
        if slot.as_ref().is_some_and(|c| !c.has_exited()) {
            return Err(TransportError::SetupFailed("socket already open".to_string()));
        }
        if let Some(finished) = slot.take() {
            self.reap(finished);
        }

        let request = build_request(address, headers)?;
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let (exited_tx, exited_rx) = std_mpsc::channel::<()>();
        let handle = registry::global().register(Arc::clone(&self.mailbox));
        let close_timeout = self.config.close_timeout;

        let spawned =
            thread::Builder::new().name(format!("castlink-io-{}", handle.as_u64())).spawn(move || {
                let _exited = exited_tx;
                run_io_thread(handle, request, outbound_rx, shutdown_rx, close_timeout);
            });
        let thread = match spawned {
            Ok(thread) => thread,
            Err(e) => {
                registry::global().unregister(handle);
                return Err(TransportError::SetupFailed(format!("failed to spawn I/O thread: {e}")));
            },
        };

        *self.outbound.lock() = Some(outbound_tx);
        *slot = Some(Connection { handle, shutdown: shutdown_tx, exited: exited_rx, thread });
        tracing::debug!(%handle, address, "socket opening");
        Ok(())
    }

    fn send(&self, message: &str) -> Result<(), TransportError> {
        let outbound = self.outbound.lock();
        match outbound.as_ref() {
            Some(tx) => tx.send(message.to_owned()).map_err(|_| TransportError::Closed),
            None => Err(TransportError::Closed),
        }
    }

    fn close(&self) {
        let Some(connection) = self.connection.lock().take() else {
            return;
        };
        self.outbound.lock().take();

        let Connection { handle, shutdown, exited, thread } = connection;
        // The thread may already be gone; a failed signal is fine.
        let _ = shutdown.send(());

        match exited.recv_timeout(self.config.join_timeout) {
            Err(std_mpsc::RecvTimeoutError::Timeout) => {
                registry::global().unregister(handle);
                tracing::warn!(%handle, "I/O thread did not exit in time, aborting connection");
                self.mailbox.enqueue((handle, QueuedEvent::Closed {
                    code: CLOSE_CODE_ABORTED,
                    reason: "forced abort".to_string(),
                }));
                drop(thread);
            },
            Ok(()) | Err(std_mpsc::RecvTimeoutError::Disconnected) => {
                if thread.join().is_err() {
                    tracing::warn!(%handle, "I/O thread panicked");
                    self.mailbox.enqueue((handle, QueuedEvent::Closed {
                        code: CLOSE_CODE_ABORTED,
                        reason: "I/O thread panicked".to_string(),
                    }));
                }
                registry::global().unregister(handle);
            },
        }
        tracing::debug!(%handle, "socket closed");
    }

    fn drain_events(&self) -> Vec<(SocketHandle, QueuedEvent)> {
        self.mailbox.drain_all()
    }

    fn clear_events(&self) {
        self.mailbox.clear();
    }

    fn is_open(&self) -> bool {
        self.connection.lock().as_ref().is_some_and(|c| !c.has_exited())
    }

    fn handle(&self) -> Option<SocketHandle> {
        self.connection.lock().as_ref().map(|c| c.handle)
    }
}

impl Drop for TransportSocket {
    fn drop(&mut self) {
        self.close();
    }
}

fn build_request(address: &str, headers: &[(String, String)]) -> Result<Request, TransportError> {
    let mut request = address
        .into_client_request()
        .map_err(|e| TransportError::SetupFailed(format!("invalid address: {e}")))?;

    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| TransportError::SetupFailed(format!("invalid header name {name:?}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| TransportError::SetupFailed(format!("invalid header value: {e}")))?;
        request.headers_mut().insert(name, value);
    }
    Ok(request)
}

fn run_io_thread(
    handle: SocketHandle,
    request: Request,
    outbound: mpsc::UnboundedReceiver<String>,
    shutdown: oneshot::Receiver<()>,
    close_timeout: Duration,
) {
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            registry::on_error(handle, ERROR_CODE_RUNTIME, &format!("runtime unavailable: {e}"));
            registry::on_close(handle, CLOSE_CODE_ABNORMAL, "runtime unavailable");
            return;
        },
    };
    runtime.block_on(run_connection(handle, request, outbound, shutdown, close_timeout));
}

async fn run_connection(
    handle: SocketHandle,
    request: Request,
    mut outbound: mpsc::UnboundedReceiver<String>,
    mut shutdown: oneshot::Receiver<()>,
    close_timeout: Duration,
) {
    let connected = tokio::select! {
        result = tokio_tungstenite::connect_async(request) => result,
        _ = &mut shutdown => {
            registry::on_close(handle, CLOSE_CODE_NORMAL, "closed before connect");
            return;
        }
    };

    let stream = match connected {
        Ok((stream, response)) => {
            registry::on_connect(handle, &format!("handshake status {}", response.status()));
            stream
        },
        Err(e) => {
            registry::on_error(handle, ERROR_CODE_CONNECT, &e.to_string());
            registry::on_close(handle, CLOSE_CODE_ABNORMAL, "connect failed");
            return;
        },
    };

    let (mut write, mut read) = stream.split();
    let mut outbound_open = true;

    loop {
        tokio::select! {
            inbound = read.next() => match inbound {
                Some(Ok(Message::Text(text))) => {
                    registry::on_message(handle, text.as_str());
                },
                Some(Ok(Message::Binary(bytes))) => {
                    registry::on_message(handle, &String::from_utf8_lossy(&bytes));
                },
                Some(Ok(Message::Close(frame))) => {
                    let (code, reason) = close_parts(frame);
                    registry::on_close(handle, code, &reason);
                    return;
                },
                Some(Ok(_)) => {},
                Some(Err(e)) => {
                    registry::on_error(handle, ERROR_CODE_READ, &e.to_string());
                    registry::on_close(handle, CLOSE_CODE_ABNORMAL, "read failed");
                    return;
                },
                None => {
                    registry::on_close(handle, CLOSE_CODE_ABNORMAL, "connection dropped");
                    return;
                },
            },

            frame = outbound.recv(), if outbound_open => match frame {
                Some(text) => {
                    if let Err(e) = write.send(Message::text(text)).await {
                        registry::on_error(handle, ERROR_CODE_WRITE, &e.to_string());
                    }
                },
                None => outbound_open = false,
            },

            _ = &mut shutdown => break,
        }
    }

    let handshake = tokio::time::timeout(close_timeout, async {
        let frame = CloseFrame { code: CloseCode::Normal, reason: "closed by client".into() };
        write.send(Message::Close(Some(frame))).await?;
        while let Some(message) = read.next().await {
            if matches!(message?, Message::Close(_)) {
                break;
            }
        }
        Ok::<(), tungstenite::Error>(())
    })
    .await;

    match handshake {
        Ok(Ok(())) => {
            registry::on_close(handle, CLOSE_CODE_NORMAL, "closed by client");
        },
        Ok(Err(e)) => {
            tracing::debug!(%handle, error = %e, "close handshake failed");
            registry::on_close(handle, CLOSE_CODE_ABNORMAL, "close handshake failed");
        },
        Err(_) => {
            tracing::warn!(%handle, "close handshake timed out, aborting connection");
            registry::on_close(handle, CLOSE_CODE_ABORTED, "close handshake timed out");
        },
    }
}

fn close_parts(frame: Option<CloseFrame>) -> (u16, String) {
    match frame {
        Some(frame) => (u16::from(frame.code), frame.reason.as_str().to_owned()),
        None => (CLOSE_CODE_NO_STATUS, String::new()),
    }
}
