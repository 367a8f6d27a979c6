//! Command Channel Client
//!
//! Gateway side of the channel: one lazily opened, automatically reopened
//! connection per backend service, multiplexing concurrent requests by
//! correlation id.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use tokio::io::BufReader;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::time::timeout;
use uuid::Uuid;

use super::messages::{read_frame, write_frame, Envelope, RequestFrame, ResponseFrame};
use crate::infrastructure::metrics;
use crate::shared::error::AppError;

/// Sends one command and waits for its envelope.
///
/// Implemented by [`RpcClient`]; the gateway only depends on this trait.
#[async_trait]
pub trait CommandChannel: Send + Sync {
    async fn send(&self, command: &str, data: Value) -> Result<Envelope, AppError>;
}

type PendingMap = DashMap<String, oneshot::Sender<ResponseFrame>>;

/// One open TCP connection and the requests waiting on it.
struct Connection {
    outgoing: mpsc::UnboundedSender<RequestFrame>,
    pending: Arc<PendingMap>,
    alive: Arc<AtomicBool>,
}

impl Connection {
    fn is_usable(&self) -> bool {
        self.alive.load(Ordering::Acquire) && !self.outgoing.is_closed()
    }
}

/// Marks the connection dead and fails every waiting request.
fn shut_down(pending: &PendingMap, alive: &AtomicBool) {
    alive.store(false, Ordering::Release);
    // Dropping the senders wakes the receivers with an error.
    pending.clear();
}

/// Multiplexing client for one backend service.
pub struct RpcClient {
    service: &'static str,
    addr: String,
    request_timeout: Duration,
    max_response_size: usize,
    connection: Mutex<Option<Connection>>,
}

impl RpcClient {
    /// Create a client. No connection is opened until the first request.
    ///
    /// `max_response_size` bounds reply frames only; listings can be far
    /// larger than any request.
    pub fn new(
        service: &'static str,
        addr: impl Into<String>,
        request_timeout: Duration,
        max_response_size: usize,
    ) -> Self {
        Self {
            service,
            addr: addr.into(),
            request_timeout,
            max_response_size,
            connection: Mutex::new(None),
        }
    }

    pub fn service(&self) -> &'static str {
        self.service
    }

    /// Register `id` on a live connection and queue its frame.
    async fn submit(
        &self,
        frame: RequestFrame,
    ) -> Result<(oneshot::Receiver<ResponseFrame>, Arc<PendingMap>), AppError> {
        let mut guard = self.connection.lock().await;

        let needs_connect = guard.as_ref().map_or(true, |conn| !conn.is_usable());
        if needs_connect {
            *guard = Some(self.connect().await?);
        }
        let conn = guard
            .as_ref()
            .ok_or_else(|| AppError::Transport(format!("{} service connection unavailable", self.service)))?;

        let (tx, rx) = oneshot::channel();
        let id = frame.id.clone();
        conn.pending.insert(id.clone(), tx);

        if conn.outgoing.send(frame).is_err() || !conn.alive.load(Ordering::Acquire) {
            conn.pending.remove(&id);
            return Err(AppError::Transport(format!(
                "{} service connection closed",
                self.service
            )));
        }

        Ok((rx, conn.pending.clone()))
    }

    async fn connect(&self) -> Result<Connection, AppError> {
        let stream = timeout(self.request_timeout, TcpStream::connect(&self.addr))
            .await
            .map_err(|_| {
                AppError::Transport(format!("{} service at {} did not accept the connection in time", self.service, self.addr))
            })?
            .map_err(|e| {
                AppError::Transport(format!("{} service at {} is unreachable: {}", self.service, self.addr, e))
            })?;
        if let Err(e) = stream.set_nodelay(true) {
            tracing::debug!(error = %e, "Failed to set TCP_NODELAY");
        }

        tracing::info!(service = self.service, addr = %self.addr, "Connected to backend service");

        let (read_half, mut write_half) = stream.into_split();
        let (outgoing, mut rx) = mpsc::unbounded_channel::<RequestFrame>();
        let pending: Arc<PendingMap> = Arc::new(DashMap::new());
        let alive = Arc::new(AtomicBool::new(true));

        // Writer: queued requests -> socket
        let (writer_pending, writer_alive) = (pending.clone(), alive.clone());
        let service = self.service;
        tokio::spawn(async move {
            while let Some(frame) = rx.recv().await {
                if let Err(e) = write_frame(&mut write_half, &frame).await {
                    tracing::warn!(service, error = %e, "Failed to write request frame");
                    break;
                }
            }
            shut_down(&writer_pending, &writer_alive);
        });

        // Reader: socket -> pending requests
        let (reader_pending, reader_alive) = (pending.clone(), alive.clone());
        let max_response_size = self.max_response_size;
        tokio::spawn(async move {
            let mut reader = BufReader::new(read_half);
            loop {
                match read_frame(&mut reader, max_response_size).await {
                    Ok(Some(bytes)) => match serde_json::from_slice::<ResponseFrame>(&bytes) {
                        Ok(frame) => {
                            if let Some((_, waiter)) = reader_pending.remove(&frame.id) {
                                let _ = waiter.send(frame);
                            } else {
                                tracing::debug!(service, request_id = %frame.id, "Response for unknown request");
                            }
                        }
                        Err(e) => tracing::warn!(service, error = %e, "Undecodable response frame"),
                    },
                    Ok(None) => {
                        tracing::info!(service, "Backend service closed the connection");
                        break;
                    }
                    Err(e) => {
                        tracing::warn!(service, error = %e, "Backend connection failed");
                        break;
                    }
                }
            }
            shut_down(&reader_pending, &reader_alive);
        });

        Ok(Connection {
            outgoing,
            pending,
            alive,
        })
    }

    async fn round_trip(&self, command: &str, data: Value) -> Result<ResponseFrame, AppError> {
        let id = Uuid::new_v4().to_string();
        let (rx, pending) = self
            .submit(RequestFrame::new(id.clone(), command, data))
            .await?;

        match timeout(self.request_timeout, rx).await {
            Ok(Ok(frame)) => Ok(frame),
            Ok(Err(_)) => Err(AppError::Transport(format!(
                "{} service connection closed before responding",
                self.service
            ))),
            Err(_) => {
                pending.remove(&id);
                Err(AppError::Transport(format!(
                    "{} service did not respond within {:?}",
                    self.service, self.request_timeout
                )))
            }
        }
    }
}

#[async_trait]
impl CommandChannel for RpcClient {
    async fn send(&self, command: &str, data: Value) -> Result<Envelope, AppError> {
        let started = Instant::now();
        let (outcome, result) = match self.round_trip(command, data).await {
            Ok(ResponseFrame {
                response: Some(envelope),
                ..
            }) => {
                let outcome = if envelope.success { "ok" } else { "error" };
                (outcome, Ok(envelope))
            }
            Ok(ResponseFrame { err: Some(err), .. }) => (
                "rejected",
                Err(AppError::Transport(format!(
                    "{} service rejected '{}': {}",
                    self.service, command, err
                ))),
            ),
            Ok(_) => (
                "transport",
                Err(AppError::Transport(format!(
                    "{} service sent an empty response",
                    self.service
                ))),
            ),
            Err(e) => ("transport", Err(e)),
        };
        metrics::record_rpc_request(self.service, command, outcome, started.elapsed().as_secs_f64());

        if let Err(e) = &result {
            tracing::error!(service = self.service, command, error = %e, "Command failed in transit");
        }
        result
    }
}
