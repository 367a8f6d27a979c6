//! Command Channel Server
//!
//! Accepts persistent TCP connections and serves request frames through a
//! [`CommandDispatcher`]. Each connection has a reader loop and a writer
//! task joined by an unbounded queue; every request runs on its own task, so
//! responses may leave out of order.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use serde_json::Value;
use tokio::io::BufReader;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use uuid::Uuid;

use super::dispatcher::CommandDispatcher;
use super::messages::{read_frame, write_frame, RequestFrame, ResponseFrame, NO_MATCHING_HANDLER};

/// Response sent for a frame that is JSON but not a request.
pub const MALFORMED_REQUEST: &str = "Malformed request frame";

/// Listening command channel endpoint of one backend service.
pub struct RpcServer {
    listener: TcpListener,
    dispatcher: Arc<dyn CommandDispatcher>,
    max_frame_size: usize,
}

impl RpcServer {
    /// Bind to `addr`. Port 0 picks a free port, see [`RpcServer::local_addr`].
    pub async fn bind(
        addr: &str,
        dispatcher: Arc<dyn CommandDispatcher>,
        max_frame_size: usize,
    ) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            dispatcher,
            max_frame_size,
        })
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept connections until `shutdown` resolves.
    ///
    /// Open connections keep running on their own tasks.
    pub async fn run(self, shutdown: impl Future<Output = ()>) -> std::io::Result<()> {
        tracing::info!(
            service = self.dispatcher.service(),
            addr = ?self.listener.local_addr().ok(),
            "Command channel listening"
        );

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!(service = self.dispatcher.service(), "Command channel stopping");
                    return Ok(());
                }
                accepted = self.listener.accept() => {
                    match accepted {
                        Ok((stream, peer)) => {
                            let dispatcher = self.dispatcher.clone();
                            let max_frame_size = self.max_frame_size;
                            tokio::spawn(handle_connection(stream, peer, dispatcher, max_frame_size));
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "Failed to accept connection");
                        }
                    }
                }
            }
        }
    }
}

/// Serve one connection until the peer closes it or sends garbage framing.
async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    dispatcher: Arc<dyn CommandDispatcher>,
    max_frame_size: usize,
) {
    let connection_id = Uuid::new_v4().to_string();
    tracing::debug!(connection_id = %connection_id, peer = %peer, "Connection opened");

    if let Err(e) = stream.set_nodelay(true) {
        tracing::debug!(error = %e, "Failed to set TCP_NODELAY");
    }
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    // Channel for outgoing frames
    let (tx, mut rx) = mpsc::unbounded_channel::<ResponseFrame>();

    // Forward frames from the channel to the socket
    let writer_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if let Err(e) = write_frame(&mut write_half, &frame).await {
                tracing::debug!(error = %e, "Failed to write response frame");
                break;
            }
        }
    });

    loop {
        let bytes = match read_frame(&mut reader, max_frame_size).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(connection_id = %connection_id, error = %e, "Closing connection");
                break;
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            continue;
        }

        let request = match serde_json::from_slice::<RequestFrame>(&bytes) {
            Ok(request) => request,
            Err(e) => {
                reject_malformed(&bytes, &tx, &e);
                continue;
            }
        };

        if !dispatcher.handles(&request.pattern.cmd) {
            tracing::warn!(
                service = dispatcher.service(),
                command = %request.pattern.cmd,
                "No handler for command"
            );
            let _ = tx.send(ResponseFrame::rejected(request.id, NO_MATCHING_HANDLER));
            continue;
        }

        let dispatcher = dispatcher.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let RequestFrame { id, pattern, data } = request;
            tracing::debug!(request_id = %id, command = %pattern.cmd, "Dispatching command");

            let envelope = dispatcher.dispatch(&pattern.cmd, data).await;
            let _ = tx.send(ResponseFrame::reply(id, envelope));
        });
    }

    // In-flight requests hold their own senders; the writer drains them.
    drop(tx);
    let _ = writer_task.await;
    tracing::debug!(connection_id = %connection_id, "Connection closed");
}

/// Answer an undecodable frame when it still carries a usable id.
fn reject_malformed(bytes: &[u8], tx: &mpsc::UnboundedSender<ResponseFrame>, error: &serde_json::Error) {
    let id = serde_json::from_slice::<Value>(bytes)
        .ok()
        .and_then(|v| v.get("id").and_then(Value::as_str).map(str::to_string));

    match id {
        Some(id) => {
            tracing::debug!(request_id = %id, error = %error, "Malformed request frame");
            let _ = tx.send(ResponseFrame::rejected(id, MALFORMED_REQUEST));
        }
        None => tracing::warn!(error = %error, "Dropping frame without id"),
    }
}
