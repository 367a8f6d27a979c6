//! Command Channel Message Types
//!
//! Frames are single-line JSON objects terminated by `\n`.
//!
//! ```text
//! -> {"id":"<uuid>","pattern":{"cmd":"get_user"},"data":{"id":1}}
//! <- {"id":"<uuid>","response":{"success":true,"data":{...}},"isDisposed":true}
//! <- {"id":"<uuid>","err":"There is no matching message handler defined in the remote service.","isDisposed":true}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::application::dto::Pagination;
use crate::shared::error::AppError;

/// Framework error sent for a command tag the service does not handle.
pub const NO_MATCHING_HANDLER: &str =
    "There is no matching message handler defined in the remote service.";

/// Routing key of a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    pub cmd: String,
}

/// Request frame (gateway -> service)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestFrame {
    /// Correlation id echoed in the response
    pub id: String,
    pub pattern: Pattern,
    #[serde(default)]
    pub data: Value,
}

impl RequestFrame {
    pub fn new(id: impl Into<String>, cmd: impl Into<String>, data: Value) -> Self {
        Self {
            id: id.into(),
            pattern: Pattern { cmd: cmd.into() },
            data,
        }
    }
}

/// Response frame (service -> gateway)
///
/// Exactly one of `response` and `err` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseFrame {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Envelope>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub err: Option<String>,
    #[serde(default)]
    pub is_disposed: bool,
}

impl ResponseFrame {
    /// Handler result for request `id`.
    pub fn reply(id: impl Into<String>, envelope: Envelope) -> Self {
        Self {
            id: id.into(),
            response: Some(envelope),
            err: None,
            is_disposed: true,
        }
    }

    /// Framework-level rejection; no handler ran.
    pub fn rejected(id: impl Into<String>, err: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            response: None,
            err: Some(err.into()),
            is_disposed: true,
        }
    }
}

/// Uniform result of every command.
///
/// `list_users` also carries the paging fields next to `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub pagination: Option<Pagination>,
}

impl Envelope {
    pub fn success(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            pagination: None,
        }
    }

    /// Failed envelope; only the error message crosses the channel.
    pub fn failure(error: &AppError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.to_string()),
            pagination: None,
        }
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }

    /// Serialize `result` into an envelope.
    pub fn from_result<T: Serialize>(result: Result<T, AppError>) -> Self {
        match result.and_then(|value| {
            serde_json::to_value(value).map_err(|e| AppError::Internal(e.to_string()))
        }) {
            Ok(data) => Self::success(data),
            Err(e) => Self::failure(&e),
        }
    }
}

/// Failure to read a frame off the wire.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("frame exceeds {0} bytes")]
    TooLarge(usize),
}

/// Read one `\n`-terminated frame of at most `max_size` bytes.
///
/// Returns `Ok(None)` on a clean end of stream. A final frame without a
/// trailing newline is accepted. The terminator (and a preceding `\r`) is
/// stripped.
pub async fn read_frame<R>(reader: &mut R, max_size: usize) -> Result<Option<Vec<u8>>, FrameError>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let limit = max_size as u64 + 1;
    let n = (&mut *reader).take(limit).read_until(b'\n', &mut buf).await?;
    if n == 0 {
        return Ok(None);
    }

    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    } else if buf.len() > max_size {
        return Err(FrameError::TooLarge(max_size));
    }

    Ok(Some(buf))
}

/// Write `frame` as one JSON line and flush.
pub async fn write_frame<W, T>(writer: &mut W, frame: &T) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let mut line = serde_json::to_vec(frame)?;
    line.push(b'\n');
    writer.write_all(&line).await?;
    writer.flush().await
}
