//! Single-client HTTP status server.
//!
//! The server answers every connection with the status page, whatever was
//! requested. Connections are handled strictly one at a time: while one
//! client is being served, others wait in the listen backlog.
//!
//! # Request handling
//!
//! ```text
//! accept ──> read until blank line ──> write 200 + page ──> close
//!                    │
//!                    └── peer closed first ──> close, no response
//! ```
//!
//! The request is never parsed. The server only looks for the blank line
//! that ends the header block: a `\n` seen while the current line is still
//! empty. `\r` bytes do not count as line content.
//!
//! # Example Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use genjen_controller::StateStore;
//! use genjen_network::{StatusServer, StatusServerConfig};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = StatusServerConfig {
//!     bind_addr: "127.0.0.1:8080".parse()?,
//!     ..StatusServerConfig::default()
//! };
//!
//! let server = StatusServer::bind(config, Arc::new(StateStore::default())).await?;
//! server.run(CancellationToken::new()).await?;
//! # Ok(())
//! # }
//! ```

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use bytes::BytesMut;
use genjen_controller::StateStore;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::page::{StatusView, render_response};

/// Request bytes kept for trace logging. Bytes beyond this are still
/// scanned for the end of the headers, just not kept.
const MAX_LOGGED_REQUEST: usize = 4096;

/// Configuration for the status server
///
/// # Example
///
/// ```
/// use genjen_network::StatusServerConfig;
///
/// let config: StatusServerConfig =
///     serde_json::from_str(r#"{ "bind_addr": "127.0.0.1:8080", "live_status": true }"#).unwrap();
///
/// assert!(config.live_status);
/// assert_eq!(config.read_timeout_ms, Some(10_000));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusServerConfig {
    /// Address to bind the server to
    pub bind_addr: SocketAddr,

    /// Show the published mode and alarm log instead of the fixed page
    pub live_status: bool,

    /// Give up on a client that has not finished its headers in time
    pub read_timeout_ms: Option<u64>,
}

impl Default for StatusServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 80)),
            live_status: false,
            read_timeout_ms: Some(10_000),
        }
    }
}

impl StatusServerConfig {
    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout_ms.map(Duration::from_millis)
    }
}

/// Errors that can occur during status server operations
#[derive(Debug, Error)]
pub enum StatusServerError {
    /// Failed to bind to address
    #[error("Failed to bind to {addr}: {source}")]
    BindFailed {
        addr: SocketAddr,
        source: std::io::Error,
    },

    /// Low-level I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// How a single connection ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServeOutcome {
    /// The headers were complete and the page was sent.
    Responded,

    /// The peer closed the connection before finishing its headers.
    ClosedEarly,

    /// The peer did not finish its headers within the read timeout.
    TimedOut,
}

/// Detects the blank line that ends an HTTP header block.
///
/// # Examples
///
/// ```
/// use genjen_network::HeaderTerminator;
///
/// let mut terminator = HeaderTerminator::new();
/// let request = b"GET / HTTP/1.1\r\nHost: panel\r\n\r\n";
///
/// let end = request.iter().position(|&b| terminator.feed(b));
/// assert_eq!(end, Some(request.len() - 1));
/// ```
#[derive(Debug, Clone)]
pub struct HeaderTerminator {
    current_line_blank: bool,
}

impl HeaderTerminator {
    pub fn new() -> Self {
        Self {
            current_line_blank: true,
        }
    }

    /// Feed one byte. Returns `true` when it completes the header block.
    pub fn feed(&mut self, byte: u8) -> bool {
        match byte {
            b'\n' if self.current_line_blank => true,
            b'\n' => {
                self.current_line_blank = true;
                false
            }
            b'\r' => false,
            _ => {
                self.current_line_blank = false;
                false
            }
        }
    }

    /// Feed a chunk. Returns the index of the byte that completed the
    /// header block, if any.
    pub fn scan(&mut self, bytes: &[u8]) -> Option<usize> {
        bytes.iter().position(|&b| self.feed(b))
    }
}

impl Default for HeaderTerminator {
    fn default() -> Self {
        Self::new()
    }
}

/// Status page server
///
/// # Thread Safety
///
/// `run` consumes the server and serves from a single task. The only
/// shared state is the [`StateStore`], which is read, never written.
pub struct StatusServer {
    /// TCP listener for accepting new connections
    listener: TcpListener,

    /// Server configuration
    config: StatusServerConfig,

    /// Published controller state
    store: Arc<StateStore>,
}

impl StatusServer {
    /// Bind the server to the configured address
    ///
    /// # Errors
    ///
    /// Returns `StatusServerError::BindFailed` if:
    /// - Address is already in use
    /// - Permission denied (e.g., binding to port 80 without privileges)
    pub async fn bind(
        config: StatusServerConfig,
        store: Arc<StateStore>,
    ) -> Result<Self, StatusServerError> {
        let listener = TcpListener::bind(config.bind_addr)
            .await
            .map_err(|source| StatusServerError::BindFailed {
                addr: config.bind_addr,
                source,
            })?;

        info!(
            addr = %listener.local_addr()?,
            live_status = config.live_status,
            "Status server listening"
        );

        Ok(Self {
            listener,
            config,
            store,
        })
    }

    /// Address the server is actually bound to
    pub fn local_addr(&self) -> Result<SocketAddr, StatusServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve connections one at a time until cancelled
    ///
    /// Failures of individual connections are logged and do not stop the
    /// server.
    ///
    /// # Errors
    ///
    /// Currently always returns `Ok` once cancelled; accept errors are
    /// logged and retried.
    pub async fn run(self, cancel: CancellationToken) -> Result<(), StatusServerError> {
        loop {
            let accepted = tokio::select! {
                _ = cancel.cancelled() => break,
                accepted = self.listener.accept() => accepted,
            };

            let (stream, peer) = match accepted {
                Ok(connection) => connection,
                Err(e) => {
                    warn!(error = %e, "Failed to accept connection");
                    continue;
                }
            };

            let served = tokio::select! {
                _ = cancel.cancelled() => break,
                served = self.serve_client(stream, peer) => served,
            };

            match served {
                Ok(outcome) => debug!(%peer, ?outcome, "Connection closed"),
                Err(e) => warn!(%peer, error = %e, "Connection failed"),
            }
        }

        info!("Status server stopped");
        Ok(())
    }

    /// Serve a single connection and close it
    ///
    /// # Errors
    ///
    /// Returns an error if reading the request or writing the response
    /// fails.
    pub async fn serve_client(
        &self,
        mut stream: TcpStream,
        peer: SocketAddr,
    ) -> Result<ServeOutcome, StatusServerError> {
        debug!(%peer, "Client connected");

        let complete = match self.config.read_timeout() {
            Some(limit) => match tokio::time::timeout(limit, read_headers(&mut stream)).await {
                Ok(complete) => complete?,
                Err(_) => {
                    debug!(%peer, "Timed out waiting for request headers");
                    return Ok(ServeOutcome::TimedOut);
                }
            },
            None => read_headers(&mut stream).await?,
        };

        if !complete {
            return Ok(ServeOutcome::ClosedEarly);
        }

        let view = if self.config.live_status {
            StatusView::live(&self.store).await
        } else {
            StatusView::fixed()
        };

        stream.write_all(render_response(&view).as_bytes()).await?;
        stream.shutdown().await?;
        Ok(ServeOutcome::Responded)
    }
}

/// Read until the end of the header block.
///
/// Returns `false` if the peer closed the connection first.
async fn read_headers(stream: &mut TcpStream) -> Result<bool, StatusServerError> {
    let mut terminator = HeaderTerminator::new();
    let mut request = BytesMut::with_capacity(512);
    let mut chunk = [0u8; 512];

    loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            trace!(request = %String::from_utf8_lossy(&request), "Request incomplete");
            return Ok(false);
        }

        let received = &chunk[..n];
        let end = terminator.scan(received);

        let keep = end.map_or(n, |i| i + 1);
        let room = MAX_LOGGED_REQUEST.saturating_sub(request.len());
        request.extend_from_slice(&received[..keep.min(room)]);

        if end.is_some() {
            trace!(request = %String::from_utf8_lossy(&request), "Request received");
            return Ok(true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(b"GET / HTTP/1.1\r\n\r\n".as_slice(), Some(17))]
    #[case(b"GET / HTTP/1.1\n\n".as_slice(), Some(15))]
    #[case(b"\n".as_slice(), Some(0))]
    #[case(b"\r\n".as_slice(), Some(1))]
    #[case(b"GET / HTTP/1.1\r\nHost: x\r\n".as_slice(), None)]
    #[case(b"GET / HTTP/1.1\r\n \r\n".as_slice(), None)]
    fn test_header_terminator(#[case] bytes: &[u8], #[case] expected: Option<usize>) {
        assert_eq!(HeaderTerminator::new().scan(bytes), expected);
    }

    #[test]
    fn test_header_terminator_across_chunks() {
        let mut terminator = HeaderTerminator::new();

        assert_eq!(terminator.scan(b"GET / HTTP/1.1\r\nHost: x\r"), None);
        assert_eq!(terminator.scan(b"\n\r"), None);
        assert_eq!(terminator.scan(b"\n"), Some(0));
    }

    #[test]
    fn test_default_config() {
        let config = StatusServerConfig::default();

        assert_eq!(config.bind_addr.port(), 80);
        assert!(!config.live_status);
        assert_eq!(config.read_timeout(), Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_config_without_timeout() {
        let config: StatusServerConfig =
            serde_json::from_str(r#"{ "read_timeout_ms": null }"#).unwrap();
        assert_eq!(config.read_timeout(), None);
    }

    #[tokio::test]
    async fn test_bind_failure() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let config = StatusServerConfig {
            bind_addr: taken.local_addr().unwrap(),
            ..StatusServerConfig::default()
        };

        let result = StatusServer::bind(config, Arc::new(StateStore::default())).await;

        assert!(matches!(result, Err(StatusServerError::BindFailed { .. })));
    }
}
