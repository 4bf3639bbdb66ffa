//! Status page server for GenJen
//!
//! This crate serves the controller's status page over plain HTTP. It does
//! not route or parse requests: every client gets the same page once its
//! headers are complete, and the connection is closed after the response.
//!
//! # Components
//!
//! - **StatusServer**: Sequential TCP server, one client at a time
//! - **StatusView**: What the page shows, either fixed or read from the
//!   controller's published state
//! - **render_response**: Status line, headers and page as one CRLF text
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use genjen_controller::StateStore;
//! use genjen_network::{StatusServer, StatusServerConfig};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(StateStore::default());
//! let server = StatusServer::bind(StatusServerConfig::default(), store).await?;
//!
//! let cancel = CancellationToken::new();
//! server.run(cancel.child_token()).await?;
//! # Ok(())
//! # }
//! ```

mod page;
mod server;

pub use page::{
    AlarmRow, CRLF, RESPONSE_HEADERS, StatusView, render_response, render_status_page,
};
pub use server::{
    HeaderTerminator, ServeOutcome, StatusServer, StatusServerConfig, StatusServerError,
};
