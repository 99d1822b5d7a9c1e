//! HTTP transport shared by every component.
//!
//! The transport owns the session credential cell so that attaching the
//! bearer header happens in exactly one place.

mod http;

pub use http::{Access, HttpTransport, Reply};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Other(String),
}

impl TransportError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Http(e) if e.is_timeout())
    }
}
