//! Normalized failure taxonomy shared by stores, registry, and page controller.
//!
//! Every failure that can reach the presentation boundary is a
//! [`StructuredError`]: a kind from a fixed taxonomy, an HTTP-like status
//! (0 for pure connectivity loss), a human-readable message, and optionally
//! the store that produced it plus the causing error for diagnostics.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed failure taxonomy. Matched exhaustively at the presentation boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    NotFound,
    AccessDenied,
    ServerError,
    RateLimit,
    /// Pure connectivity failure, always status 0.
    NetworkError,
    FileError,
    /// Wraps a failure of an explicitly preferred data source.
    ConnectionError,
    ComponentError,
    Unknown,
}

impl ErrorKind {
    /// Wire/display name, e.g. `NOT_FOUND`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::AccessDenied => "ACCESS_DENIED",
            Self::ServerError => "SERVER_ERROR",
            Self::RateLimit => "RATE_LIMIT",
            Self::NetworkError => "NETWORK_ERROR",
            Self::FileError => "FILE_ERROR",
            Self::ConnectionError => "CONNECTION_ERROR",
            Self::ComponentError => "COMPONENT_ERROR",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified failure, constructed at the point of detection and
/// possibly re-wrapped as it propagates up through the data source manager.
#[derive(Debug, Error)]
#[error("[{kind}] {message}")]
pub struct StructuredError {
    pub kind: ErrorKind,
    /// HTTP-like status. 0 means the request never reached the server.
    pub status: u16,
    pub message: String,
    /// Which store produced the failure, when known.
    pub data_source: Option<String>,
    /// The causing error, kept for diagnostics only.
    pub source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl StructuredError {
    pub fn new(kind: ErrorKind, status: u16, message: impl Into<String>) -> Self {
        Self {
            kind,
            status,
            message: message.into(),
            data_source: None,
            source: None,
        }
    }

    /// 404 with `NOT_FOUND` kind.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, 404, message)
    }

    /// Status-0 connectivity failure.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NetworkError, 0, message)
    }

    pub fn with_data_source(mut self, name: impl Into<String>) -> Self {
        self.data_source = Some(name.into());
        self
    }

    pub fn with_source(
        mut self,
        source: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    ) -> Self {
        self.source = Some(source.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_wire_names() {
        assert_eq!(ErrorKind::NotFound.as_str(), "NOT_FOUND");
        assert_eq!(ErrorKind::ConnectionError.as_str(), "CONNECTION_ERROR");
        assert_eq!(
            serde_json::to_value(ErrorKind::AccessDenied).unwrap(),
            serde_json::json!("ACCESS_DENIED")
        );
    }

    #[test]
    fn test_display_includes_kind_and_message() {
        let err = StructuredError::not_found("Page not found: /about");
        let display = format!("{err}");
        assert!(display.contains("NOT_FOUND"));
        assert!(display.contains("/about"));
        assert_eq!(err.status, 404);
    }

    #[test]
    fn test_network_error_has_status_zero() {
        let err = StructuredError::network("Unable to connect");
        assert_eq!(err.status, 0);
        assert_eq!(err.kind, ErrorKind::NetworkError);
    }

    #[test]
    fn test_source_chain_preserved() {
        let cause = anyhow::anyhow!("tcp reset");
        let err = StructuredError::new(ErrorKind::ServerError, 500, "edge failure")
            .with_data_source("remote")
            .with_source(cause);
        assert_eq!(err.data_source.as_deref(), Some("remote"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
