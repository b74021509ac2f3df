//! The fetch primitive: GET a resource and parse it as JSON.
//!
//! Stores never talk to the network or filesystem directly; they go
//! through a [`Fetcher`], so the whole data source chain can be exercised
//! in tests with in-memory fakes.

use async_trait::async_trait;
use serde_json::Value;
use std::io::ErrorKind as IoErrorKind;
use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single fetch attempt, before any store-level classification.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered with a non-2xx status.
    #[error("HTTP {status} for `{location}`")]
    Http { status: u16, location: String },

    /// The request never produced a usable response: connection failure,
    /// unreadable file, malformed JSON.
    #[error("transport failure for `{location}`")]
    Transport {
        location: String,
        #[source]
        source: anyhow::Error,
    },
}

impl FetchError {
    /// HTTP status, if the failure carries one.
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Transport { .. } => None,
        }
    }
}

/// Performs a GET for a resource location and returns parsed JSON.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn get_json(&self, location: &str) -> Result<Value, FetchError>;
}

// ============================================================================
// HTTP Fetcher
// ============================================================================

/// Network-backed fetcher for the remote edge endpoint.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn get_json(&self, location: &str) -> Result<Value, FetchError> {
        let response = self
            .client
            .get(location)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| FetchError::Transport {
                location: location.to_string(),
                source: err.into(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
                location: location.to_string(),
            });
        }

        response.json().await.map_err(|err| FetchError::Transport {
            location: location.to_string(),
            source: err.into(),
        })
    }
}

// ============================================================================
// Directory Fetcher
// ============================================================================

/// Serves static JSON files from a directory tree.
///
/// This is how a non-browser host realizes "same-origin static resources":
/// a missing file is an HTTP-like 404, anything else is a transport failure.
pub struct DirFetcher {
    root: PathBuf,
}

impl DirFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl Fetcher for DirFetcher {
    async fn get_json(&self, location: &str) -> Result<Value, FetchError> {
        let relative = location.trim_start_matches('/');
        let path = self.root.join(relative);

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == IoErrorKind::NotFound => {
                return Err(FetchError::Http {
                    status: 404,
                    location: location.to_string(),
                });
            }
            Err(err) => {
                return Err(FetchError::Transport {
                    location: location.to_string(),
                    source: err.into(),
                });
            }
        };

        serde_json::from_slice(&bytes).map_err(|err| FetchError::Transport {
            location: location.to_string(),
            source: err.into(),
        })
    }
}

// ============================================================================
// Test Fakes
// ============================================================================
