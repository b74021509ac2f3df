//! Remote edge store.
//!
//! Reads page JSON from a content-delivery endpoint. Content is published
//! to the edge by a separate write path; this client is strictly read-only.
//!
//! Two behaviors are deliberate and load-bearing:
//!
//! - A 404 from the edge propagates as-is, with no local fallback. Absence
//!   at the edge is an answer, not an outage.
//! - Every other failure (403, 5xx, connectivity loss) triggers one
//!   fallback read through the local store before the failure becomes
//!   visible to the caller. If that read also fails, the *original* edge
//!   failure is what propagates, except that a pure connectivity loss is
//!   reported as a status-0 network error.

use super::local::LocalStore;
use super::{DataStore, ServiceInfo};
use crate::error::{ErrorKind, StructuredError};
use crate::fetch::{FetchError, Fetcher};
use crate::log;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

pub const REMOTE_STORE_NAME: &str = "remote";

/// The canonical placeholder domain shipped in configuration templates.
/// Recognized as "not configured" so example config never reaches the wire.
const PLACEHOLDER_DOMAIN: &str = "d1234567890.cloudfront.net";

pub struct RemoteStore {
    fetcher: Arc<dyn Fetcher>,
    domain: Option<String>,
    /// Object key prefix on the endpoint, no leading or trailing slash.
    base_path: String,
    /// Nested fallback of last resort for non-404 failures.
    local: Arc<LocalStore>,
}

impl RemoteStore {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        domain: Option<String>,
        base_path: impl Into<String>,
        local: Arc<LocalStore>,
    ) -> Self {
        let base_path = base_path.into();
        Self {
            fetcher,
            domain,
            base_path: base_path.trim_matches('/').to_string(),
            local,
        }
    }

    /// Map a logical route path to a remote object key.
    ///
    /// `/` becomes `index`; other paths lose their leading and trailing
    /// slashes. The base path prefix and `.json` suffix are always applied.
    fn object_key(&self, path: &str) -> String {
        let page = if path == "/" {
            "index"
        } else {
            path.trim_start_matches('/').trim_end_matches('/')
        };
        format!("{}/{page}.json", self.base_path)
    }

    fn url(&self, path: &str) -> Option<String> {
        let domain = self.domain.as_deref()?;
        Some(format!("https://{domain}/{}", self.object_key(path)))
    }

    /// Classify an HTTP failure from the edge.
    fn classify(err: &FetchError, path: &str) -> StructuredError {
        let classified = match err.status() {
            Some(404) => StructuredError::not_found(format!("Page not found: {path}")),
            Some(403) => StructuredError::new(
                ErrorKind::AccessDenied,
                403,
                "Remote access denied. Check edge endpoint configuration.",
            ),
            Some(status) if status >= 500 => StructuredError::new(
                ErrorKind::ServerError,
                status,
                format!("Remote server error: {status}"),
            ),
            Some(status) => StructuredError::new(
                ErrorKind::Unknown,
                status,
                format!("Remote error: {status}"),
            ),
            None => StructuredError::network("Network error: Unable to connect to remote endpoint"),
        };
        classified.with_data_source(REMOTE_STORE_NAME)
    }
}

#[async_trait]
impl DataStore for RemoteStore {
    fn name(&self) -> &'static str {
        REMOTE_STORE_NAME
    }

    fn priority(&self) -> u32 {
        1
    }

    fn is_configured(&self) -> bool {
        match self.domain.as_deref() {
            None | Some("") => false,
            Some(PLACEHOLDER_DOMAIN) => false,
            Some(domain) => !domain.contains("placeholder"),
        }
    }

    async fn fetch_json_file(&self, path: &str) -> Result<Value, StructuredError> {
        // Unconfigured endpoint: go straight to the local tree.
        let Some(url) = self.url(path).filter(|_| self.is_configured()) else {
            log!("source"; "remote store not configured, using local files");
            return self.local.fetch_json_file(path).await;
        };

        log!("source"; "fetching from remote: {url}");
        let err = match self.fetcher.get_json(&url).await {
            Ok(value) => {
                log!("source"; "successfully loaded from remote: {path}");
                return Ok(value);
            }
            Err(err) => err,
        };

        // 404 is authoritative for the edge; no fallback.
        if err.status() == Some(404) {
            return Err(Self::classify(&err, path).with_source(err));
        }

        log!("source"; "remote failed, falling back to local files");
        match self.local.fetch_json_file(path).await {
            Ok(value) => Ok(value),
            Err(_fallback_err) => Err(Self::classify(&err, path).with_source(err)),
        }
    }

    fn service_info(&self) -> ServiceInfo {
        ServiceInfo {
            name: "Remote Edge".to_string(),
            configured: self.is_configured(),
            base: self
                .domain
                .as_deref()
                .map(|domain| format!("https://{domain}/{}", self.base_path)),
        }
    }
}
