//! Local static JSON store.
//!
//! Reads same-origin static resources through the fetch primitive. A route
//! is tried in folder form first (`<base>/<path>/index.json`), then in
//! flat form (`<base>/<path>.json`) when the folder form answers an HTTP
//! failure and the route is not root.

use super::{DataStore, ServiceInfo};
use crate::error::{ErrorKind, StructuredError};
use crate::fetch::{FetchError, Fetcher};
use crate::log;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

pub const LOCAL_STORE_NAME: &str = "local";

/// Always-configured store of last resort.
pub struct LocalStore {
    fetcher: Arc<dyn Fetcher>,
    /// Base of the static JSON tree, no leading or trailing slash.
    base: String,
}

impl LocalStore {
    pub fn new(fetcher: Arc<dyn Fetcher>, base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            fetcher,
            base: base.trim_matches('/').to_string(),
        }
    }

    /// Folder-form location for a route: `/` maps to the tree root index.
    fn folder_location(&self, path: &str) -> String {
        if path == "/" {
            format!("{}/index.json", self.base)
        } else {
            format!("{}{}/index.json", self.base, path)
        }
    }

    /// Flat-form location for a non-root route.
    fn flat_location(&self, path: &str) -> String {
        format!("{}{}.json", self.base, path)
    }

    /// Classify a fetch failure of the final attempt.
    fn classify(&self, err: FetchError, path: &str, location: &str) -> StructuredError {
        let classified = match err.status() {
            Some(404) => StructuredError::not_found(format!("Page not found: {path}")),
            Some(status) => StructuredError::new(
                ErrorKind::FileError,
                status,
                format!("Failed to load local file: {location}"),
            ),
            None => StructuredError::new(
                ErrorKind::FileError,
                500,
                format!("Failed to load page: {path}"),
            ),
        };
        classified
            .with_data_source(LOCAL_STORE_NAME)
            .with_source(err)
    }
}

#[async_trait]
impl DataStore for LocalStore {
    fn name(&self) -> &'static str {
        LOCAL_STORE_NAME
    }

    fn priority(&self) -> u32 {
        2
    }

    fn is_configured(&self) -> bool {
        true
    }

    async fn fetch_json_file(&self, path: &str) -> Result<Value, StructuredError> {
        let folder = self.folder_location(path);
        log!("source"; "loading local file: {folder}");

        match self.fetcher.get_json(&folder).await {
            Ok(value) => Ok(value),
            // A transport failure means the origin itself is unreachable;
            // retrying the flat form would hit the same wall.
            Err(err @ FetchError::Transport { .. }) => Err(self.classify(err, path, &folder)),
            Err(folder_err) => {
                if path == "/" {
                    return Err(self.classify(folder_err, path, &folder));
                }
                let flat = self.flat_location(path);
                log!("source"; "folder form failed, trying flat file: {flat}");
                match self.fetcher.get_json(&flat).await {
                    Ok(value) => Ok(value),
                    Err(flat_err) => Err(self.classify(flat_err, path, &flat)),
                }
            }
        }
    }

    fn service_info(&self) -> ServiceInfo {
        ServiceInfo {
            name: "Local Files".to_string(),
            configured: true,
            base: Some(self.base.clone()),
        }
    }
}
