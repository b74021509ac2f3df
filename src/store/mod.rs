//! Backing stores for page JSON.
//!
//! A store resolves a logical route path (`/`, `/about`, `/blog/post-1`)
//! to a page document. The [`DataStore`] trait is the seam between the
//! data source manager and the concrete stores: the remote edge endpoint
//! and the local static tree. Future stores implement the same three
//! operations plus a status snapshot.

mod local;
mod manager;
mod remote;

pub use local::LocalStore;
pub use manager::{DataSourceManager, ServiceStatus, ServicesStatus};
pub use remote::RemoteStore;

use crate::error::StructuredError;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

/// A backing source of page JSON.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Stable store name, used as the preference key and in diagnostics.
    fn name(&self) -> &'static str;

    /// Lower priority is tried earlier in auto mode. The local store is
    /// always last.
    fn priority(&self) -> u32;

    /// Whether the store has usable configuration. The local store always
    /// answers true; it is the guaranteed fallback of last resort.
    fn is_configured(&self) -> bool;

    /// Resolve a logical route path to page JSON.
    async fn fetch_json_file(&self, path: &str) -> Result<Value, StructuredError>;

    /// Status snapshot for operator tooling.
    fn service_info(&self) -> ServiceInfo;
}

/// Per-store status snapshot, serializable for the status CLI.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceInfo {
    pub name: String,
    pub configured: bool,
    /// Resolved base URL or base path the store reads from, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
}
