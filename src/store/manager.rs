//! Data source manager.
//!
//! Orchestrates the registered stores under a single preference:
//!
//! - `auto` walks configured stores in ascending priority order and takes
//!   the first success; every failure (404 included) moves on to the next
//!   store, because each store may hold different content.
//! - A named preference is a hard operator decision: the named store is
//!   used alone, and its failures are enriched and rethrown, never
//!   recovered. Silently substituting another source would mask
//!   misconfiguration.

use super::{DataStore, ServiceInfo};
use crate::config::SourcePreference;
use crate::error::{ErrorKind, StructuredError};
use crate::{log, warn};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

pub struct DataSourceManager {
    stores: Vec<Arc<dyn DataStore>>,
    preference: SourcePreference,
}

/// One row of the status snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStatus {
    pub name: String,
    pub priority: u32,
    pub configured: bool,
    pub info: ServiceInfo,
}

/// Full status snapshot for operator tooling.
#[derive(Debug, Clone, Serialize)]
pub struct ServicesStatus {
    /// Name of the store `fetch_json_file` would try first.
    pub primary: Option<String>,
    pub preference: String,
    pub services: Vec<ServiceStatus>,
}

impl DataSourceManager {
    pub fn new(stores: Vec<Arc<dyn DataStore>>, preference: SourcePreference) -> Self {
        Self { stores, preference }
    }

    /// Configured stores, ascending by priority.
    pub fn available_services(&self) -> Vec<Arc<dyn DataStore>> {
        let mut available: Vec<_> = self
            .stores
            .iter()
            .filter(|store| store.is_configured())
            .cloned()
            .collect();
        available.sort_by_key(|store| store.priority());
        available
    }

    /// The store `fetch_json_file` would consult first.
    ///
    /// A named preference that is not available falls through to
    /// auto-detection with a warning.
    pub fn primary_service(&self) -> Option<Arc<dyn DataStore>> {
        let available = self.available_services();

        if let SourcePreference::Named(name) = &self.preference {
            match available.iter().find(|store| store.name() == name) {
                Some(preferred) => {
                    log!("source"; "using preferred data source: {name}");
                    return Some(preferred.clone());
                }
                None => {
                    warn!("source"; "preferred data source \"{name}\" not available, using auto-detect");
                }
            }
        }

        available.into_iter().next()
    }

    /// Resolve a route path to page JSON through the store chain.
    pub async fn fetch_json_file(&self, path: &str) -> Result<Value, StructuredError> {
        match &self.preference {
            SourcePreference::Named(name) => self.fetch_preferred(name, path).await,
            SourcePreference::Auto => self.fetch_auto(path).await,
        }
    }

    /// Specific-preference mode: one store, no fallback.
    async fn fetch_preferred(&self, name: &str, path: &str) -> Result<Value, StructuredError> {
        let available = self.available_services();
        let Some(preferred) = available.iter().find(|store| store.name() == name) else {
            return Err(StructuredError::new(
                ErrorKind::ConnectionError,
                500,
                format!("Specified data source \"{name}\" is not configured or available"),
            ));
        };

        log!("source"; "using specified data source: {name} for: {path}");
        match preferred.fetch_json_file(path).await {
            Ok(value) => {
                log!("source"; "successfully loaded from {name}: {path}");
                Ok(value)
            }
            Err(err) => {
                warn!("source"; "{name} failed (no fallback): {}", err.message);
                // Status 0 (connectivity) is reported as a plain 500 here;
                // the operator pinned this source and gets its raw outcome.
                let status = if err.status == 0 { 500 } else { err.status };
                Err(StructuredError::new(
                    err.kind,
                    status,
                    format!("{} connection failed: {}", name.to_uppercase(), err.message),
                )
                .with_data_source(name)
                .with_source(err))
            }
        }
    }

    /// Auto mode: walk the priority chain until a store answers.
    async fn fetch_auto(&self, path: &str) -> Result<Value, StructuredError> {
        let mut last_error: Option<StructuredError> = None;

        for store in self.available_services() {
            log!("source"; "trying {} service for: {path}", store.name());
            match store.fetch_json_file(path).await {
                Ok(value) => {
                    log!("source"; "successfully loaded from {}: {path}", store.name());
                    return Ok(value);
                }
                Err(err) => {
                    warn!("source"; "{} failed: {}", store.name(), err.message);
                    last_error = Some(err);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            StructuredError::new(
                ErrorKind::Unknown,
                500,
                format!("All data services failed for: {path}"),
            )
        }))
    }

    /// Status snapshot of every registered store.
    pub fn services_status(&self) -> ServicesStatus {
        let services = self
            .stores
            .iter()
            .map(|store| ServiceStatus {
                name: store.name().to_string(),
                priority: store.priority(),
                configured: store.is_configured(),
                info: store.service_info(),
            })
            .collect();

        ServicesStatus {
            primary: self.primary_service().map(|store| store.name().to_string()),
            preference: match &self.preference {
                SourcePreference::Auto => "auto".to_string(),
                SourcePreference::Named(name) => name.clone(),
            },
            services,
        }
    }
}
