//! `[sources]` section configuration.
//!
//! Controls which data source serves page JSON and how the remote edge
//! endpoint is addressed.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// Operator choice of data source.
///
/// `Auto` walks configured stores in priority order; `Named` pins one
/// store and disables fallback entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourcePreference {
    Auto,
    Named(String),
}

impl SourcePreference {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("auto") {
            Self::Auto
        } else {
            Self::Named(raw.to_ascii_lowercase())
        }
    }

    pub const fn is_auto(&self) -> bool {
        matches!(self, Self::Auto)
    }
}

/// `[sources]` section in trellis.toml - data source settings.
///
/// # Example
/// ```toml
/// [sources]
/// preference = "auto"               # "auto", "remote" or "local"
/// remote_domain = "cdn.example.net"
/// remote_path = "database/json"
/// local_base = "database/json"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SourcesConfig {
    /// Preferred data source: `auto` or a store name (`remote`, `local`).
    #[serde(default = "defaults::sources::preference")]
    #[educe(Default = defaults::sources::preference())]
    pub preference: String,

    /// Remote edge endpoint domain, e.g. `d1234abcd.cloudfront.net`.
    /// Unset (or a placeholder value) means the remote store is not configured.
    #[serde(default = "defaults::sources::remote_domain")]
    #[educe(Default = defaults::sources::remote_domain())]
    pub remote_domain: Option<String>,

    /// Object key prefix on the remote endpoint (default: `database/json`).
    #[serde(default = "defaults::sources::remote_path")]
    #[educe(Default = defaults::sources::remote_path())]
    pub remote_path: String,

    /// Base of the local static JSON tree (default: `database/json`).
    #[serde(default = "defaults::sources::local_base")]
    #[educe(Default = defaults::sources::local_base())]
    pub local_base: String,
}

impl SourcesConfig {
    /// Typed view of the `preference` field.
    pub fn preference(&self) -> SourcePreference {
        SourcePreference::parse(&self.preference)
    }
}
