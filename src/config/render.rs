//! `[render]` section configuration.
//!
//! Build mode and the reserved debug-route prefix.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// Build mode. Gates debug-route access and error verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    Development,
    Production,
}

impl BuildMode {
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("production") {
            Self::Production
        } else {
            Self::Development
        }
    }

    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

/// `[render]` section in trellis.toml.
///
/// # Example
/// ```toml
/// [render]
/// mode = "production"
/// debug_prefix = "/tests"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct RenderConfig {
    /// `development` (default) or `production`.
    #[serde(default = "defaults::render::mode")]
    #[educe(Default = defaults::render::mode())]
    pub mode: String,

    /// Route prefix reserved for debug/test pages. Hard 404 in production.
    #[serde(default = "defaults::render::debug_prefix")]
    #[educe(Default = defaults::render::debug_prefix())]
    pub debug_prefix: String,
}

impl RenderConfig {
    /// Typed view of the `mode` field.
    pub fn mode(&self) -> BuildMode {
        BuildMode::parse(&self.mode)
    }
}
