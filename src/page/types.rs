//! Page document wire types.
//!
//! A page is an ordered list of typed component references plus arbitrary
//! page-level metadata the engine never interprets.

use crate::render::Props;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The unit of content for one route. Fetched fresh on every navigation,
/// immutable once received, discarded on navigation away.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageDocument {
    /// Ordered component references. Rendering order is exactly this order.
    /// Absent in malformed documents; the controller rejects those.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<Vec<ComponentReference>>,

    /// Page-level metadata, passed through untouched.
    #[serde(flatten)]
    pub meta: Props,
}

/// One entry in `components`: which unit to use, and its props.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentReference {
    /// Logical name of the renderable unit.
    #[serde(rename = "type")]
    pub component_type: String,

    /// Everything except `type`, forwarded verbatim to the unit.
    #[serde(flatten)]
    pub props: Props,
}

impl PageDocument {
    /// Parse a fetched JSON value into a document.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Distinct component types in first-appearance order. Loading is
    /// proportional to this set, not to the entry count.
    pub fn distinct_types(&self) -> Vec<String> {
        let mut types: Vec<String> = Vec::new();
        for reference in self.components.as_deref().unwrap_or_default() {
            if !types.iter().any(|t| t == &reference.component_type) {
                types.push(reference.component_type.clone());
            }
        }
        types
    }
}
