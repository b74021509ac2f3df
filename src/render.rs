//! The renderable unit contract.
//!
//! A renderable unit turns a props object into visual output. Units are
//! content: the engine never knows what they draw, only that they satisfy
//! this trait. Props are every field of the referencing
//! [`ComponentReference`](crate::page::ComponentReference) except `type`.

use serde_json::{Map, Value};

/// Props object forwarded verbatim to a unit.
pub type Props = Map<String, Value>;

/// A self-contained producer of visual output.
pub trait Renderable: Send + Sync {
    /// Render the unit for the given props. Any error here is contained
    /// by the page's fault-isolation boundary, never by the unit itself.
    fn render(&self, props: &Props) -> anyhow::Result<String>;

    /// Optional self-describing metadata (role tags, prop shape, example
    /// payloads) for external authoring tooling. Opaque to the engine.
    fn schema(&self) -> Option<Value> {
        None
    }
}

impl std::fmt::Debug for dyn Renderable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn Renderable")
    }
}

/// Adapter for building a unit from a plain function.
pub struct FnRenderable<F>(pub F);

impl<F> Renderable for FnRenderable<F>
where
    F: Fn(&Props) -> anyhow::Result<String> + Send + Sync,
{
    fn render(&self, props: &Props) -> anyhow::Result<String> {
        (self.0)(props)
    }
}
