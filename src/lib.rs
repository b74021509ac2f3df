//! Trellis - a JSON-driven page composition engine.
//!
//! Pages are described declaratively as ordered lists of typed component
//! references with props. The engine resolves each reference to a
//! renderable unit, loads it on demand, and composes the page:
//!
//! - [`registry::ComponentRegistry`] indexes renderable units from a
//!   build-time manifest and loads only the subset a page references.
//! - [`store::DataSourceManager`] resolves page JSON from a remote edge
//!   store or the local static tree, with preference, priority ordering,
//!   and fallback-on-failure semantics.
//! - [`page::PageController`] drives the per-route lifecycle and contains
//!   render failures behind a fault-isolation boundary.
//!
//! The engine is read-only against its data sources and knows nothing
//! about what the units draw.

pub mod config;
pub mod error;
pub mod fetch;
pub mod logger;
pub mod page;
pub mod registry;
pub mod render;
pub mod store;

pub use config::{BuildMode, RendererConfig, SourcePreference};
pub use error::{ErrorKind, StructuredError};
pub use page::{PageController, PageDocument, PageView, RenderOptions};
pub use registry::{ComponentRegistry, ManifestEntry};
pub use render::{Props, Renderable};
pub use store::{DataSourceManager, DataStore, LocalStore, RemoteStore};
