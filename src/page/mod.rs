//! Page composition: wire types, the navigation controller, and the
//! fault-isolation boundary.

mod boundary;
mod controller;
mod types;

pub use boundary::{
    Diagnostics, ErrorPresentation, Translator, identity_translator, present,
};
pub use controller::{ComposedPage, PageController, PageView, RenderOptions};
pub use types::{ComponentReference, PageDocument};
