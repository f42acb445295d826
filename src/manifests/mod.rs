//! Kubernetes manifests consumed by the bundle generator

mod document;
mod loader;

pub use document::*;
pub use loader::*;
