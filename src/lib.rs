//! OLM bundle generator
//!
//! Builds a versioned Operator Lifecycle Manager bundle from an operator's
//! rendered Kubernetes manifests: a ClusterServiceVersion derived from its
//! RBAC and Deployment manifests, copies of those RBAC manifests, and a
//! package descriptor chaining the new version to the previous one.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod manifests;
pub mod olm;
pub mod store;

pub use config::{BundleConfig, OperatorDescriptor, RoleMatch};
pub use error::{Error, Result};
pub use generator::{BundleGenerator, Outcome};
pub use store::{FilePackageStore, PackageStore};
