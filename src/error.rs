//! Error types for the OLM bundle generator

use std::path::PathBuf;

/// Result type for the generator
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the generator
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Filesystem error on a specific path
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file could not be parsed as YAML, or did not match the expected schema
    #[error("YAML error in {}: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A document could not be serialized back to YAML
    #[error("failed to serialize {what}: {source}")]
    Serialize {
        what: &'static str,
        #[source]
        source: serde_yaml::Error,
    },

    /// Directory traversal failed
    #[error("failed to walk manifests: {0}")]
    Walk(#[from] walkdir::Error),

    /// A manifest document has no `kind`
    #[error("document in {} is missing .kind", .path.display())]
    MissingKind { path: PathBuf },

    /// A RoleBinding or ClusterRoleBinding without `roleRef.kind`.
    /// OLM does not check this until the InstallPlan fails on the cluster.
    #[error("{kind} '{name}' is missing .roleRef.kind in file {}", .path.display())]
    MissingRoleRefKind {
        kind: String,
        name: String,
        path: PathBuf,
    },

    /// No Deployment named after the operator was found among the manifests
    #[error("no Deployment named '{name}' found in manifests")]
    DeploymentNotFound { name: String },

    /// The operator Deployment has no `spec` to copy into the CSV
    #[error("Deployment '{name}' in {} has no spec", .path.display())]
    DeploymentMissingSpec { name: String, path: PathBuf },

    /// The operator Deployment has no container to stamp the image on
    #[error("Deployment '{name}' has no containers in its pod template")]
    MissingContainer { name: String },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn yaml(path: impl Into<PathBuf>, source: serde_yaml::Error) -> Self {
        Error::Yaml {
            path: path.into(),
            source,
        }
    }
}
