//! Generator configuration and the on-disk catalog layout

use std::path::{Path, PathBuf};

use crate::olm::csv_name;

/// Default catalog root, relative to the working directory
pub const DEFAULT_CATALOG_ROOT: &str = "catalog-manifests";

/// Default CSV skeleton, relative to the working directory
pub const DEFAULT_CSV_TEMPLATE: &str = "scripts/templates/csv.yaml";

/// Subdirectory of the operator directory holding rendered manifests
pub const MANIFESTS_SUBDIR: &str = "manifests";

/// The operator being published
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperatorDescriptor {
    pub name: String,
    pub namespace: String,
    pub version: String,
    pub image: String,
    pub channel: String,
}

impl OperatorDescriptor {
    /// Service account the operator runs as; always named after the operator
    pub fn service_account(&self) -> &str {
        &self.name
    }

    /// `<name>.v<version>`
    pub fn csv_name(&self) -> String {
        csv_name(&self.name, &self.version)
    }
}

/// How ClusterRole names are compared with the roles bound to the operator
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RoleMatch {
    /// The ClusterRole name occurs anywhere inside a bound role name
    #[default]
    Substring,
    /// The ClusterRole name equals a bound role name
    Exact,
}

impl RoleMatch {
    pub fn matches(self, cluster_role: &str, bound_role: &str) -> bool {
        match self {
            RoleMatch::Substring => bound_role.contains(cluster_role),
            RoleMatch::Exact => bound_role == cluster_role,
        }
    }
}

/// Everything one generator run needs
#[derive(Clone, Debug)]
pub struct BundleConfig {
    pub operator: OperatorDescriptor,
    /// Operator directory; manifests live under `<operator_dir>/manifests`
    pub operator_dir: PathBuf,
    pub catalog_root: PathBuf,
    pub csv_template: PathBuf,
    pub role_match: RoleMatch,
}

impl BundleConfig {
    pub fn new(operator: OperatorDescriptor, operator_dir: impl Into<PathBuf>) -> Self {
        Self {
            operator,
            operator_dir: operator_dir.into(),
            catalog_root: PathBuf::from(DEFAULT_CATALOG_ROOT),
            csv_template: PathBuf::from(DEFAULT_CSV_TEMPLATE),
            role_match: RoleMatch::default(),
        }
    }

    pub fn with_catalog_root(mut self, catalog_root: impl Into<PathBuf>) -> Self {
        self.catalog_root = catalog_root.into();
        self
    }

    pub fn with_csv_template(mut self, csv_template: impl Into<PathBuf>) -> Self {
        self.csv_template = csv_template.into();
        self
    }

    pub fn with_role_match(mut self, role_match: RoleMatch) -> Self {
        self.role_match = role_match;
        self
    }

    pub fn manifests_dir(&self) -> PathBuf {
        self.operator_dir.join(MANIFESTS_SUBDIR)
    }

    /// `<catalog_root>/<name>`
    pub fn catalog_dir(&self) -> PathBuf {
        self.catalog_root.join(&self.operator.name)
    }

    /// `<catalog_root>/<name>/<version>`
    pub fn version_dir(&self) -> PathBuf {
        self.catalog_dir().join(&self.operator.version)
    }

    /// `<catalog_root>/<name>/<name>.package.yaml`
    pub fn package_file(&self) -> PathBuf {
        self.catalog_dir()
            .join(format!("{}.package.yaml", self.operator.name))
    }

    /// `<version_dir>/<name>.v<version>.clusterserviceversion.yaml`
    pub fn csv_file(&self) -> PathBuf {
        self.version_dir()
            .join(format!("{}.clusterserviceversion.yaml", self.operator.csv_name()))
    }

    pub fn csv_template(&self) -> &Path {
        &self.csv_template
    }
}
