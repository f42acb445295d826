//! ClusterServiceVersion assembly from a template and the operator manifests

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::config::{OperatorDescriptor, RoleMatch};
use crate::manifests::{Manifest, ManifestFile, ManifestKind, ManifestSet};
use crate::olm::{ClusterPermission, ClusterServiceVersion, StrategyDeployment};
use crate::{Error, Result};

const DESCRIPTION_PREFIX: &str = "SRE operator - ";

/// Builds the CSV for one operator version
pub struct CsvBuilder<'a> {
    operator: &'a OperatorDescriptor,
    role_match: RoleMatch,
    csv: ClusterServiceVersion,
    deployment: Option<StrategyDeployment>,
}

impl<'a> CsvBuilder<'a> {
    /// Start from `template` with the operator's identity filled in
    pub fn new(
        mut template: ClusterServiceVersion,
        operator: &'a OperatorDescriptor,
        role_match: RoleMatch,
    ) -> Self {
        let metadata = &mut template.metadata;
        metadata.name = Some(operator.csv_name());
        metadata.namespace = Some(operator.namespace.clone());
        metadata.container_image = Some(operator.image.clone());

        let spec = &mut template.spec;
        spec.display_name = Some(operator.name.clone());
        spec.description = Some(format!("{}{}", DESCRIPTION_PREFIX, operator.name));
        spec.version = Some(operator.version.clone());
        spec.install.spec.cluster_permissions.clear();
        spec.install.spec.deployments.clear();

        Self {
            operator,
            role_match,
            csv: template,
            deployment: None,
        }
    }

    /// Fold cluster permissions and the operator Deployment into the CSV.
    ///
    /// Every binding is checked for `roleRef.kind` before anything is returned.
    /// The result lists the RBAC files to copy into the bundle, once each.
    pub fn fold_manifests<'m>(
        &mut self,
        manifests: &'m ManifestSet,
        bound_roles: &[String],
    ) -> Result<Vec<&'m ManifestFile>> {
        let mut catalog_files: Vec<&'m ManifestFile> = Vec::new();

        for (file, manifest) in manifests.documents() {
            match manifest.kind {
                ManifestKind::ClusterRole if self.is_bound(manifest, bound_roles) => {
                    info!("Adding ClusterRole to CSV: {}", file.path.display());
                    self.csv
                        .spec
                        .install
                        .spec
                        .cluster_permissions
                        .push(ClusterPermission {
                            rules: manifest.policy_rules(&file.path)?,
                            service_account_name: self.operator.service_account().to_string(),
                        });
                }
                ManifestKind::Deployment if manifest.name() == Some(self.operator.name.as_str()) => {
                    let spec = manifest.spec().ok_or_else(|| Error::DeploymentMissingSpec {
                        name: self.operator.name.clone(),
                        path: file.path.clone(),
                    })?;
                    info!("Adding Deployment to CSV: {}", file.path.display());
                    self.deployment = Some(StrategyDeployment {
                        name: self.operator.name.clone(),
                        spec: spec.clone(),
                    });
                }
                _ => {}
            }

            if !manifest.kind.is_rbac() {
                continue;
            }

            if manifest.kind.is_binding() {
                let role_kind =
                    manifest
                        .role_ref_kind()
                        .ok_or_else(|| Error::MissingRoleRefKind {
                            kind: manifest.kind.to_string(),
                            name: manifest.name().unwrap_or("<unnamed>").to_string(),
                            path: file.path.clone(),
                        })?;
                debug!("{} roleRef.kind: {}", manifest.kind, role_kind);
            }

            if !catalog_files.iter().any(|f| f.path == file.path) {
                info!("Adding {} to Catalog: {}", manifest.kind, file.path.display());
                catalog_files.push(file);
            }
        }

        Ok(catalog_files)
    }

    /// Stamp image, version chain and creation time, and return the finished CSV
    pub fn finish(
        mut self,
        previous_csv: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<ClusterServiceVersion> {
        let mut deployment = self.deployment.take().ok_or_else(|| Error::DeploymentNotFound {
            name: self.operator.name.clone(),
        })?;

        if !deployment.set_image(&self.operator.image) {
            return Err(Error::MissingContainer {
                name: self.operator.name.clone(),
            });
        }

        self.csv.spec.install.spec.deployments = vec![deployment];
        self.csv.metadata.name = Some(self.operator.csv_name());
        self.csv.spec.version = Some(self.operator.version.clone());
        if let Some(previous) = previous_csv {
            self.csv.spec.replaces = Some(previous.to_string());
        }
        self.csv.set_created_at(now);

        Ok(self.csv)
    }

    fn is_bound(&self, manifest: &Manifest, bound_roles: &[String]) -> bool {
        manifest.name().is_some_and(|name| {
            bound_roles
                .iter()
                .any(|bound| self.role_match.matches(name, bound))
        })
    }
}
