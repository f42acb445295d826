//! Discovery of the ClusterRoles bound to the operator's service account

use tracing::{debug, warn};

use crate::manifests::{ManifestKind, ManifestSet};

/// Collect `roleRef.name` of every ClusterRoleBinding with a ServiceAccount
/// subject named `service_account`, de-duplicated in discovery order
pub fn bound_cluster_roles(manifests: &ManifestSet, service_account: &str) -> Vec<String> {
    let mut roles: Vec<String> = Vec::new();

    for (file, manifest) in manifests.documents() {
        if manifest.kind != ManifestKind::ClusterRoleBinding
            || !manifest.binds_service_account(service_account)
        {
            continue;
        }

        match manifest.role_ref_name() {
            Some(role) => {
                debug!(
                    "ClusterRoleBinding in {} binds {} to {}",
                    file.path.display(),
                    service_account,
                    role
                );
                if !roles.iter().any(|r| r == role) {
                    roles.push(role.to_string());
                }
            }
            None => warn!(
                "ClusterRoleBinding in {} has no roleRef.name, ignoring",
                file.path.display()
            ),
        }
    }

    roles
}
