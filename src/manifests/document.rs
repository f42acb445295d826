//! A single manifest document, read loosely
//!
//! Only `kind`, `metadata.name`, `subjects`, `roleRef`, `rules` and `spec`
//! are looked at. `rules` stays raw until a role is actually folded into the
//! CSV, so unrelated manifests never fail on schema details. `spec` is never
//! typed at all.

use k8s_openapi::api::rbac::v1::PolicyRule;
use serde::Deserialize;
use serde_yaml::Value;
use std::fmt;
use std::path::Path;

use crate::{Error, Result};

/// Manifest kinds the generator cares about
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ManifestKind {
    ClusterRole,
    Role,
    RoleBinding,
    ClusterRoleBinding,
    Deployment,
    Other(String),
}

impl ManifestKind {
    /// RBAC kinds copied verbatim into the bundle
    pub fn is_rbac(&self) -> bool {
        matches!(
            self,
            ManifestKind::ClusterRole
                | ManifestKind::Role
                | ManifestKind::RoleBinding
                | ManifestKind::ClusterRoleBinding
        )
    }

    /// Kinds that must carry `roleRef.kind`
    pub fn is_binding(&self) -> bool {
        matches!(
            self,
            ManifestKind::RoleBinding | ManifestKind::ClusterRoleBinding
        )
    }
}

impl From<&str> for ManifestKind {
    fn from(kind: &str) -> Self {
        match kind {
            "ClusterRole" => ManifestKind::ClusterRole,
            "Role" => ManifestKind::Role,
            "RoleBinding" => ManifestKind::RoleBinding,
            "ClusterRoleBinding" => ManifestKind::ClusterRoleBinding,
            "Deployment" => ManifestKind::Deployment,
            other => ManifestKind::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ManifestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestKind::ClusterRole => write!(f, "ClusterRole"),
            ManifestKind::Role => write!(f, "Role"),
            ManifestKind::RoleBinding => write!(f, "RoleBinding"),
            ManifestKind::ClusterRoleBinding => write!(f, "ClusterRoleBinding"),
            ManifestKind::Deployment => write!(f, "Deployment"),
            ManifestKind::Other(kind) => write!(f, "{}", kind),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ManifestMetadata {
    #[serde(default)]
    pub name: Option<String>,
}

/// Binding subject
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SubjectRef {
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// `roleRef` of a binding; `kind` is optional here so its absence can be reported
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RoleRef {
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawManifest {
    kind: Option<String>,
    #[serde(default)]
    metadata: Option<ManifestMetadata>,
    #[serde(default)]
    subjects: Option<Vec<SubjectRef>>,
    #[serde(default)]
    role_ref: Option<RoleRef>,
    #[serde(default)]
    rules: Option<Value>,
    #[serde(default)]
    spec: Option<Value>,
}

/// A parsed manifest document
#[derive(Clone, Debug)]
pub struct Manifest {
    pub kind: ManifestKind,
    pub metadata: ManifestMetadata,
    pub subjects: Vec<SubjectRef>,
    pub role_ref: Option<RoleRef>,
    rules: Option<Value>,
    spec: Option<Value>,
}

impl Manifest {
    /// Build a manifest from one YAML document of `path`
    pub fn from_value(value: Value, path: &Path) -> Result<Self> {
        let raw: RawManifest = serde_yaml::from_value(value).map_err(|e| Error::yaml(path, e))?;
        let kind = raw.kind.ok_or_else(|| Error::MissingKind {
            path: path.to_path_buf(),
        })?;

        Ok(Self {
            kind: ManifestKind::from(kind.as_str()),
            metadata: raw.metadata.unwrap_or_default(),
            subjects: raw.subjects.unwrap_or_default(),
            role_ref: raw.role_ref,
            rules: raw.rules,
            spec: raw.spec,
        })
    }

    /// `metadata.name`, if present
    pub fn name(&self) -> Option<&str> {
        self.metadata.name.as_deref()
    }

    /// `roleRef.kind`, if present
    pub fn role_ref_kind(&self) -> Option<&str> {
        self.role_ref.as_ref().and_then(|r| r.kind.as_deref())
    }

    /// `roleRef.name`, if present
    pub fn role_ref_name(&self) -> Option<&str> {
        self.role_ref.as_ref().and_then(|r| r.name.as_deref())
    }

    /// Whether any subject is the service account `name`
    pub fn binds_service_account(&self, name: &str) -> bool {
        self.subjects.iter().any(|s| {
            s.kind.as_deref() == Some("ServiceAccount") && s.name.as_deref() == Some(name)
        })
    }

    /// `rules` as typed policy rules; a role without rules grants nothing
    pub fn policy_rules(&self, path: &Path) -> Result<Vec<PolicyRule>> {
        match &self.rules {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(rules) => {
                serde_yaml::from_value(rules.clone()).map_err(|e| Error::yaml(path, e))
            }
        }
    }

    /// Raw `spec`, if present and not null
    pub fn spec(&self) -> Option<&Value> {
        self.spec.as_ref().filter(|spec| !spec.is_null())
    }
}
