//! ClusterServiceVersion schema
//!
//! Only the fields the generator writes are modelled explicitly. Everything
//! else found in the CSV template (icons, owned CRDs, install modes, ...) is
//! carried through untouched in the `extra` maps.

use chrono::{DateTime, Utc};
use k8s_openapi::api::rbac::v1::PolicyRule;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use std::path::Path;

use crate::{Error, Result};

/// Format of the `createdAt` annotation
pub const CREATED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

const CREATED_AT_ANNOTATION: &str = "createdAt";

/// ClusterServiceVersion document
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterServiceVersion {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default)]
    pub metadata: CsvMetadata,

    #[serde(default)]
    pub spec: CsvSpec,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// CSV metadata
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// Operator image reference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_image: Option<String>,

    #[serde(default)]
    pub annotations: BTreeMap<String, Value>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// CSV spec
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// CSV this version upgrades from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replaces: Option<String>,

    #[serde(default)]
    pub install: InstallStrategy,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// `spec.install`
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallStrategy {
    /// Install strategy name, normally `deployment`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,

    #[serde(default)]
    pub spec: StrategyDetails,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// `spec.install.spec`
///
/// Cluster permissions and deployments are always rebuilt from the operator
/// manifests, so whatever the template holds for them is discarded on load.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyDetails {
    #[serde(default, deserialize_with = "discard")]
    pub cluster_permissions: Vec<ClusterPermission>,

    #[serde(default, deserialize_with = "discard")]
    pub deployments: Vec<StrategyDeployment>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

fn discard<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
{
    IgnoredAny::deserialize(deserializer)?;
    Ok(Vec::new())
}

/// Rules granted cluster-wide to a service account
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterPermission {
    pub rules: Vec<PolicyRule>,
    pub service_account_name: String,
}

/// Deployment that OLM creates for the operator
///
/// `spec` is the operator Deployment's spec copied as-is, so quantities,
/// newer API fields and anything else in it reach the CSV unchanged.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct StrategyDeployment {
    pub name: String,
    pub spec: Value,
}

impl StrategyDeployment {
    /// `spec.template.spec.containers[0]`, when it is a mapping
    pub fn first_container_mut(&mut self) -> Option<&mut Mapping> {
        self.spec
            .get_mut("template")
            .and_then(|template| template.get_mut("spec"))
            .and_then(|pod| pod.get_mut("containers"))
            .and_then(Value::as_sequence_mut)
            .and_then(|containers| containers.first_mut())
            .and_then(Value::as_mapping_mut)
    }

    /// Point the first container at `image`
    pub fn set_image(&mut self, image: &str) -> bool {
        match self.first_container_mut() {
            Some(container) => {
                container.insert(
                    Value::String("image".to_string()),
                    Value::String(image.to_string()),
                );
                true
            }
            None => false,
        }
    }
}

impl ClusterServiceVersion {
    /// Load a CSV skeleton from a template file
    pub fn load_template(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        serde_yaml::from_str(&content).map_err(|e| Error::yaml(path, e))
    }

    /// Stamp `metadata.annotations.createdAt`
    pub fn set_created_at(&mut self, now: DateTime<Utc>) {
        self.metadata.annotations.insert(
            CREATED_AT_ANNOTATION.to_string(),
            Value::String(now.format(CREATED_AT_FORMAT).to_string()),
        );
    }

    /// `metadata.annotations.createdAt`, if set
    pub fn created_at(&self) -> Option<&str> {
        self.metadata
            .annotations
            .get(CREATED_AT_ANNOTATION)
            .and_then(Value::as_str)
    }

    /// Block-style YAML rendering
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|source| Error::Serialize {
            what: "ClusterServiceVersion",
            source,
        })
    }
}
