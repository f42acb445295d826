//! Command-line interface

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::{
    BundleConfig, OperatorDescriptor, RoleMatch, DEFAULT_CATALOG_ROOT, DEFAULT_CSV_TEMPLATE,
};

/// Log output format
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Generate a versioned OLM bundle (ClusterServiceVersion + package) from
/// an operator's rendered manifests
#[derive(Parser, Debug)]
#[command(name = "gen-operator-csv")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Operator directory; manifests are read from its `manifests/` subdirectory
    #[arg(value_name = "OPERATOR_DIR")]
    pub operator_dir: PathBuf,

    /// Operator name, also used as package and service account name
    #[arg(value_name = "OPERATOR_NAME")]
    pub operator_name: String,

    /// Namespace recorded in the CSV
    #[arg(value_name = "OPERATOR_NAMESPACE")]
    pub operator_namespace: String,

    /// Version being published
    #[arg(value_name = "OPERATOR_VERSION")]
    pub operator_version: String,

    /// Image reference stamped on the operator Deployment
    #[arg(value_name = "OPERATOR_IMAGE")]
    pub operator_image: String,

    /// Channel the package points at the new CSV
    #[arg(value_name = "CHANNEL_NAME")]
    pub channel_name: String,

    /// Root directory of the catalog
    #[arg(long, env = "OLM_CATALOG_ROOT", default_value = DEFAULT_CATALOG_ROOT)]
    pub catalog_root: PathBuf,

    /// CSV skeleton to fill in
    #[arg(long, env = "OLM_CSV_TEMPLATE", default_value = DEFAULT_CSV_TEMPLATE)]
    pub csv_template: PathBuf,

    /// Require ClusterRole names to equal the bound role name instead of being contained in it
    #[arg(long, env = "OLM_EXACT_ROLE_MATCH")]
    pub exact_role_match: bool,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl Cli {
    /// The operator described by the positional arguments
    pub fn operator(&self) -> OperatorDescriptor {
        OperatorDescriptor {
            name: self.operator_name.clone(),
            namespace: self.operator_namespace.clone(),
            version: self.operator_version.clone(),
            image: self.operator_image.clone(),
            channel: self.channel_name.clone(),
        }
    }

    /// Generator configuration for this invocation
    pub fn bundle_config(&self) -> BundleConfig {
        let role_match = if self.exact_role_match {
            RoleMatch::Exact
        } else {
            RoleMatch::Substring
        };

        BundleConfig::new(self.operator(), &self.operator_dir)
            .with_catalog_root(&self.catalog_root)
            .with_csv_template(&self.csv_template)
            .with_role_match(role_match)
    }
}
