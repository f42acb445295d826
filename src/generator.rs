//! Bundle generation for one operator version
//!
//! A run creates `<catalog_root>/<name>/<version>/`, copies the operator's
//! RBAC manifests into it, writes the generated CSV next to them and finally
//! points the package descriptor at the new CSV. A version directory that
//! already exists is never touched again.

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::adapters::csv_builder::CsvBuilder;
use crate::adapters::permissions;
use crate::config::BundleConfig;
use crate::manifests::{ManifestFile, ManifestSet};
use crate::olm::ClusterServiceVersion;
use crate::store::{FilePackageStore, PackageStore};
use crate::{Error, Result};

/// Result of a generator run
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// A new bundle was written
    Published {
        csv_name: String,
        csv_file: PathBuf,
        replaces: Option<String>,
    },
    /// The version directory already existed; nothing was written
    AlreadyPublished { version_dir: PathBuf },
}

/// Generates OLM bundles according to a [`BundleConfig`]
#[derive(Clone, Debug)]
pub struct BundleGenerator {
    config: BundleConfig,
}

impl BundleGenerator {
    pub fn new(config: BundleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BundleConfig {
        &self.config
    }

    /// Run against the package file in the catalog, stamped with the current time
    pub fn run(&self) -> Result<Outcome> {
        let store = FilePackageStore::new(self.config.package_file());
        let outcome = self.run_with(&store, Utc::now())?;
        if let Outcome::Published { .. } = outcome {
            info!("Wrote Package: {}", store.path().display());
        }
        Ok(outcome)
    }

    /// Run against an explicit package store and creation time
    pub fn run_with<S: PackageStore>(&self, store: &S, now: DateTime<Utc>) -> Result<Outcome> {
        let operator = &self.config.operator;

        let catalog_dir = self.config.catalog_dir();
        create_dir_all(&catalog_dir)?;

        let version_dir = self.config.version_dir();
        if version_dir.exists() {
            info!(
                "version already exists, skipping: {}",
                version_dir.display()
            );
            return Ok(Outcome::AlreadyPublished { version_dir });
        }
        std::fs::create_dir(&version_dir).map_err(|e| Error::io(&version_dir, e))?;

        let previous_csv = store.current_csv()?;

        info!("Generating CSV for version: {}", operator.version);
        let template = ClusterServiceVersion::load_template(self.config.csv_template())?;
        let manifests = ManifestSet::load(&self.config.manifests_dir())?;

        let bound_roles = permissions::bound_cluster_roles(&manifests, operator.service_account());

        let mut builder = CsvBuilder::new(template, operator, self.config.role_match);
        let catalog_files = builder.fold_manifests(&manifests, &bound_roles)?;
        copy_into_bundle(&catalog_files, &version_dir)?;
        let csv = builder.finish(previous_csv.as_deref(), now)?;

        let csv_file = self.config.csv_file();
        std::fs::write(&csv_file, csv.to_yaml()?).map_err(|e| Error::io(&csv_file, e))?;
        info!("Wrote ClusterServiceVersion: {}", csv_file.display());

        let csv_name = operator.csv_name();
        store.publish(&operator.name, &operator.channel, &csv_name)?;
        info!("Channel {} now points at {}", operator.channel, csv_name);

        Ok(Outcome::Published {
            csv_name,
            csv_file,
            replaces: previous_csv,
        })
    }
}

fn create_dir_all(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))
}

fn copy_into_bundle(files: &[&ManifestFile], version_dir: &Path) -> Result<()> {
    for file in files {
        let target = version_dir.join(file.bundle_file_name());
        std::fs::copy(&file.path, &target).map_err(|e| Error::io(&file.path, e))?;
    }
    Ok(())
}
