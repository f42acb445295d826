//! Persistence of the package descriptor, the single "current CSV" pointer
//! that links one generated version to the next.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::olm::Package;
use crate::{Error, Result};

/// Read-modify-write access to an operator's package descriptor
pub trait PackageStore {
    /// Load the stored package, if one exists
    fn load(&self) -> Result<Option<Package>>;

    /// Replace the stored package
    fn save(&self, package: &Package) -> Result<()>;

    /// CSV the first channel currently points at
    fn current_csv(&self) -> Result<Option<String>> {
        Ok(self
            .load()?
            .and_then(|package| package.current_csv().map(str::to_string)))
    }

    /// Point the package at `csv` on `channel`, discarding any other channels
    fn publish(&self, package_name: &str, channel: &str, csv: &str) -> Result<Package> {
        let package = Package::single_channel(package_name, channel, csv);
        self.save(&package)?;
        Ok(package)
    }
}

/// Package descriptor stored as `<name>.package.yaml`
#[derive(Clone, Debug)]
pub struct FilePackageStore {
    path: PathBuf,
}

impl FilePackageStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PackageStore for FilePackageStore {
    /// The last document of the file wins when several are present
    fn load(&self) -> Result<Option<Package>> {
        if !self.path.is_file() {
            return Ok(None);
        }
        let content =
            std::fs::read_to_string(&self.path).map_err(|e| Error::io(&self.path, e))?;

        let mut package = None;
        for document in serde_yaml::Deserializer::from_str(&content) {
            let value =
                serde_yaml::Value::deserialize(document).map_err(|e| Error::yaml(&self.path, e))?;
            if value.is_null() {
                continue;
            }
            package =
                Some(serde_yaml::from_value(value).map_err(|e| Error::yaml(&self.path, e))?);
        }
        Ok(package)
    }

    fn save(&self, package: &Package) -> Result<()> {
        let yaml = serde_yaml::to_string(package).map_err(|source| Error::Serialize {
            what: "package",
            source,
        })?;
        std::fs::write(&self.path, yaml).map_err(|e| Error::io(&self.path, e))
    }
}
