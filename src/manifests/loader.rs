//! Recursive manifest discovery

use serde::Deserialize;
use serde_yaml::Value;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use super::Manifest;
use crate::{Error, Result};

/// A manifest file and the documents it holds
#[derive(Clone, Debug)]
pub struct ManifestFile {
    pub path: PathBuf,
    pub documents: Vec<Manifest>,
}

impl ManifestFile {
    /// Read and parse every non-empty document of a (possibly multi-document) file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;

        let mut documents = Vec::new();
        for document in serde_yaml::Deserializer::from_str(&content) {
            let value = Value::deserialize(document).map_err(|e| Error::yaml(path, e))?;
            if value.is_null() {
                continue;
            }
            documents.push(Manifest::from_value(value, path)?);
        }

        Ok(Self {
            path: path.to_path_buf(),
            documents,
        })
    }

    /// Name of the copy inside the bundle: the original file name, lower-cased
    pub fn bundle_file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    }
}

/// Every manifest found under a directory, in file-name order
#[derive(Clone, Debug, Default)]
pub struct ManifestSet {
    pub files: Vec<ManifestFile>,
}

impl ManifestSet {
    /// Walk `dir` recursively and load every `.yaml`/`.yml` file
    pub fn load(dir: &Path) -> Result<Self> {
        let mut files = Vec::new();

        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            if !is_yaml(entry.path()) {
                debug!("Ignoring non-YAML file: {}", entry.path().display());
                continue;
            }
            debug!("Scanning manifest: {}", entry.path().display());
            files.push(ManifestFile::load(entry.path())?);
        }

        Ok(Self { files })
    }

    /// Iterate over every document together with the file it came from
    pub fn documents(&self) -> impl Iterator<Item = (&ManifestFile, &Manifest)> {
        self.files
            .iter()
            .flat_map(|file| file.documents.iter().map(move |doc| (file, doc)))
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml")
    )
}
