//! The buildpack's dependency manifest (`manifest.yml`).
//!
//! The manifest ships with the buildpack and lists the concrete dependency
//! versions it can install, plus the named version lines users may request:
//!
//! ```yaml
//! language: nginx
//! version_lines:
//!   mainline: 1.25.x
//!   stable: 1.26.x
//! dependencies:
//!   - name: nginx
//!     version: 1.25.3
//!   - name: nginx
//!     version: 1.26.1
//! ```
//!
//! A manifest must define a `mainline` line for default resolution to work;
//! that is checked when resolving, not when loading.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::constants::MANIFEST_YML;
use crate::utils::fs::read_yaml_file;
use crate::version::VersionLines;

/// What staging needs from the buildpack manifest.
pub trait Manifest {
    /// Every version of `name` the manifest lists, in manifest order.
    fn all_dependency_versions(&self, name: &str) -> Vec<String>;

    /// Named version lines (`mainline`, `stable`, ...).
    fn version_lines(&self) -> &VersionLines;

    /// Root directory of the buildpack.
    fn root_dir(&self) -> &Path;
}

/// One entry under `dependencies:`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestDependency {
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cf_stacks: Vec<String>,
}

/// The parts of `manifest.yml` staging reads; other keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestFile {
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub version_lines: VersionLines,
    #[serde(default)]
    pub dependencies: Vec<ManifestDependency>,
}

/// [`Manifest`] backed by `<root>/manifest.yml`.
#[derive(Debug, Clone)]
pub struct BuildpackManifest {
    root_dir: PathBuf,
    file: ManifestFile,
}

impl BuildpackManifest {
    /// Load `manifest.yml` from the buildpack root.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or is not valid YAML.
    pub fn load(root_dir: impl Into<PathBuf>) -> Result<Self> {
        let root_dir = root_dir.into();
        let file: ManifestFile = read_yaml_file(&root_dir.join(MANIFEST_YML))?;
        tracing::debug!(
            "Loaded manifest for '{}' with {} dependencies and {} version lines",
            file.language,
            file.dependencies.len(),
            file.version_lines.len()
        );
        Ok(Self {
            root_dir,
            file,
        })
    }

    /// Load a manifest file directly; its parent directory is the root.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or is not valid YAML.
    pub fn load_file(path: &Path) -> Result<Self> {
        let file: ManifestFile = read_yaml_file(path)?;
        let root_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(Self {
            root_dir,
            file,
        })
    }

    #[must_use]
    pub fn dependencies(&self) -> &[ManifestDependency] {
        &self.file.dependencies
    }
}

impl Manifest for BuildpackManifest {
    fn all_dependency_versions(&self, name: &str) -> Vec<String> {
        self.file
            .dependencies
            .iter()
            .filter(|dep| dep.name == name)
            .map(|dep| dep.version.clone())
            .collect()
    }

    fn version_lines(&self) -> &VersionLines {
        &self.file.version_lines
    }

    fn root_dir(&self) -> &Path {
        &self.root_dir
    }
}
