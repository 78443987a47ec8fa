//! Placing a resolved dependency into the staging area.
//!
//! Fetching and checksum verification are the platform's business. The
//! buildpack ships (or has been given) pre-extracted dependency trees under
//! `<buildpack root>/dependencies/<name>/<version>/`, and installing is a copy
//! of that tree into the output directory.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

use crate::models::Dependency;
use crate::utils::fs::{copy_dir, ensure_dir};

/// Installs a resolved dependency.
pub trait Installer {
    /// Install `dependency` so its files end up under `out_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the dependency is unavailable or cannot be copied.
    fn install_dependency(&self, dependency: &Dependency, out_dir: &Path) -> Result<()>;
}

/// Installs from a directory of pre-extracted dependency trees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheInstaller {
    cache_root: PathBuf,
}

impl CacheInstaller {
    /// Install from `<buildpack_root>/dependencies`.
    #[must_use]
    pub fn for_buildpack(buildpack_root: &Path) -> Self {
        Self::new(buildpack_root.join("dependencies"))
    }

    pub fn new(cache_root: impl Into<PathBuf>) -> Self {
        Self {
            cache_root: cache_root.into(),
        }
    }

    /// Where `dependency` is expected in the cache.
    #[must_use]
    pub fn source_dir(&self, dependency: &Dependency) -> PathBuf {
        self.cache_root.join(&dependency.name).join(&dependency.version)
    }
}

impl Installer for CacheInstaller {
    fn install_dependency(&self, dependency: &Dependency, out_dir: &Path) -> Result<()> {
        let source = self.source_dir(dependency);
        if !source.is_dir() {
            bail!("Dependency {dependency} is not available at {}", source.display());
        }

        tracing::debug!("Installing {dependency} from {} to {}", source.display(), out_dir.display());
        ensure_dir(out_dir)?;
        copy_dir(&source, out_dir)
    }
}
