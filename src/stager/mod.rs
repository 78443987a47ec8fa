//! The staging directory layout handed to the buildpack by the platform.
//!
//! A supply buildpack is given four things: the application's build
//! directory, a cache directory, a dependencies directory shared by every
//! buildpack in the chain, and its own index into that directory. Everything
//! it installs goes under `<deps_dir>/<deps_idx>`:
//!
//! ```text
//! <deps_dir>/<deps_idx>/
//! ├── bin/          # symlinks put on PATH at launch
//! ├── profile.d/    # scripts sourced at launch
//! └── nginx/        # the installed dependency
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::utils::fs::{create_symlink, ensure_dir, safe_write};

/// Staging directory operations.
pub trait Stager {
    fn build_dir(&self) -> &Path;

    /// This buildpack's own dependency directory.
    fn dep_dir(&self) -> PathBuf;

    fn deps_dir(&self) -> &Path;

    fn deps_idx(&self) -> &str;

    /// Make `target` available as `name` on the application's PATH.
    ///
    /// # Errors
    ///
    /// Returns an error if the link cannot be created.
    fn add_bin_dependency_link(&self, target: &Path, name: &str) -> Result<()>;

    /// Write a `profile.d` script named `<name>.sh`.
    ///
    /// # Errors
    ///
    /// Returns an error if the script cannot be written.
    fn write_profile_d(&self, name: &str, script: &str) -> Result<()>;
}

/// [`Stager`] over real directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryStager {
    build_dir: PathBuf,
    cache_dir: PathBuf,
    deps_dir: PathBuf,
    deps_idx: String,
}

impl DirectoryStager {
    pub fn new(
        build_dir: impl Into<PathBuf>,
        cache_dir: impl Into<PathBuf>,
        deps_dir: impl Into<PathBuf>,
        deps_idx: impl Into<String>,
    ) -> Self {
        Self {
            build_dir: build_dir.into(),
            cache_dir: cache_dir.into(),
            deps_dir: deps_dir.into(),
            deps_idx: deps_idx.into(),
        }
    }

    #[must_use]
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }
}

impl Stager for DirectoryStager {
    fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    fn dep_dir(&self) -> PathBuf {
        self.deps_dir.join(&self.deps_idx)
    }

    fn deps_dir(&self) -> &Path {
        &self.deps_dir
    }

    fn deps_idx(&self) -> &str {
        &self.deps_idx
    }

    fn add_bin_dependency_link(&self, target: &Path, name: &str) -> Result<()> {
        let bin_dir = self.dep_dir().join("bin");
        ensure_dir(&bin_dir)?;

        let link = bin_dir.join(name);
        if link.symlink_metadata().is_ok() {
            std::fs::remove_file(&link)
                .with_context(|| format!("Failed to replace existing link: {}", link.display()))?;
        }

        // Relative targets keep the link valid when the droplet is relocated
        let relative = relative_to(target, &bin_dir);
        create_symlink(&relative, &link).with_context(|| {
            format!("Failed to link {} -> {}", link.display(), relative.display())
        })?;
        tracing::debug!("Linked {} -> {}", link.display(), relative.display());
        Ok(())
    }

    fn write_profile_d(&self, name: &str, script: &str) -> Result<()> {
        let path = self.dep_dir().join("profile.d").join(format!("{name}.sh"));
        safe_write(&path, script)?;
        tracing::debug!("Wrote profile.d script {}", path.display());
        Ok(())
    }
}

/// Path of `target` as seen from `base`, when both share a prefix.
fn relative_to(target: &Path, base: &Path) -> PathBuf {
    let target_parts: Vec<_> = target.components().collect();
    let base_parts: Vec<_> = base.components().collect();
    let common = target_parts.iter().zip(&base_parts).take_while(|(a, b)| a == b).count();
    if common == 0 {
        return target.to_path_buf();
    }

    let mut relative = PathBuf::new();
    for _ in common..base_parts.len() {
        relative.push("..");
    }
    for part in &target_parts[common..] {
        relative.push(part);
    }
    relative
}
