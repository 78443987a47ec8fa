//! Temporary directory management with RAII cleanup.

use crate::utils::fs::dirs::{ensure_dir, remove_dir_all};
use anyhow::Result;
use std::path::{Path, PathBuf};

/// A temporary directory that automatically cleans up when dropped.
///
/// The configuration validator acquires one of these before copying the build
/// directory, so the trial copy disappears on every exit path, including early
/// returns through `?`.
///
/// # Examples
///
/// ```rust,no_run
/// use nginx_buildpack::utils::fs::TempDir;
///
/// # fn example() -> anyhow::Result<()> {
/// {
///     let temp = TempDir::new("conf")?;
///     std::fs::write(temp.path().join("nginx.conf"), "events {}")?;
///     assert!(temp.path().exists());
/// } // removed here
/// # Ok(())
/// # }
/// ```
///
/// # Cleanup Behavior
///
/// - Directory is removed recursively when dropped
/// - If cleanup fails the error is logged and otherwise ignored
/// - Uses the system temporary directory as the parent
#[derive(Debug)]
pub struct TempDir {
    path: PathBuf,
}

impl TempDir {
    /// Creates a new temporary directory named `nginx_{prefix}_{uuid}` in the
    /// system temporary directory.
    pub fn new(prefix: &str) -> Result<Self> {
        Self::new_in(&std::env::temp_dir(), prefix)
    }

    /// Creates a new temporary directory under `parent`.
    pub fn new_in(parent: &Path, prefix: &str) -> Result<Self> {
        let unique_name = format!("nginx_{}_{}", prefix, uuid::Uuid::new_v4());
        let path = parent.join(unique_name);

        ensure_dir(&path)?;
        tracing::debug!("Created temporary directory {}", path.display());

        Ok(Self {
            path,
        })
    }

    /// Returns the path to the temporary directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        if let Err(e) = remove_dir_all(&self.path) {
            tracing::warn!("Failed to clean up {}: {e:#}", self.path.display());
        }
    }
}
