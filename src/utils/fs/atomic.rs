//! Atomic file write operations using temp-and-rename strategy.
//!
//! Readers never observe a partially written file: content goes to a sibling
//! `.tmp` file which is synced and then renamed over the target.

use crate::utils::fs::dirs::ensure_dir;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Safely writes a string to a file using atomic operations.
///
/// # Examples
///
/// ```rust,no_run
/// use nginx_buildpack::utils::fs::safe_write;
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// safe_write(Path::new("/tmp/app/nginx.conf"), "worker_processes 1;")?;
/// # Ok(())
/// # }
/// ```
pub fn safe_write(path: &Path, content: &str) -> Result<()> {
    atomic_write(path, content.as_bytes())
}

/// Atomically writes bytes to a file using a write-then-rename strategy.
///
/// Parent directories are created when missing. On Unix the permissions of an
/// existing target are carried over to the replacement.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    use std::io::Write;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_dir(parent)?;
        }
    }

    let temp_path = temp_sibling(path);
    let existing_permissions = fs::metadata(path).ok().map(|m| m.permissions());

    {
        let mut file = fs::File::create(&temp_path)
            .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

        file.write_all(content)
            .with_context(|| format!("Failed to write to temp file: {}", temp_path.display()))?;

        file.sync_all().with_context(|| "Failed to sync file to disk")?;
    }

    if let Some(permissions) = existing_permissions {
        fs::set_permissions(&temp_path, permissions).with_context(|| {
            format!("Failed to copy permissions to temp file: {}", temp_path.display())
        })?;
    }

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e).with_context(|| format!("Failed to rename temp file to: {}", path.display()));
    }

    Ok(())
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
