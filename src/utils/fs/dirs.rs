//! Directory operations for creating, copying, and removing directories.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Ensures a directory exists, creating it and all parent directories if necessary.
///
/// # Errors
///
/// Returns an error if the path exists but is not a directory, or if creation fails.
///
/// # Examples
///
/// ```rust,no_run
/// use nginx_buildpack::utils::fs::ensure_dir;
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// ensure_dir(Path::new("/tmp/app/logs"))?;
/// # Ok(())
/// # }
/// ```
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
    } else if !path.is_dir() {
        return Err(anyhow::anyhow!("Path exists but is not a directory: {}", path.display()));
    }
    Ok(())
}

/// Ensures the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    Ok(())
}

/// Returns whether `path` exists, surfacing permission errors instead of
/// reporting them as absence.
pub fn file_exists(path: &Path) -> Result<bool> {
    path.try_exists().with_context(|| format!("Failed to check existence of {}", path.display()))
}

/// Recursively copies a directory and all its contents to a new location.
///
/// The destination is created if needed and existing files are overwritten.
/// Empty directories are reproduced so relative paths such as `logs/` resolve
/// identically in the copy. Symbolic links are recreated with their original
/// target, so a relative link resolves inside the copy just as it did in the
/// source. Special files are skipped.
///
/// # Examples
///
/// ```rust,no_run
/// use nginx_buildpack::utils::fs::copy_dir;
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// copy_dir(Path::new("/tmp/app"), Path::new("/tmp/conf-check"))?;
/// # Ok(())
/// # }
/// ```
pub fn copy_dir(src: &Path, dst: &Path) -> Result<()> {
    ensure_dir(dst)?;

    for entry in WalkDir::new(src).min_depth(1).follow_links(false) {
        let entry =
            entry.with_context(|| format!("Failed to read directory: {}", src.display()))?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .with_context(|| format!("Unexpected entry outside {}", src.display()))?;
        let dst_path = dst.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            ensure_dir(&dst_path)?;
        } else if file_type.is_file() {
            fs::copy(entry.path(), &dst_path).with_context(|| {
                format!(
                    "Failed to copy file from {} to {}",
                    entry.path().display(),
                    dst_path.display()
                )
            })?;
        } else if file_type.is_symlink() {
            copy_symlink(entry.path(), &dst_path)?;
        } else {
            tracing::trace!("Skipping special file {}", entry.path().display());
        }
    }

    Ok(())
}

fn copy_symlink(src: &Path, dst: &Path) -> Result<()> {
    let target = fs::read_link(src)
        .with_context(|| format!("Failed to read symlink: {}", src.display()))?;
    if dst.symlink_metadata().is_ok() {
        fs::remove_file(dst)
            .with_context(|| format!("Failed to replace existing file: {}", dst.display()))?;
    }
    create_symlink(&target, dst).with_context(|| {
        format!("Failed to link {} -> {}", dst.display(), target.display())
    })
}

/// Creates a symbolic link at `link` pointing to `target`.
///
/// A relative `target` is stored as is and resolved from the link's directory.
#[cfg(unix)]
pub fn create_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

/// Creates a symbolic link at `link` pointing to `target`.
///
/// A relative `target` is stored as is and resolved from the link's directory.
#[cfg(windows)]
pub fn create_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    let resolved = link.parent().map_or_else(|| target.to_path_buf(), |dir| dir.join(target));
    if resolved.is_dir() {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    }
}

/// Recursively removes a directory; a missing directory is not an error.
pub fn remove_dir_all(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_dir_all(path)
            .with_context(|| format!("Failed to remove directory: {}", path.display()))?;
    }
    Ok(())
}
