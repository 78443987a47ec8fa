//! File system utilities for staging operations
//!
//! Staging never leaves half-written files behind: rendered configuration is
//! written with a write-then-rename strategy, and the scratch directory used for
//! trial rendering is removed when its guard is dropped.
//!
//! # Examples
//!
//! ```rust,no_run
//! use nginx_buildpack::utils::fs::{TempDir, copy_dir, safe_write};
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! let scratch = TempDir::new("conf")?;
//! copy_dir(Path::new("/tmp/app"), scratch.path())?;
//! safe_write(&scratch.path().join("nginx.conf"), "events {}")?;
//! # Ok(())
//! # }
//! ```

pub mod atomic;
pub mod dirs;
pub mod formats;
pub mod temp;

// Directory operations
pub use dirs::{copy_dir, create_symlink, ensure_dir, ensure_parent_dir, file_exists, remove_dir_all};

// Atomic write operations
pub use atomic::{atomic_write, safe_write};

// Temporary directories
pub use temp::TempDir;

// Format-specific I/O
pub use formats::{read_text_file, read_yaml_file};
