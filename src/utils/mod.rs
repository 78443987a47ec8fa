//! Utilities shared by the staging driver and the standalone renderer
//!
//! # Modules
//!
//! - [`fs`] - File system operations with atomic writes, directory copies and
//!   scoped temporary directories
//! - [`output`] - Buildpack-style staging output (`----->` step headers, warnings)

pub mod fs;
pub mod output;

pub use fs::{TempDir, atomic_write, copy_dir, ensure_dir, file_exists, safe_write};
