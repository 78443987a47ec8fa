//! User configuration from the application's `buildpack.yml`.
//!
//! The file is optional. When present, the only key staging reads is the
//! requested nginx version:
//!
//! ```yaml
//! nginx:
//!   version: stable
//! ```
//!
//! An absent file, an absent `nginx` section and an absent `version` all mean
//! "use the mainline line".

use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::constants::BUILDPACK_YML;
use crate::utils::fs::{file_exists, read_yaml_file};

/// Parsed `buildpack.yml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildpackConfig {
    #[serde(default)]
    pub nginx: NginxConfig,
}

/// The `nginx:` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NginxConfig {
    /// Alias name or version constraint; empty when not specified.
    #[serde(default)]
    pub version: String,
}

impl BuildpackConfig {
    /// Load `<build_dir>/buildpack.yml`, falling back to defaults when the
    /// file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(build_dir: &Path) -> Result<Self> {
        let path = build_dir.join(BUILDPACK_YML);
        if !file_exists(&path)? {
            tracing::debug!("No {} found, using defaults", path.display());
            return Ok(Self::default());
        }

        // An empty document parses as null
        let config: Option<Self> = read_yaml_file(&path)?;
        Ok(config.unwrap_or_default())
    }

    /// The requested nginx version, or `""` when none was given.
    #[must_use]
    pub fn requested_version(&self) -> &str {
        self.nginx.version.trim()
    }
}
