//! Shared data models for staging operations
//!
//! These types cross module boundaries: the resolver produces a [`Dependency`],
//! the installer consumes it, and the staging driver logs it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A concrete, installable artifact.
///
/// Once resolved, the version is always one of the versions the manifest
/// declares for `name`; it is never synthesised from a constraint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dependency {
    /// Dependency name as it appears in the buildpack manifest
    pub name: String,
    /// Exact version string, as listed in the manifest
    pub version: String,
}

impl Dependency {
    /// Create a dependency from a name and an exact version.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}
