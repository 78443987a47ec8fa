//! Version constraint parsing and resolution for the nginx dependency.
//!
//! The buildpack manifest publishes a small table of named version lines
//! (`mainline`, `stable`, ...) bound to constraint strings, and a list of
//! concrete versions it can install. Users ask for a version in
//! `buildpack.yml` using either a line name or a constraint; this module turns
//! that request into one concrete version from the manifest.
//!
//! # Module Organization
//!
//! - [`VersionLines`] - The alias table loaded from `manifest.yml`
//! - [`VersionConstraint`] - Parsed constraint with matching rules
//! - [`resolver`] - [`VersionResolver`], which applies alias substitution and
//!   picks the highest matching version
//!
//! # Constraint Syntax
//!
//! Constraints follow the conventions of the buildpack manifest rather than
//! Cargo's defaults:
//!
//! - **Exact versions**: `"1.25.3"` matches only `1.25.3`
//! - **Wildcards**: `"1.25.*"`, `"1.25.x"` match any `1.25` patch release
//! - **Partial versions**: `"1.25"` is read as `~1.25`
//! - **Operators**: `">=1.24, <1.26"`, `"~1.25.1"`, `"^1.0"` pass through unchanged
//! - **Comparator lists**: commas or whitespace separate comparators, and an
//!   operator may be spaced from its version (`">= 1.24 < 1.26"`)
//! - **Alternatives**: `"1.24.* || 1.26.*"` matches either range
//!
//! # Examples
//!
//! ```rust
//! use nginx_buildpack::version::{VersionLines, VersionResolver};
//!
//! let lines = VersionLines::from_iter([("mainline", "1.25.*"), ("stable", "1.26.*")]);
//! let available = vec!["1.25.0".to_string(), "1.25.3".to_string(), "1.26.1".to_string()];
//!
//! let resolver = VersionResolver::new(&lines);
//! let dep = resolver.resolve("nginx", "", &available).unwrap();
//! assert_eq!(dep.version, "1.25.3");
//! assert!(!resolver.is_stable_line(&dep.version));
//! ```

pub mod resolver;

#[cfg(test)]
mod tests;

pub use resolver::VersionResolver;

use semver::{Version, VersionReq};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Errors produced while resolving a requested version.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolutionError {
    /// No version was requested and the manifest defines no `mainline` line.
    #[error("Could not find mainline version line in buildpack manifest to default to")]
    NoMainlineAlias,

    /// The effective constraint is not valid constraint syntax.
    #[error("Invalid version constraint '{constraint}': {reason}")]
    InvalidConstraint {
        /// The constraint after alias substitution
        constraint: String,
        /// Parser message
        reason: String,
    },

    /// No available version satisfies the effective constraint.
    #[error("No version of {dependency} matches '{constraint}' (requested '{requested}')")]
    NoMatchingVersion {
        /// Dependency being resolved
        dependency: String,
        /// What the user asked for (empty when defaulted)
        requested: String,
        /// Constraint after alias substitution
        constraint: String,
        /// Known alias names, sorted
        aliases: Vec<String>,
        /// Constraints bound to the aliases, sorted
        constraints: Vec<String>,
        /// Concrete versions known to the manifest, in manifest order
        versions: Vec<String>,
    },
}

impl ResolutionError {
    /// Diagnostic listing of everything the user could have asked for:
    /// alias names, then their constraints, then concrete versions.
    #[must_use]
    pub fn available_listing(&self) -> Option<Vec<String>> {
        match self {
            Self::NoMatchingVersion {
                aliases,
                constraints,
                versions,
                ..
            } => Some(aliases.iter().chain(constraints).chain(versions).cloned().collect()),
            _ => None,
        }
    }
}

/// Named version lines from the buildpack manifest.
///
/// Keys are alias names and values are constraint strings. An entry with an
/// empty name is tolerated when loading but never treated as an alias.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionLines {
    lines: BTreeMap<String, String>,
}

impl VersionLines {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a line.
    pub fn insert(&mut self, alias: impl Into<String>, constraint: impl Into<String>) {
        self.lines.insert(alias.into(), constraint.into());
    }

    /// Constraint bound to `alias`, if `alias` is a valid, defined alias.
    #[must_use]
    pub fn get(&self, alias: &str) -> Option<&str> {
        if alias.is_empty() {
            return None;
        }
        self.lines.get(alias).map(String::as_str)
    }

    /// Alias names in lexicographic order, excluding the empty name.
    #[must_use]
    pub fn aliases(&self) -> Vec<String> {
        self.lines.keys().filter(|k| !k.is_empty()).cloned().collect()
    }

    /// Constraints bound to valid aliases, in lexicographic order.
    #[must_use]
    pub fn constraints(&self) -> Vec<String> {
        let mut values: Vec<String> = self
            .lines
            .iter()
            .filter(|(k, _)| !k.is_empty())
            .map(|(_, v)| v.clone())
            .collect();
        values.sort();
        values
    }

    /// Number of valid aliases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.keys().filter(|k| !k.is_empty()).count()
    }

    /// Whether the table has no valid alias.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, V> FromIterator<(K, V)> for VersionLines
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            lines: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// A parsed version constraint.
///
/// Holds one [`VersionReq`] per `||` alternative; a version satisfies the
/// constraint when it satisfies any alternative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionConstraint {
    raw: String,
    alternatives: Vec<VersionReq>,
}

impl VersionConstraint {
    /// Parse a constraint string using the manifest conventions described in
    /// the [module documentation](self).
    pub fn parse(constraint: &str) -> Result<Self, ResolutionError> {
        let invalid = |reason: String| ResolutionError::InvalidConstraint {
            constraint: constraint.to_string(),
            reason,
        };

        if constraint.trim().is_empty() {
            return Err(invalid("constraint is empty".to_string()));
        }

        let mut alternatives = Vec::new();
        for alternative in constraint.split("||") {
            let normalized = alternative
                .split(',')
                .map(split_comparators)
                .collect::<Result<Vec<_>, _>>()
                .map_err(&invalid)?
                .into_iter()
                .flatten()
                .map(|comparator| normalize_comparator(&comparator))
                .collect::<Result<Vec<_>, _>>()
                .map_err(&invalid)?
                .join(", ");
            let req = VersionReq::parse(&normalized).map_err(|e| invalid(e.to_string()))?;
            alternatives.push(req);
        }

        Ok(Self {
            raw: constraint.to_string(),
            alternatives,
        })
    }

    /// Whether `version` satisfies the constraint.
    #[must_use]
    pub fn matches(&self, version: &Version) -> bool {
        self.alternatives.iter().any(|req| req.matches(version))
    }

    /// Highest version in `available` satisfying the constraint.
    ///
    /// Entries that are not valid semantic versions are skipped. The returned
    /// string is the entry exactly as it appears in `available`.
    #[must_use]
    pub fn highest_match<'a>(&self, available: &'a [String]) -> Option<&'a str> {
        available
            .iter()
            .filter_map(|candidate| match parse_version(candidate) {
                Some(version) => Some((version, candidate.as_str())),
                None => {
                    tracing::debug!("Ignoring unparseable version '{candidate}'");
                    None
                }
            })
            .filter(|(version, _)| self.matches(version))
            .max_by(|(a, _), (b, _)| a.cmp(b))
            .map(|(_, candidate)| candidate)
    }

    /// The constraint as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Parse a concrete version, tolerating a leading `v`.
#[must_use]
pub fn parse_version(version: &str) -> Option<Version> {
    Version::parse(version.trim().trim_start_matches('v')).ok()
}

/// Whether `version` satisfies `constraint`. Invalid input never matches.
#[must_use]
pub fn matches_constraint(version: &str, constraint: &str) -> bool {
    match (parse_version(version), VersionConstraint::parse(constraint)) {
        (Some(version), Ok(constraint)) => constraint.matches(&version),
        _ => false,
    }
}

/// Split a comma-free group into comparators at whitespace, keeping an
/// operator attached to the version after it: `">= 1.24 < 1.26"` becomes
/// `[">=1.24", "<1.26"]`.
fn split_comparators(group: &str) -> Result<Vec<String>, String> {
    let mut comparators = Vec::new();
    let mut operator = String::new();

    for token in group.split_whitespace() {
        if token.chars().all(|c| matches!(c, '=' | '<' | '>' | '~' | '^' | '!')) {
            operator.push_str(token);
        } else {
            comparators.push(format!("{operator}{token}"));
            operator.clear();
        }
    }

    if !operator.is_empty() {
        return Err(format!("operator '{operator}' has no version"));
    }
    if comparators.is_empty() {
        return Err("empty comparator".to_string());
    }
    Ok(comparators)
}

/// Rewrite one comparator so that bare versions follow manifest semantics:
/// full versions are exact and partial versions are tilde ranges.
fn normalize_comparator(comparator: &str) -> Result<String, String> {
    let comparator = comparator.trim();
    if comparator.is_empty() {
        return Err("empty comparator".to_string());
    }

    let bare = comparator.trim_start_matches('v');
    if !bare.starts_with(|c: char| c.is_ascii_digit()) {
        return Ok(comparator.to_string());
    }

    if Version::parse(bare).is_ok() {
        Ok(format!("={bare}"))
    } else if bare.contains(['*', 'x', 'X']) {
        Ok(bare.to_string())
    } else {
        Ok(format!("~{bare}"))
    }
}
