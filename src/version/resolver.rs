//! Alias-aware resolution of a requested version to a concrete manifest version.

use super::{ResolutionError, VersionConstraint, VersionLines, matches_constraint};
use crate::constants::{MAINLINE_ALIAS, STABLE_ALIAS};
use crate::models::Dependency;

/// Resolves user version requests against the manifest's version lines.
///
/// # Resolution Process
///
/// 1. **Default**: an empty request means the `mainline` line; a manifest
///    without one is an error
/// 2. **Alias substitution**: a request naming a line is replaced by that
///    line's constraint, once; the substituted value is never looked up again
/// 3. **Matching**: the highest available version satisfying the constraint
///    wins; nothing is ever fabricated
///
/// # Examples
///
/// ```rust
/// use nginx_buildpack::version::{VersionLines, VersionResolver};
///
/// let lines = VersionLines::from_iter([("mainline", "1.25.*"), ("stable", "1.26.*")]);
/// let available = vec!["1.25.0".to_string(), "1.25.3".to_string(), "1.26.1".to_string()];
/// let resolver = VersionResolver::new(&lines);
///
/// let dep = resolver.resolve("nginx", "stable", &available).unwrap();
/// assert_eq!(dep.version, "1.26.1");
/// assert!(resolver.is_stable_line(&dep.version));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct VersionResolver<'a> {
    lines: &'a VersionLines,
}

impl<'a> VersionResolver<'a> {
    /// Create a resolver over a version-line table.
    #[must_use]
    pub const fn new(lines: &'a VersionLines) -> Self {
        Self {
            lines,
        }
    }

    /// The constraint string a request stands for after defaulting and alias
    /// substitution.
    pub fn effective_constraint(&self, requested: &str) -> Result<String, ResolutionError> {
        if requested.is_empty() {
            return self
                .lines
                .get(MAINLINE_ALIAS)
                .map(str::to_string)
                .ok_or(ResolutionError::NoMainlineAlias);
        }

        match self.lines.get(requested) {
            Some(constraint) => {
                tracing::debug!("Version line '{requested}' maps to '{constraint}'");
                Ok(constraint.to_string())
            }
            None => Ok(requested.to_string()),
        }
    }

    /// Resolve `requested` to the highest matching version in `available`.
    ///
    /// # Errors
    ///
    /// - [`ResolutionError::NoMainlineAlias`] when nothing was requested and
    ///   there is no `mainline` line
    /// - [`ResolutionError::InvalidConstraint`] when the effective constraint
    ///   cannot be parsed
    /// - [`ResolutionError::NoMatchingVersion`] when no available version
    ///   satisfies the constraint; it carries the full diagnostic listing
    pub fn resolve(
        &self,
        dependency: &str,
        requested: &str,
        available: &[String],
    ) -> Result<Dependency, ResolutionError> {
        let constraint_str = self.effective_constraint(requested)?;
        let constraint = VersionConstraint::parse(&constraint_str)?;

        match constraint.highest_match(available) {
            Some(version) => {
                tracing::debug!(
                    "Resolved {dependency} '{requested}' via '{constraint_str}' to {version}"
                );
                Ok(Dependency::new(dependency, version))
            }
            None => Err(ResolutionError::NoMatchingVersion {
                dependency: dependency.to_string(),
                requested: requested.to_string(),
                constraint: constraint_str,
                aliases: self.lines.aliases(),
                constraints: self.lines.constraints(),
                versions: available.to_vec(),
            }),
        }
    }

    /// Whether `version` falls within the constraint bound to `stable`.
    ///
    /// Advisory only: the answer never changes which version is resolved.
    /// Without a `stable` line nothing is stable.
    #[must_use]
    pub fn is_stable_line(&self, version: &str) -> bool {
        self.lines
            .get(STABLE_ALIAS)
            .is_some_and(|constraint| matches_constraint(version, constraint))
    }

    /// Everything a user could request, for diagnostics: alias names, their
    /// constraints (both sorted), then the concrete versions in manifest order.
    #[must_use]
    pub fn available_versions(&self, available: &[String]) -> Vec<String> {
        let mut listing = self.lines.aliases();
        listing.extend(self.lines.constraints());
        listing.extend(available.iter().cloned());
        listing
    }
}
