//! Environment lookup capability passed into the renderer.
//!
//! Rendering never reads process-wide state directly. Callers hand the renderer
//! an [`Environment`], which keeps rendering pure given its inputs: tests use a
//! [`MapEnvironment`], `varify` uses [`ProcessEnvironment`], and the validator
//! layers its trial values over the real environment with
//! [`OverlayEnvironment`].

use std::collections::BTreeMap;
use std::sync::Arc;

/// Key/value lookup of platform variables.
pub trait Environment: Send + Sync {
    /// Value of `name`, or `None` when unset.
    fn get(&self, name: &str) -> Option<String>;
}

/// Reads the environment of the current process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// In-memory environment.
///
/// # Examples
///
/// ```rust
/// use nginx_buildpack::templating::{Environment, MapEnvironment};
///
/// let env = MapEnvironment::new().with("PORT", "8080");
/// assert_eq!(env.get("PORT").as_deref(), Some("8080"));
/// assert_eq!(env.get("HOME"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapEnvironment {
    vars: BTreeMap<String, String>,
}

impl MapEnvironment {
    /// Create an empty environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Set or replace a variable.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }
}

impl Environment for MapEnvironment {
    fn get(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

impl<K, V> FromIterator<(K, V)> for MapEnvironment
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Fixed overrides consulted before a base environment.
#[derive(Clone)]
pub struct OverlayEnvironment {
    overrides: MapEnvironment,
    base: Arc<dyn Environment>,
}

impl OverlayEnvironment {
    /// Layer `overrides` on top of `base`.
    #[must_use]
    pub fn new(base: Arc<dyn Environment>, overrides: MapEnvironment) -> Self {
        Self {
            overrides,
            base,
        }
    }
}

impl Environment for OverlayEnvironment {
    fn get(&self, name: &str) -> Option<String> {
        self.overrides.get(name).or_else(|| self.base.get(name))
    }
}

impl std::fmt::Debug for OverlayEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayEnvironment").field("overrides", &self.overrides).finish_non_exhaustive()
    }
}
