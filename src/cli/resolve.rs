//! `resolve` command: show what a version request resolves to.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use crate::constants::{MANIFEST_YML, NGINX_DEPENDENCY, STABLE_LINE_WARNING};
use crate::core::StagingError;
use crate::manifest::{BuildpackManifest, Manifest};
use crate::version::VersionResolver;

/// Resolve a version request against the buildpack manifest.
#[derive(Args, Debug)]
pub struct ResolveCommand {
    /// Version line name or constraint; empty means mainline
    #[arg(long, default_value = "")]
    pub version: String,

    /// Path to manifest.yml [default: manifest of the installed buildpack]
    #[arg(long)]
    pub manifest: Option<PathBuf>,
}

impl ResolveCommand {
    pub fn execute(self) -> Result<()> {
        let manifest_path = match self.manifest {
            Some(path) => path,
            None => super::buildpack_dir_from_exe()?.join(MANIFEST_YML),
        };
        let manifest = BuildpackManifest::load_file(&manifest_path)?;

        let available = manifest.all_dependency_versions(NGINX_DEPENDENCY);
        let resolver = VersionResolver::new(manifest.version_lines());
        let dependency = resolver
            .resolve(NGINX_DEPENDENCY, self.version.trim(), &available)
            .map_err(StagingError::from)?;

        println!("{}", dependency.version);
        if resolver.is_stable_line(&dependency.version) {
            eprintln!("{} {STABLE_LINE_WARNING}", "warning:".yellow().bold());
        }
        Ok(())
    }
}
