//! The supply phase: install nginx and check the application's configuration.
//!
//! [`Supplier::run`] performs the staging steps in order and stops at the
//! first failure, logging which step failed:
//!
//! 1. copy the `varify` tool into the dependency `bin` directory
//! 2. read `buildpack.yml`, the manifest's version lines, and create `logs/`
//! 3. resolve, install and link nginx
//! 4. validate `nginx.conf` against the installed nginx
//! 5. write the `profile.d` script that exports `NGINX_MODULES` at launch
//!
//! All platform access goes through the [`Stager`], [`Manifest`],
//! [`Installer`] and [`CommandRunner`] collaborators.


use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::command::CommandRunner;
use crate::config::BuildpackConfig;
use crate::constants::{
    LOGS_DIR, MODULES_ENV, NGINX_DEPENDENCY, STABLE_LINE_WARNING, VARIFY_BINARY,
};
use crate::core::StagingError;
use crate::installer::Installer;
use crate::manifest::Manifest;
use crate::models::Dependency;
use crate::stager::Stager;
use crate::templating::Environment;
use crate::utils::fs::{ensure_dir, ensure_parent_dir, file_exists};
use crate::utils::output::StagingLog;
use crate::validation::{ConfigValidator, ValidationError};
use crate::version::{VersionLines, VersionResolver};

/// Drives one supply run.
pub struct Supplier<'a> {
    stager: &'a dyn Stager,
    manifest: &'a dyn Manifest,
    installer: &'a dyn Installer,
    runner: &'a dyn CommandRunner,
    environment: Arc<dyn Environment>,
    log: &'a StagingLog,
    config: BuildpackConfig,
    version_lines: VersionLines,
}

impl<'a> Supplier<'a> {
    pub fn new(
        stager: &'a dyn Stager,
        manifest: &'a dyn Manifest,
        installer: &'a dyn Installer,
        runner: &'a dyn CommandRunner,
        environment: Arc<dyn Environment>,
        log: &'a StagingLog,
    ) -> Self {
        Self {
            stager,
            manifest,
            installer,
            runner,
            environment,
            log,
            config: BuildpackConfig::default(),
            version_lines: VersionLines::default(),
        }
    }

    /// Run every supply step.
    ///
    /// # Errors
    ///
    /// The first step failure, after it has been written to the staging log.
    pub fn run(&mut self) -> Result<(), StagingError> {
        self.log.begin_step("Supplying nginx");

        self.install_varify()
            .map_err(StagingError::step("copy varify"))
            .map_err(|e| self.report(e))?;
        self.setup().map_err(StagingError::step("setup")).map_err(|e| self.report(e))?;
        self.install_nginx().map_err(|e| self.report(e))?;
        self.validate_nginx_conf().map_err(|e| self.report(e))?;
        self.write_profile_d()
            .map_err(StagingError::step("write profile.d"))
            .map_err(|e| self.report(e))?;

        Ok(())
    }

    /// Copy `<buildpack>/bin/varify` into the dependency `bin` directory
    /// unless an earlier run already did.
    pub fn install_varify(&self) -> Result<()> {
        let target = self.stager.dep_dir().join("bin").join(VARIFY_BINARY);
        if file_exists(&target)? {
            tracing::debug!("{} already installed", target.display());
            return Ok(());
        }

        let source = self.manifest.root_dir().join("bin").join(VARIFY_BINARY);
        ensure_parent_dir(&target)?;
        std::fs::copy(&source, &target).with_context(|| {
            format!("Failed to copy {} to {}", source.display(), target.display())
        })?;
        Ok(())
    }

    /// Load user configuration and version lines, and create `logs/`.
    pub fn setup(&mut self) -> Result<()> {
        self.config = BuildpackConfig::load(self.stager.build_dir())?;
        self.version_lines = self.manifest.version_lines().clone();

        let logs_dir = self.stager.build_dir().join(LOGS_DIR);
        ensure_dir(&logs_dir).context("Could not create 'logs' directory")?;
        Ok(())
    }

    /// Resolve the requested nginx version, install it and put it on PATH.
    pub fn install_nginx(&self) -> Result<Dependency, StagingError> {
        let requested = self.config.requested_version();
        let available = self.manifest.all_dependency_versions(NGINX_DEPENDENCY);
        let resolver = VersionResolver::new(&self.version_lines);

        let dependency = match resolver.resolve(NGINX_DEPENDENCY, requested, &available) {
            Ok(dependency) => dependency,
            Err(e) => {
                self.log.info(&format!(
                    "Available versions: {}",
                    resolver.available_versions(&available).join(", ")
                ));
                return Err(e.into());
            }
        };

        if requested.is_empty() {
            self.log.begin_step(&format!(
                "No nginx version specified - using mainline => {}",
                dependency.version
            ));
        } else {
            self.log.begin_step(&format!(
                "Requested nginx version: {requested} => {}",
                dependency.version
            ));
        }

        if resolver.is_stable_line(&dependency.version) {
            self.log.warning(STABLE_LINE_WARNING);
        }

        let dir = self.nginx_dir();
        self.installer
            .install_dependency(&dependency, &dir)
            .map_err(StagingError::step("install nginx"))?;
        self.stager
            .add_bin_dependency_link(&self.nginx_binary(), NGINX_DEPENDENCY)
            .map_err(StagingError::step("link nginx"))?;

        Ok(dependency)
    }

    /// Check `nginx.conf` with the installed nginx.
    pub fn validate_nginx_conf(&self) -> Result<(), StagingError> {
        let validator = ConfigValidator::new(
            self.nginx_binary(),
            self.modules_dir(),
            Arc::clone(&self.environment),
            self.runner,
        );

        validator.validate(self.stager.build_dir()).map_err(|e| {
            match &e {
                ValidationError::NotFound {
                    ..
                } => self.log.error("nginx.conf file must be present at the app root"),
                ValidationError::NoPortPlaceholder {
                    ..
                } => self
                    .log
                    .error("nginx.conf file must be configured to respect the value of `{{port}}`"),
                ValidationError::SyntaxError {
                    diagnostics,
                } => {
                    for line in diagnostics.lines() {
                        self.log.info(line);
                    }
                }
                ValidationError::Render {
                    ..
                }
                | ValidationError::Io {
                    ..
                } => {}
            }
            StagingError::from(e)
        })
    }

    /// Write `profile.d/nginx.sh`, which exports the modules directory at launch.
    pub fn write_profile_d(&self) -> Result<()> {
        let script = format!(
            "export {MODULES_ENV}=$DEPS_DIR/{}/nginx/nginx/modules\nmkdir -p {LOGS_DIR}",
            self.stager.deps_idx()
        );
        self.stager.write_profile_d(NGINX_DEPENDENCY, &script)
    }

    fn nginx_dir(&self) -> PathBuf {
        self.stager.dep_dir().join(NGINX_DEPENDENCY)
    }

    fn nginx_binary(&self) -> PathBuf {
        self.nginx_dir().join("nginx").join("sbin").join("nginx")
    }

    fn modules_dir(&self) -> PathBuf {
        self.nginx_dir().join("nginx").join("modules")
    }

    fn report(&self, error: StagingError) -> StagingError {
        self.log.error(&error.to_string());
        error
    }
}
