//! Pre-flight validation of the application's `nginx.conf`.
//!
//! Runs before the application is allowed to start so that a broken
//! configuration fails staging rather than the first deploy. Three stages run
//! in order and stop at the first failure:
//!
//! 1. **Existence**: `<build_dir>/nginx.conf` must exist
//! 2. **Port placeholder**: the raw template must reference the port
//! 3. **Syntax**: the build directory is copied to a scratch directory, the
//!    template is rendered there with a trial port, and `nginx -t` is run
//!    against the result
//!
//! The scratch directory is a [`TempDir`], removed on every exit path.

use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

use regex::Regex;
use thiserror::Error;

use crate::command::{CommandRunner, ProcessCommand};
use crate::constants::{MODULES_ENV, NGINX_CONF, PORT_ENV, TRIAL_PORT};
use crate::templating::{
    Environment, MapEnvironment, OverlayEnvironment, TemplateError, TemplateRenderer,
};
use crate::utils::fs::{TempDir, copy_dir, file_exists, read_text_file, safe_write};

/// Why a configuration was rejected.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("{} does not exist", .path.display())]
    NotFound {
        path: PathBuf,
    },

    #[error("{} does not contain the port placeholder {{{{port}}}}", .path.display())]
    NoPortPlaceholder {
        path: PathBuf,
    },

    /// The template itself could not be rendered.
    #[error("{} could not be rendered: {source}", .path.display())]
    Render {
        path: PathBuf,
        #[source]
        source: TemplateError,
    },

    /// `nginx -t` rejected the rendered configuration.
    #[error("nginx rejected the rendered configuration:\n{diagnostics}")]
    SyntaxError {
        diagnostics: String,
    },

    /// File system or process failure, with the originating path in `message`.
    #[error("Failed to {operation}: {message}")]
    Io {
        operation: String,
        message: String,
    },
}

impl ValidationError {
    fn io(operation: impl Into<String>, error: &anyhow::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            message: format!("{error:#}"),
        }
    }
}

/// Whether `text` references the listening port.
///
/// Accepts `{{port}}` with or without inner whitespace and the call form
/// `{{ port() }}`.
#[must_use]
pub fn has_port_placeholder(text: &str) -> bool {
    PORT_PATTERN.is_match(text)
}

static PORT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{-?\s*port\s*(?:\(\s*\))?\s*-?\}\}").expect("port pattern is valid")
});

/// Validates `nginx.conf` in a build directory against an installed nginx.
///
/// # Examples
///
/// ```rust,no_run
/// use std::path::Path;
/// use std::sync::Arc;
/// use nginx_buildpack::command::SystemCommandRunner;
/// use nginx_buildpack::templating::ProcessEnvironment;
/// use nginx_buildpack::validation::ConfigValidator;
///
/// let runner = SystemCommandRunner;
/// let validator = ConfigValidator::new(
///     "/deps/0/nginx/nginx/sbin/nginx",
///     "/deps/0/nginx/nginx/modules",
///     Arc::new(ProcessEnvironment),
///     &runner,
/// );
/// validator.validate(Path::new("/tmp/app")).unwrap();
/// ```
pub struct ConfigValidator<'a> {
    nginx_binary: PathBuf,
    modules_dir: PathBuf,
    environment: Arc<dyn Environment>,
    runner: &'a dyn CommandRunner,
    scratch_root: Option<PathBuf>,
}

impl<'a> ConfigValidator<'a> {
    /// Create a validator.
    ///
    /// `environment` supplies everything the template reads except `PORT` and
    /// `NGINX_MODULES`, which are fixed to the trial port and `modules_dir`.
    pub fn new(
        nginx_binary: impl Into<PathBuf>,
        modules_dir: impl Into<PathBuf>,
        environment: Arc<dyn Environment>,
        runner: &'a dyn CommandRunner,
    ) -> Self {
        Self {
            nginx_binary: nginx_binary.into(),
            modules_dir: modules_dir.into(),
            environment,
            runner,
            scratch_root: None,
        }
    }

    /// Create scratch copies under `root` instead of the system temp directory.
    #[must_use]
    pub fn with_scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.scratch_root = Some(root.into());
        self
    }

    /// Run all three stages against `build_dir`.
    ///
    /// # Errors
    ///
    /// The first failing stage's [`ValidationError`].
    pub fn validate(&self, build_dir: &Path) -> Result<(), ValidationError> {
        let conf_path = build_dir.join(NGINX_CONF);
        tracing::debug!("Validating {}", conf_path.display());

        if !file_exists(&conf_path).map_err(|e| ValidationError::io("check configuration", &e))? {
            return Err(ValidationError::NotFound {
                path: conf_path,
            });
        }

        let template = read_text_file(&conf_path)
            .map_err(|e| ValidationError::io("read configuration", &e))?;
        if !has_port_placeholder(&template) {
            return Err(ValidationError::NoPortPlaceholder {
                path: conf_path,
            });
        }

        self.check_syntax(build_dir, &template)
    }

    fn check_syntax(&self, build_dir: &Path, template: &str) -> Result<(), ValidationError> {
        let scratch = match &self.scratch_root {
            Some(root) => TempDir::new_in(root, "conf"),
            None => TempDir::new("conf"),
        }
        .map_err(|e| ValidationError::io("create scratch directory", &e))?;

        copy_dir(build_dir, scratch.path())
            .map_err(|e| ValidationError::io("copy build directory", &e))?;

        let trial_conf = scratch.path().join(NGINX_CONF);
        let rendered = self.trial_renderer().render_from_environment(template).map_err(|source| {
            ValidationError::Render {
                path: build_dir.join(NGINX_CONF),
                source,
            }
        })?;
        safe_write(&trial_conf, &rendered)
            .map_err(|e| ValidationError::io("write rendered configuration", &e))?;

        let command = ProcessCommand::new(&self.nginx_binary)
            .args(["-t", "-c"])
            .arg(trial_conf.display().to_string())
            .arg("-p")
            .arg(scratch.path().display().to_string())
            .current_dir(scratch.path());
        let output = self
            .runner
            .run(&command)
            .map_err(|e| ValidationError::io("run nginx configuration test", &e))?;

        if output.success() {
            tracing::debug!("nginx accepted the rendered configuration");
            Ok(())
        } else {
            Err(ValidationError::SyntaxError {
                diagnostics: output.diagnostics(),
            })
        }
    }

    fn trial_renderer(&self) -> TemplateRenderer {
        let overrides = MapEnvironment::new()
            .with(PORT_ENV, TRIAL_PORT)
            .with(MODULES_ENV, self.modules_dir.display().to_string());
        TemplateRenderer::new(Arc::new(OverlayEnvironment::new(
            Arc::clone(&self.environment),
            overrides,
        )))
    }
}
