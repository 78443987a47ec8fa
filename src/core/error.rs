//! Error handling for staging.
//!
//! Each component reports its own typed error ([`ResolutionError`],
//! [`TemplateError`], [`ValidationError`], ...). The staging driver wraps them
//! in [`StagingError`], and the command-line front ends turn whatever reached
//! them into an [`ErrorContext`] with [`user_friendly_error`]: the error, some
//! details and a suggestion, printed in colour.
//!
//! # Error Handling Patterns
//!
//! ```rust,no_run
//! use nginx_buildpack::core::user_friendly_error;
//!
//! fn stage() -> anyhow::Result<()> {
//!     anyhow::bail!("Failed to read file: /tmp/app/nginx.conf")
//! }
//!
//! if let Err(e) = stage() {
//!     user_friendly_error(e).display();
//!     std::process::exit(1);
//! }
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

use crate::templating::{ServiceLookupError, TemplateError};
use crate::validation::ValidationError;
use crate::version::ResolutionError;

/// Failure of a staging run.
///
/// Nothing is retried: the first failing step ends the run with one of these.
#[derive(Error, Debug)]
pub enum StagingError {
    /// The requested version could not be resolved.
    #[error("Could not determine version: {0}")]
    Resolution(#[from] ResolutionError),

    /// The application's `nginx.conf` was rejected.
    #[error("Could not validate nginx.conf: {0}")]
    Validation(#[from] ValidationError),

    /// A template could not be rendered outside validation (`varify`, `render`).
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// A file system, process or collaborator failure in step `step`.
    #[error("Could not {step}: {source:#}")]
    Step {
        step: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl StagingError {
    /// Wrap a collaborator failure with the step it interrupted.
    pub fn step(step: &'static str) -> impl FnOnce(anyhow::Error) -> Self {
        move |source| Self::Step {
            step,
            source,
        }
    }
}

/// An error prepared for display: the message plus optional details and a
/// suggestion for fixing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    pub error: String,
    pub suggestion: Option<String>,
    pub details: Option<String>,
}

impl ErrorContext {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details explaining the error.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print to stderr: error in red, details in yellow, suggestion in green.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] with guidance for the user.
///
/// The whole error chain is searched for the typed errors this crate
/// produces; the first recognised one decides the suggestion. Anything else
/// is reported with its full chain and no suggestion.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let message = format!("{error:#}");

    for cause in error.chain() {
        if let Some(staging) = cause.downcast_ref::<StagingError>() {
            match staging {
                StagingError::Resolution(e) => return resolution_context(message, e),
                StagingError::Validation(e) => return validation_context(message, e),
                StagingError::Template(e) => return template_context(message, e),
                StagingError::Step {
                    ..
                } => continue,
            }
        }
        if let Some(e) = cause.downcast_ref::<ResolutionError>() {
            return resolution_context(message, e);
        }
        if let Some(e) = cause.downcast_ref::<ValidationError>() {
            return validation_context(message, e);
        }
        if let Some(e) = cause.downcast_ref::<TemplateError>() {
            return template_context(message, e);
        }
        if let Some(e) = cause.downcast_ref::<ServiceLookupError>() {
            return ErrorContext::new(message)
                .with_details(e.to_string())
                .with_suggestion("Check the service bindings in VCAP_SERVICES");
        }
        if let Some(e) = cause.downcast_ref::<serde_yaml::Error>() {
            return ErrorContext::new(message)
                .with_details(e.to_string())
                .with_suggestion("Check the YAML syntax of buildpack.yml and manifest.yml");
        }
        if let Some(e) = cause.downcast_ref::<std::io::Error>() {
            match e.kind() {
                std::io::ErrorKind::PermissionDenied => {
                    return ErrorContext::new(message)
                        .with_suggestion("Check file ownership and permissions of the staging directories");
                }
                std::io::ErrorKind::NotFound => {
                    return ErrorContext::new(message)
                        .with_suggestion("Check that the file or directory exists and the path is correct");
                }
                _ => {}
            }
        }
    }

    ErrorContext::new(message)
}

fn resolution_context(message: String, error: &ResolutionError) -> ErrorContext {
    let context = ErrorContext::new(message);
    match error {
        ResolutionError::NoMainlineAlias => context
            .with_details("Without a requested version the mainline line is used")
            .with_suggestion("Add a 'mainline' entry under version_lines in manifest.yml"),
        ResolutionError::InvalidConstraint {
            ..
        } => context.with_suggestion(
            "Use a version such as 1.25.3, a wildcard such as 1.25.x, or a version line name",
        ),
        ResolutionError::NoMatchingVersion {
            ..
        } => {
            let context = context.with_suggestion(
                "Set nginx.version in buildpack.yml to one of the available versions or lines",
            );
            match error.available_listing() {
                Some(listing) => {
                    context.with_details(format!("Available versions: {}", listing.join(", ")))
                }
                None => context,
            }
        }
    }
}

fn validation_context(message: String, error: &ValidationError) -> ErrorContext {
    let context = ErrorContext::new(message);
    match error {
        ValidationError::NotFound {
            ..
        } => context.with_suggestion("nginx.conf file must be present at the app root"),
        ValidationError::NoPortPlaceholder {
            ..
        } => context
            .with_details("The platform assigns the port at launch")
            .with_suggestion("nginx.conf file must be configured to respect the value of `{{port}}`, e.g. `listen {{port}};`"),
        ValidationError::Render {
            source,
            ..
        } => template_context(context.error, source),
        ValidationError::SyntaxError {
            diagnostics,
        } => context
            .with_details(diagnostics.clone())
            .with_suggestion("Fix the directives reported by `nginx -t` above"),
        ValidationError::Io {
            ..
        } => context,
    }
}

fn template_context(message: String, error: &TemplateError) -> ErrorContext {
    let context = ErrorContext::new(message);
    match error {
        TemplateError::Parse {
            ..
        } => context.with_suggestion(
            "Check template syntax: directives look like {{port}}, {{ env(name=\"VAR\") }} or {{ module(name=\"ngx_stream_module\") }}",
        ),
        TemplateError::Exec {
            ..
        } => context.with_suggestion(
            "Check that every variable and service binding referenced by the template exists",
        ),
    }
}
