//! Command-line interface for the nginx buildpack.
//!
//! # Commands
//!
//! - `supply` - Run the supply phase against a staging layout
//! - `resolve` - Show which nginx version a request resolves to
//! - `validate` - Check an application's `nginx.conf` with an installed nginx
//! - `render` - Render a configuration template with the current environment
//!
//! # Global Options
//!
//! - `--verbose` - Enable debug logging
//! - `--quiet` - Only log warnings and errors
//! - `--no-color` - Disable coloured output
//!
//! Logging goes to stderr through `tracing`; `RUST_LOG` is honoured unless
//! `--verbose` or `--quiet` is given. Staging output goes to stdout.
//!
//! # Examples
//!
//! ```bash
//! nginx-buildpack supply /tmp/app /tmp/cache /tmp/deps 0
//! nginx-buildpack resolve --version stable --manifest ./manifest.yml
//! nginx-buildpack validate /tmp/app --nginx-dir /tmp/deps/0/nginx/nginx
//! nginx-buildpack render nginx.conf --output /tmp/nginx.conf
//! ```

mod render;
mod resolve;
mod supply;
mod validate;

pub use render::{RenderCommand, render_file};
pub use resolve::ResolveCommand;
pub use supply::SupplyCommand;
pub use validate::ValidateCommand;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Settings derived from the global flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Filter directive overriding `RUST_LOG`, if any.
    pub log_level: Option<String>,
    pub no_color: bool,
}

impl CliConfig {
    /// Install the tracing subscriber and colour settings.
    ///
    /// Safe to call more than once; only the first subscriber sticks.
    pub fn apply(&self) {
        if self.no_color {
            colored::control::set_override(false);
        }
        init_logging(self.log_level.as_deref());
    }
}

/// Install a stderr `tracing` subscriber.
///
/// `level` wins over `RUST_LOG`; with neither, only warnings are shown.
pub fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Staging tools for nginx applications.
#[derive(Parser, Debug)]
#[command(
    name = "nginx-buildpack",
    about = "Stage nginx applications - version resolution, config rendering and validation",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable coloured output.
    #[arg(long, global = true, env = "NO_COLOR", value_parser = clap::builder::FalseyValueParser::new())]
    no_color: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Install nginx and validate nginx.conf for an application
    Supply(SupplyCommand),
    /// Resolve a version request against the buildpack manifest
    Resolve(ResolveCommand),
    /// Validate nginx.conf with an installed nginx
    Validate(ValidateCommand),
    /// Render a configuration template
    Render(RenderCommand),
}

impl Cli {
    /// Apply global flags and run the selected command.
    pub fn execute(self) -> Result<()> {
        self.build_config().apply();

        match self.command {
            Commands::Supply(cmd) => cmd.execute(),
            Commands::Resolve(cmd) => cmd.execute(),
            Commands::Validate(cmd) => cmd.execute(),
            Commands::Render(cmd) => cmd.execute(),
        }
    }

    /// Translate the global flags into a [`CliConfig`].
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            Some("warn".to_string())
        } else {
            None
        };

        CliConfig {
            log_level,
            no_color: self.no_color,
        }
    }
}

/// Root of the installed buildpack: the parent of the directory holding the
/// running executable (`<root>/bin/<exe>`).
pub(crate) fn buildpack_dir_from_exe() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("Failed to locate the running executable")?;
    exe.parent()
        .and_then(|bin| bin.parent())
        .map(PathBuf::from)
        .with_context(|| format!("Cannot derive buildpack directory from {}", exe.display()))
}
