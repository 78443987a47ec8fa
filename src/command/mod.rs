//! Invocation of external executables.
//!
//! Staging shells out for exactly one thing, the nginx configuration test, but
//! goes through [`CommandRunner`] so the validator can be exercised without an
//! nginx binary on the machine.
//!
//! ```rust,no_run
//! use nginx_buildpack::command::{CommandRunner, ProcessCommand, SystemCommandRunner};
//!
//! # fn example() -> anyhow::Result<()> {
//! let output = SystemCommandRunner.run(
//!     &ProcessCommand::new("/deps/0/nginx/nginx/sbin/nginx")
//!         .args(["-t", "-c", "/tmp/app/nginx.conf", "-p", "/tmp/app"])
//!         .current_dir("/tmp/app"),
//! )?;
//! if !output.success() {
//!     eprintln!("{}", output.diagnostics());
//! }
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{Context, Result};

/// Builder describing one process invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessCommand {
    program: PathBuf,
    args: Vec<String>,
    current_dir: Option<PathBuf>,
    env_vars: Vec<(String, String)>,
}

impl ProcessCommand {
    /// Start a command for `program`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            env_vars: Vec::new(),
        }
    }

    /// Append one argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Run from `dir` instead of the current directory.
    #[must_use]
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Add an environment variable on top of the inherited environment.
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.push((key.into(), value.into()));
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    pub fn get_current_dir(&self) -> Option<&Path> {
        self.current_dir.as_deref()
    }

    pub fn get_envs(&self) -> &[(String, String)] {
        &self.env_vars
    }

    /// The command line as it would be typed, for logs and error messages.
    #[must_use]
    pub fn display(&self) -> String {
        std::iter::once(self.program.display().to_string())
            .chain(self.args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; `None` when the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Whether the process exited with status zero.
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self.code, Some(0))
    }

    /// Combined diagnostic text: stderr first, then stdout, trimmed.
    ///
    /// nginx reports configuration problems on stderr, but some builds log to
    /// stdout, so both are kept.
    #[must_use]
    pub fn diagnostics(&self) -> String {
        [self.stderr.trim(), self.stdout.trim()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Capability to run an external executable and capture its output.
pub trait CommandRunner {
    /// Run `command` to completion.
    ///
    /// A non-zero exit is not an error here; it is reported through
    /// [`CommandOutput::code`].
    ///
    /// # Errors
    ///
    /// Returns an error when the process cannot be started.
    fn run(&self, command: &ProcessCommand) -> Result<CommandOutput>;
}

/// Runs commands with [`std::process::Command`], blocking until exit.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, command: &ProcessCommand) -> Result<CommandOutput> {
        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args).stdin(Stdio::null()).stdout(Stdio::piped()).stderr(Stdio::piped());
        if let Some(dir) = &command.current_dir {
            cmd.current_dir(dir);
        }
        for (key, value) in &command.env_vars {
            tracing::trace!(target: "command", "Setting env var: {key}={value}");
            cmd.env(key, value);
        }

        tracing::debug!(target: "command", "Executing: {}", command.display());
        let output =
            cmd.output().with_context(|| format!("Failed to execute {}", command.display()))?;

        let result = CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        if !result.success() {
            tracing::debug!(
                target: "command",
                "Command exited with {:?}: {}",
                result.code,
                result.diagnostics()
            );
        }
        Ok(result)
    }
}
