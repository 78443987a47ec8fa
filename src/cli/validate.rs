//! `validate` command: check nginx.conf without running a full supply.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use crate::command::SystemCommandRunner;
use crate::templating::ProcessEnvironment;
use crate::validation::ConfigValidator;

/// Validate an application's nginx.conf with an installed nginx.
#[derive(Args, Debug)]
pub struct ValidateCommand {
    /// Application build directory containing nginx.conf
    pub build_dir: PathBuf,

    /// Installed nginx tree holding sbin/nginx and modules/
    #[arg(long)]
    pub nginx_dir: PathBuf,
}

impl ValidateCommand {
    pub fn execute(self) -> Result<()> {
        let runner = SystemCommandRunner;
        let validator = ConfigValidator::new(
            self.nginx_dir.join("sbin").join("nginx"),
            self.nginx_dir.join("modules"),
            Arc::new(ProcessEnvironment),
            &runner,
        );

        validator.validate(&self.build_dir)?;
        println!("{} nginx.conf is valid", "✓".green());
        Ok(())
    }
}
