//! `supply` command: stage nginx for an application.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;

use crate::command::SystemCommandRunner;
use crate::installer::CacheInstaller;
use crate::manifest::BuildpackManifest;
use crate::stager::DirectoryStager;
use crate::supply::Supplier;
use crate::templating::ProcessEnvironment;
use crate::utils::output::StagingLog;

/// Run the supply phase with the real collaborators.
#[derive(Args, Debug)]
pub struct SupplyCommand {
    /// Application build directory
    pub build_dir: PathBuf,

    /// Cache directory preserved between stagings
    pub cache_dir: PathBuf,

    /// Dependencies directory shared by all buildpacks
    pub deps_dir: PathBuf,

    /// This buildpack's index into the dependencies directory
    pub deps_idx: String,

    /// Buildpack root holding manifest.yml, bin/varify and dependencies/
    /// [default: parent of the executable's directory]
    #[arg(long, env = "BUILDPACK_DIR")]
    pub buildpack_dir: Option<PathBuf>,
}

impl SupplyCommand {
    pub fn execute(self) -> Result<()> {
        let buildpack_dir = match self.buildpack_dir {
            Some(dir) => dir,
            None => super::buildpack_dir_from_exe()?,
        };
        tracing::debug!("Using buildpack at {}", buildpack_dir.display());

        let stager =
            DirectoryStager::new(self.build_dir, self.cache_dir, self.deps_dir, self.deps_idx);
        let manifest = BuildpackManifest::load(&buildpack_dir)?;
        let installer = CacheInstaller::for_buildpack(&buildpack_dir);
        let runner = SystemCommandRunner;
        let log = StagingLog::stdout();

        Supplier::new(&stager, &manifest, &installer, &runner, Arc::new(ProcessEnvironment), &log)
            .run()?;
        Ok(())
    }
}
