//! Recording fakes for the staging collaborators.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

use crate::command::{CommandOutput, CommandRunner, ProcessCommand};
use crate::constants::NGINX_CONF;
use crate::installer::Installer;
use crate::manifest::Manifest;
use crate::models::Dependency;
use crate::stager::Stager;
use crate::version::VersionLines;

/// Manifest with fixed contents.
#[derive(Debug, Clone, Default)]
pub struct FakeManifest {
    pub root_dir: PathBuf,
    pub version_lines: VersionLines,
    pub versions: BTreeMap<String, Vec<String>>,
}

impl FakeManifest {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_line(mut self, alias: &str, constraint: &str) -> Self {
        self.version_lines.insert(alias, constraint);
        self
    }

    #[must_use]
    pub fn with_versions(mut self, name: &str, versions: &[&str]) -> Self {
        self.versions
            .entry(name.to_string())
            .or_default()
            .extend(versions.iter().map(|v| (*v).to_string()));
        self
    }
}

impl Manifest for FakeManifest {
    fn all_dependency_versions(&self, name: &str) -> Vec<String> {
        self.versions.get(name).cloned().unwrap_or_default()
    }

    fn version_lines(&self) -> &VersionLines {
        &self.version_lines
    }

    fn root_dir(&self) -> &Path {
        &self.root_dir
    }
}

/// Installer that records requests and lays down an empty nginx tree.
#[derive(Debug, Default)]
pub struct RecordingInstaller {
    pub installs: RefCell<Vec<(Dependency, PathBuf)>>,
    pub fail: bool,
}

impl RecordingInstaller {
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

impl Installer for RecordingInstaller {
    fn install_dependency(&self, dependency: &Dependency, out_dir: &Path) -> Result<()> {
        self.installs.borrow_mut().push((dependency.clone(), out_dir.to_path_buf()));
        if self.fail {
            bail!("Dependency {dependency} is not available");
        }

        let sbin = out_dir.join("nginx").join("sbin");
        std::fs::create_dir_all(&sbin)?;
        std::fs::create_dir_all(out_dir.join("nginx").join("modules"))?;
        std::fs::write(sbin.join("nginx"), "")?;
        Ok(())
    }
}

/// Stager over real paths that records links and profile scripts in memory.
#[derive(Debug)]
pub struct RecordingStager {
    pub build_dir: PathBuf,
    pub deps_dir: PathBuf,
    pub deps_idx: String,
    pub links: RefCell<Vec<(PathBuf, String)>>,
    pub profile_scripts: RefCell<BTreeMap<String, String>>,
}

impl RecordingStager {
    pub fn new(build_dir: impl Into<PathBuf>, deps_dir: impl Into<PathBuf>, deps_idx: &str) -> Self {
        Self {
            build_dir: build_dir.into(),
            deps_dir: deps_dir.into(),
            deps_idx: deps_idx.to_string(),
            links: RefCell::new(Vec::new()),
            profile_scripts: RefCell::new(BTreeMap::new()),
        }
    }
}

impl Stager for RecordingStager {
    fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    fn dep_dir(&self) -> PathBuf {
        self.deps_dir.join(&self.deps_idx)
    }

    fn deps_dir(&self) -> &Path {
        &self.deps_dir
    }

    fn deps_idx(&self) -> &str {
        &self.deps_idx
    }

    fn add_bin_dependency_link(&self, target: &Path, name: &str) -> Result<()> {
        self.links.borrow_mut().push((target.to_path_buf(), name.to_string()));
        Ok(())
    }

    fn write_profile_d(&self, name: &str, script: &str) -> Result<()> {
        self.profile_scripts.borrow_mut().insert(name.to_string(), script.to_string());
        Ok(())
    }
}

/// One invocation seen by [`RecordingCommandRunner`].
#[derive(Debug, Clone)]
pub struct RecordedCommand {
    pub command: ProcessCommand,
    /// `nginx.conf` in the working directory at the time of the call.
    pub rendered_conf: Option<String>,
}

/// Command runner that records invocations and returns a canned result.
#[derive(Debug, Default)]
pub struct RecordingCommandRunner {
    pub output: CommandOutput,
    pub calls: RefCell<Vec<RecordedCommand>>,
}

impl RecordingCommandRunner {
    /// Every command exits 0.
    #[must_use]
    pub fn succeeding() -> Self {
        Self::exiting(0, "")
    }

    /// Every command exits with `code`, writing `stderr`.
    #[must_use]
    pub fn exiting(code: i32, stderr: &str) -> Self {
        Self {
            output: CommandOutput {
                code: Some(code),
                stdout: String::new(),
                stderr: stderr.to_string(),
            },
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl CommandRunner for RecordingCommandRunner {
    fn run(&self, command: &ProcessCommand) -> Result<CommandOutput> {
        let rendered_conf = command
            .get_current_dir()
            .and_then(|dir| std::fs::read_to_string(dir.join(NGINX_CONF)).ok());
        self.calls.borrow_mut().push(RecordedCommand {
            command: command.clone(),
            rendered_conf,
        });
        Ok(self.output.clone())
    }
}
