//! On-disk staging layout for tests.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;

use super::fakes::{FakeManifest, RecordingStager};

/// A buildpack root, a build directory and a dependencies directory, all
/// under one temporary directory removed on drop.
///
/// The buildpack root holds a `bin/varify` placeholder and, once
/// [`write_manifest`](Self::write_manifest) is called, a `manifest.yml`.
pub struct StagingFixture {
    pub temp_dir: TempDir,
    pub buildpack_dir: PathBuf,
    pub build_dir: PathBuf,
    pub cache_dir: PathBuf,
    pub deps_dir: PathBuf,
}

impl StagingFixture {
    pub fn new() -> Result<Self> {
        super::init_test_logging(None);

        let temp_dir = TempDir::new()?;
        let buildpack_dir = temp_dir.path().join("buildpack");
        let build_dir = temp_dir.path().join("build");
        let cache_dir = temp_dir.path().join("cache");
        let deps_dir = temp_dir.path().join("deps");

        for dir in [&build_dir, &cache_dir, &deps_dir.join("0")] {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::create_dir_all(buildpack_dir.join("bin"))?;
        std::fs::write(buildpack_dir.join("bin").join("varify"), "#!/bin/sh\n")?;

        Ok(Self {
            temp_dir,
            buildpack_dir,
            build_dir,
            cache_dir,
            deps_dir,
        })
    }

    /// Write a file relative to the build directory.
    pub fn write_app_file(&self, relative: &str, content: &str) -> Result<PathBuf> {
        let path = self.build_dir.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write fixture file {}", path.display()))?;
        Ok(path)
    }

    /// Write `manifest.yml` into the buildpack root.
    pub fn write_manifest(&self, content: &str) -> Result<()> {
        std::fs::write(self.buildpack_dir.join("manifest.yml"), content)?;
        Ok(())
    }

    /// Add a pre-extracted nginx tree for `version` under
    /// `<buildpack>/dependencies/nginx/<version>`.
    pub fn add_cached_nginx(&self, version: &str) -> Result<PathBuf> {
        let root = self.buildpack_dir.join("dependencies").join("nginx").join(version);
        std::fs::create_dir_all(root.join("nginx").join("sbin"))?;
        std::fs::create_dir_all(root.join("nginx").join("modules"))?;
        std::fs::write(root.join("nginx").join("sbin").join("nginx"), "")?;
        Ok(root)
    }

    /// Dependency directory for index 0.
    #[must_use]
    pub fn dep_dir(&self) -> PathBuf {
        self.deps_dir.join("0")
    }

    #[must_use]
    pub fn stager(&self) -> RecordingStager {
        RecordingStager::new(&self.build_dir, &self.deps_dir, "0")
    }

    /// Manifest with the usual mainline/stable lines and three nginx versions.
    #[must_use]
    pub fn manifest(&self) -> FakeManifest {
        FakeManifest::new(&self.buildpack_dir)
            .with_line("mainline", "1.25.x")
            .with_line("stable", "1.26.x")
            .with_versions("nginx", &["1.25.0", "1.25.3", "1.26.1"])
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }
}
