use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use nginx_buildpack::manifest::{BuildpackManifest, Manifest};
use nginx_buildpack::version::{ResolutionError, VersionResolver};

use super::MANIFEST;

fn manifest_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("manifest.yml"), MANIFEST).unwrap();
    dir
}

#[test]
fn test_resolve_from_manifest_file() {
    let dir = manifest_dir();
    let manifest = BuildpackManifest::load(dir.path()).unwrap();
    let available = manifest.all_dependency_versions("nginx");
    let resolver = VersionResolver::new(manifest.version_lines());

    let cases = [("", "1.25.3"), ("mainline", "1.25.3"), ("stable", "1.26.1"), ("1.25.0", "1.25.0"), ("1.25.x", "1.25.3")];
    for (requested, expected) in cases {
        let dep = resolver.resolve("nginx", requested, &available).unwrap();
        assert_eq!(dep.version, expected, "request '{requested}'");
    }

    assert!(resolver.is_stable_line("1.26.1"));
    assert!(!resolver.is_stable_line("1.25.3"));

    let err = resolver.resolve("nginx", "1.99.x", &available).unwrap_err();
    assert!(matches!(err, ResolutionError::NoMatchingVersion { .. }));
}

#[test]
fn test_cli_prints_resolved_version() {
    let dir = manifest_dir();
    Command::cargo_bin("nginx-buildpack")
        .unwrap()
        .args(["resolve", "--version", "mainline", "--manifest"])
        .arg(dir.path().join("manifest.yml"))
        .assert()
        .success()
        .stdout("1.25.3\n");
}

#[test]
fn test_cli_warns_on_stable() {
    let dir = manifest_dir();
    Command::cargo_bin("nginx-buildpack")
        .unwrap()
        .env("NO_COLOR", "1")
        .args(["resolve", "--version", "stable", "--manifest"])
        .arg(dir.path().join("manifest.yml"))
        .assert()
        .success()
        .stdout("1.26.1\n")
        .stderr(predicate::str::contains("stable"));
}

#[test]
fn test_cli_unresolvable_version() {
    let dir = manifest_dir();
    Command::cargo_bin("nginx-buildpack")
        .unwrap()
        .env("NO_COLOR", "1")
        .args(["resolve", "--version", "2.0.0", "--manifest"])
        .arg(dir.path().join("manifest.yml"))
        .assert()
        .failure()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("Could not determine version"))
        .stderr(predicate::str::contains("1.26.1"));
}

#[test]
fn test_cli_missing_manifest() {
    let dir = TempDir::new().unwrap();
    Command::cargo_bin("nginx-buildpack")
        .unwrap()
        .args(["resolve", "--manifest"])
        .arg(dir.path().join("manifest.yml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("manifest.yml"));
}
