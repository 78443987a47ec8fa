//! Full supply runs through the `nginx-buildpack` binary.

use assert_cmd::Command;
use predicates::prelude::*;

use nginx_buildpack::test_utils::StagingFixture;

use super::{MANIFEST, NGINX_CONF};

fn fixture() -> StagingFixture {
    let fixture = StagingFixture::new().unwrap();
    fixture.write_manifest(MANIFEST).unwrap();
    for version in ["1.25.3", "1.26.1"] {
        let root = fixture.add_cached_nginx(version).unwrap();
        #[cfg(unix)]
        super::write_fake_nginx(&root.join("nginx/sbin/nginx"));
        #[cfg(not(unix))]
        let _ = root;
    }
    fixture
}

fn supply(fixture: &StagingFixture) -> Command {
    let mut cmd = Command::cargo_bin("nginx-buildpack").unwrap();
    cmd.env("NO_COLOR", "1")
        .env_remove("VCAP_SERVICES")
        .arg("supply")
        .arg(&fixture.build_dir)
        .arg(&fixture.cache_dir)
        .arg(&fixture.deps_dir)
        .arg("0")
        .arg("--buildpack-dir")
        .arg(&fixture.buildpack_dir);
    cmd
}

#[cfg(unix)]
#[test]
fn test_supply_defaults_to_mainline() {
    let fixture = fixture();
    fixture.write_app_file("nginx.conf", NGINX_CONF).unwrap();

    supply(&fixture)
        .assert()
        .success()
        .stdout(predicate::str::contains("Supplying nginx"))
        .stdout(predicate::str::contains("No nginx version specified - using mainline => 1.25.3"))
        .stdout(predicate::str::contains("discouraged").not());

    let dep_dir = fixture.dep_dir();
    assert!(dep_dir.join("nginx/nginx/sbin/nginx").is_file());
    assert!(dep_dir.join("bin/varify").is_file());
    assert!(dep_dir.join("bin/nginx").symlink_metadata().is_ok());
    assert!(fixture.build_dir.join("logs").is_dir());

    let profile = std::fs::read_to_string(dep_dir.join("profile.d/nginx.sh")).unwrap();
    assert_eq!(profile, "export NGINX_MODULES=$DEPS_DIR/0/nginx/nginx/modules\nmkdir -p logs");

    let conf = std::fs::read_to_string(fixture.build_dir.join("nginx.conf")).unwrap();
    assert_eq!(conf, NGINX_CONF);
}

#[cfg(unix)]
#[test]
fn test_supply_requested_stable_warns() {
    let fixture = fixture();
    fixture.write_app_file("nginx.conf", NGINX_CONF).unwrap();
    fixture.write_app_file("buildpack.yml", "nginx:\n  version: stable\n").unwrap();

    supply(&fixture)
        .assert()
        .success()
        .stdout(predicate::str::contains("Requested nginx version: stable => 1.26.1"))
        .stdout(predicate::str::contains("discouraged"));

    assert!(fixture.dep_dir().join("nginx/nginx/sbin/nginx").is_file());
}

#[cfg(unix)]
#[test]
fn test_supply_rejected_configuration() {
    let fixture = fixture();
    fixture.write_app_file("nginx.conf", "# {{port}}\nhttp { server { listen 80; } }\n").unwrap();

    supply(&fixture)
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("[emerg]"))
        .stderr(predicate::str::contains("Could not validate nginx.conf"));

    assert!(!fixture.dep_dir().join("profile.d/nginx.sh").exists());
}

#[test]
fn test_supply_missing_configuration() {
    let fixture = fixture();

    supply(&fixture)
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("nginx.conf file must be present at the app root"));
}

#[test]
fn test_supply_missing_placeholder() {
    let fixture = fixture();
    fixture.write_app_file("nginx.conf", "http { server { listen 8080; } }\n").unwrap();

    supply(&fixture)
        .assert()
        .failure()
        .stdout(predicate::str::contains("must be configured to respect the value of `{{port}}`"));
}

#[test]
fn test_supply_unknown_version_lists_available() {
    let fixture = fixture();
    fixture.write_app_file("nginx.conf", NGINX_CONF).unwrap();
    fixture.write_app_file("buildpack.yml", "nginx:\n  version: 1.99.x\n").unwrap();

    supply(&fixture)
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("Available versions: mainline, stable, 1.25.x, 1.26.x, 1.25.0, 1.25.3, 1.26.1"))
        .stderr(predicate::str::contains("Could not determine version"));

    assert!(!fixture.dep_dir().join("nginx").exists());
}

#[test]
fn test_supply_uncached_version() {
    let fixture = fixture();
    fixture.write_app_file("nginx.conf", NGINX_CONF).unwrap();
    fixture.write_app_file("buildpack.yml", "nginx:\n  version: 1.25.0\n").unwrap();

    supply(&fixture)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not install nginx"));
}
