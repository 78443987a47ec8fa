//! Validation against a stand-in nginx executable run as a real process.

use std::sync::Arc;

use nginx_buildpack::command::SystemCommandRunner;
use nginx_buildpack::templating::MapEnvironment;
use nginx_buildpack::test_utils::StagingFixture;
use nginx_buildpack::validation::{ConfigValidator, ValidationError};

use super::NGINX_CONF;

#[cfg(unix)]
use super::write_fake_nginx;

fn scratch_is_empty(fixture: &StagingFixture) -> bool {
    let scratch = fixture.path().join("scratch");
    std::fs::read_dir(scratch).map(|mut entries| entries.next().is_none()).unwrap_or(true)
}

#[cfg(unix)]
#[test]
fn test_valid_configuration() {
    let fixture = StagingFixture::new().unwrap();
    let nginx = fixture.path().join("nginx/sbin/nginx");
    write_fake_nginx(&nginx);
    fixture.write_app_file("nginx.conf", NGINX_CONF).unwrap();
    fixture.write_app_file("public/index.html", "<h1>hi</h1>").unwrap();
    std::fs::create_dir_all(fixture.path().join("scratch")).unwrap();

    let runner = SystemCommandRunner;
    let env = MapEnvironment::new().with("PORT", "3000");
    ConfigValidator::new(&nginx, fixture.path().join("nginx/modules"), Arc::new(env), &runner)
        .with_scratch_root(fixture.path().join("scratch"))
        .validate(&fixture.build_dir)
        .unwrap();

    assert!(scratch_is_empty(&fixture));
    // The application's template is never rewritten by validation.
    let conf = std::fs::read_to_string(fixture.build_dir.join("nginx.conf")).unwrap();
    assert_eq!(conf, NGINX_CONF);
}

#[cfg(unix)]
#[test]
fn test_rejected_configuration_reports_diagnostics() {
    let fixture = StagingFixture::new().unwrap();
    let nginx = fixture.path().join("nginx/sbin/nginx");
    write_fake_nginx(&nginx);
    // The placeholder is present but only inside a comment.
    fixture.write_app_file("nginx.conf", "# {{port}}\nevents {}\nhttp { server { listen 80; } }\n").unwrap();
    std::fs::create_dir_all(fixture.path().join("scratch")).unwrap();

    let runner = SystemCommandRunner;
    let err = ConfigValidator::new(
        &nginx,
        fixture.path().join("nginx/modules"),
        Arc::new(MapEnvironment::new()),
        &runner,
    )
    .with_scratch_root(fixture.path().join("scratch"))
    .validate(&fixture.build_dir)
    .unwrap_err();

    match err {
        ValidationError::SyntaxError {
            diagnostics,
        } => assert!(diagnostics.contains("[emerg]"), "{diagnostics}"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(scratch_is_empty(&fixture));
}

#[test]
fn test_missing_nginx_binary_is_an_io_error() {
    let fixture = StagingFixture::new().unwrap();
    fixture.write_app_file("nginx.conf", NGINX_CONF).unwrap();
    std::fs::create_dir_all(fixture.path().join("scratch")).unwrap();

    let runner = SystemCommandRunner;
    let err = ConfigValidator::new(
        fixture.path().join("no-such-nginx"),
        fixture.path().join("modules"),
        Arc::new(MapEnvironment::new()),
        &runner,
    )
    .with_scratch_root(fixture.path().join("scratch"))
    .validate(&fixture.build_dir)
    .unwrap_err();

    assert!(matches!(err, ValidationError::Io { .. }), "{err:?}");
    assert!(scratch_is_empty(&fixture));
}

#[test]
fn test_checks_run_in_order_before_nginx() {
    let fixture = StagingFixture::new().unwrap();
    let runner = SystemCommandRunner;
    let validator = ConfigValidator::new(
        fixture.path().join("no-such-nginx"),
        fixture.path().join("modules"),
        Arc::new(MapEnvironment::new()),
        &runner,
    );

    let err = validator.validate(&fixture.build_dir).unwrap_err();
    assert!(matches!(err, ValidationError::NotFound { .. }));

    fixture.write_app_file("nginx.conf", "listen 8080;").unwrap();
    let err = validator.validate(&fixture.build_dir).unwrap_err();
    assert!(matches!(err, ValidationError::NoPortPlaceholder { .. }));

    fixture.write_app_file("nginx.conf", "listen {{ port }; {{port}}").unwrap();
    let err = validator.validate(&fixture.build_dir).unwrap_err();
    assert!(matches!(err, ValidationError::Render { .. }), "{err:?}");
}

#[cfg(unix)]
#[test]
fn test_symlinked_include_resolves_in_trial_copy() {
    use std::os::unix::fs::PermissionsExt;

    let fixture = StagingFixture::new().unwrap();
    // Accepts the configuration only when the include is a link that still
    // resolves from the trial prefix.
    let nginx = fixture.path().join("nginx/sbin/nginx");
    std::fs::create_dir_all(nginx.parent().unwrap()).unwrap();
    std::fs::write(
        &nginx,
        r#"#!/bin/sh
prefix="$5"
if [ -L "$prefix/mime.types" ] && grep -q "text/html" "$prefix/mime.types"; then
  exit 0
fi
echo "nginx: [emerg] open() \"$prefix/mime.types\" failed (2: No such file or directory)" >&2
exit 1
"#,
    )
    .unwrap();
    std::fs::set_permissions(&nginx, std::fs::Permissions::from_mode(0o755)).unwrap();

    fixture.write_app_file("shared/mime.types", "types { text/html html; }\n").unwrap();
    fixture.write_app_file("nginx.conf", "include mime.types;\nhttp { server { listen {{port}}; } }\n").unwrap();
    std::os::unix::fs::symlink("shared/mime.types", fixture.build_dir.join("mime.types")).unwrap();
    std::fs::create_dir_all(fixture.path().join("scratch")).unwrap();

    let runner = SystemCommandRunner;
    ConfigValidator::new(&nginx, fixture.path().join("nginx/modules"), Arc::new(MapEnvironment::new()), &runner)
        .with_scratch_root(fixture.path().join("scratch"))
        .validate(&fixture.build_dir)
        .unwrap();

    assert!(scratch_is_empty(&fixture));
}
