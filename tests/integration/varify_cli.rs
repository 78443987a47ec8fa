use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn varify() -> Command {
    let mut cmd = Command::cargo_bin("varify").unwrap();
    cmd.env("NO_COLOR", "1").env_remove("VCAP_SERVICES").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_renders_in_place() {
    let dir = TempDir::new().unwrap();
    let conf = dir.path().join("nginx.conf");
    std::fs::write(
        &conf,
        "{{ module(name=\"ngx_stream_module\") }}\nlisten {{port}};\nset $who \"{{ env(name=\"WHO\") }}\";\n",
    )
    .unwrap();

    varify()
        .env("PORT", "4321")
        .env("NGINX_MODULES", "/deps/0/nginx/nginx/modules")
        .env("WHO", "world")
        .arg(&conf)
        .assert()
        .success()
        .stdout("");

    assert_eq!(
        std::fs::read_to_string(&conf).unwrap(),
        "load_module /deps/0/nginx/nginx/modules/ngx_stream_module.so;\nlisten 4321;\nset $who \"world\";\n"
    );
}

#[test]
fn test_reads_service_bindings() {
    let dir = TempDir::new().unwrap();
    let conf = dir.path().join("nginx.conf");
    std::fs::write(&conf, r#"proxy_pass {{ svcprop(service="api", name="backend", key="url") }};"#)
        .unwrap();

    varify()
        .env("VCAP_SERVICES", r#"{"api": [{"name": "backend", "url": "http://10.0.0.5:9000"}]}"#)
        .arg(&conf)
        .assert()
        .success();

    assert_eq!(std::fs::read_to_string(&conf).unwrap(), "proxy_pass http://10.0.0.5:9000;");
}

#[test]
fn test_failure_keeps_template() {
    let dir = TempDir::new().unwrap();
    let conf = dir.path().join("nginx.conf");
    let template = r#"listen {{port}}; {{ svcprop(service="db", name="missing", key="uri") }}"#;
    std::fs::write(&conf, template).unwrap();

    varify()
        .env("PORT", "8080")
        .arg(&conf)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error:"))
        .stderr(predicate::str::contains("No services of type 'db' are bound"));

    assert_eq!(std::fs::read_to_string(&conf).unwrap(), template);
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    varify()
        .arg(dir.path().join("nope.conf"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("nope.conf"));
}

#[test]
fn test_requires_path_argument() {
    varify().assert().failure().stderr(predicate::str::contains("Usage"));
}
