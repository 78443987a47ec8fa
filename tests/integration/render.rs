use std::sync::Arc;

use nginx_buildpack::templating::{MapEnvironment, TemplateError, TemplateRenderer};

const SERVICES: &str = r#"{
  "db": [
    {"name": "mydb", "uri": "postgres://u:p@db:5432/app", "creds": {"user": "app", "port": 5432}},
    {"name": "mydb", "uri": "postgres://shadowed"}
  ],
  "cache": [{"name": "redis", "tags": ["a", "b"], "host": null}]
}"#;

fn renderer() -> TemplateRenderer {
    TemplateRenderer::new(Arc::new(
        MapEnvironment::new()
            .with("PORT", "8080")
            .with("NGINX_MODULES", "/home/vcap/deps/0/nginx/nginx/modules"),
    ))
}

#[test]
fn test_full_template() {
    let template = r#"{{ module(name="ngx_http_geoip_module") }}
events {}
http {
  upstream db { server {{ svcprop(service="db", name="mydb", key="uri") }}; }
  server {
    listen {{port}};
    set $user "{{ svcprop(service="db", name="mydb", key="creds", subkey="user") }}";
    set $dbport {{ svcprop(service="db", name="mydb", key="creds", subkey="port") }};
  }
}"#;

    let rendered = renderer().render(template, SERVICES).unwrap();
    assert_eq!(
        rendered,
        r#"load_module /home/vcap/deps/0/nginx/nginx/modules/ngx_http_geoip_module.so;
events {}
http {
  upstream db { server postgres://u:p@db:5432/app; }
  server {
    listen 8080;
    set $user "app";
    set $dbport 5432;
  }
}"#
    );
}

#[test]
fn test_rendering_is_deterministic() {
    let template = r#"listen {{port}}; {{ svcprop(service="db", name="mydb", key="uri") }}"#;
    let first = renderer().render(template, SERVICES).unwrap();
    for _ in 0..5 {
        assert_eq!(renderer().render(template, SERVICES).unwrap(), first);
    }
}

#[test]
fn test_unsupported_shapes_fail() {
    for key in ["tags", "host"] {
        let template = format!(r#"{{{{ svcprop(service="cache", name="redis", key="{key}") }}}}"#);
        let err = renderer().render(&template, SERVICES).unwrap_err();
        assert!(matches!(err, TemplateError::Exec { .. }), "{key}: {err:?}");
    }
}

#[test]
fn test_missing_binding_is_never_empty() {
    let err = renderer()
        .render(r#"x{{ svcprop(service="db", name="other", key="uri") }}x"#, SERVICES)
        .unwrap_err();
    assert!(err.message().contains("No 'db' service named 'other' is bound"));
}
