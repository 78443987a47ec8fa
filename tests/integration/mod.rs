//! Integration test suite for the nginx buildpack
//!
//! End-to-end tests over the public library API and the two binaries.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **render**: template rendering against environments and service bindings
//! - **resolve**: version resolution from manifest files, library and CLI
//! - **supply**: full supply runs through the `nginx-buildpack` binary
//! - **validate**: configuration validation against a stand-in nginx
//! - **varify_cli**: the standalone `varify` renderer

mod render;
mod resolve;
mod supply;
mod validate;
mod varify_cli;

use std::path::Path;

/// Manifest used across the suite.
pub const MANIFEST: &str = r"---
language: nginx
version_lines:
  mainline: 1.25.x
  stable: 1.26.x
dependencies:
  - name: nginx
    version: 1.25.0
  - name: nginx
    version: 1.25.3
  - name: nginx
    version: 1.26.1
";

/// A minimal valid template.
pub const NGINX_CONF: &str = "\
worker_processes 1;
daemon off;
events { worker_connections 1024; }
http {
  server {
    listen {{port}};
    root public;
  }
}
";

/// Write an executable stand-in for nginx.
///
/// It implements just the configuration test: success when the rendered file
/// listens on the trial port, an `[emerg]` diagnostic on stderr otherwise.
#[cfg(unix)]
pub fn write_fake_nginx(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    let script = r#"#!/bin/sh
if [ "$1" != "-t" ]; then
  echo "nginx: only -t is supported" >&2
  exit 2
fi
conf="$3"
if grep -q "listen 8080;" "$conf"; then
  echo "nginx: the configuration file $conf syntax is ok" >&2
  exit 0
fi
echo "nginx: [emerg] no \"listen 8080\" directive in $conf" >&2
exit 1
"#;
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, script).unwrap();
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
}
