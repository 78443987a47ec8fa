//! nginx buildpack - staging support for nginx applications
//!
//! Prepares an nginx runtime for an application during staging: picks a
//! concrete nginx version from the buildpack manifest, installs it, and checks
//! the application's `nginx.conf` template before the application is allowed
//! to start.
//!
//! # Architecture Overview
//!
//! ```text
//! buildpack.yml ─┐
//! manifest.yml ──┴─> VersionResolver ─> Installer ─> ConfigValidator ─> profile.d
//!                                                         │
//!                                                  TemplateRenderer ─> nginx -t
//! ```
//!
//! The three pieces with real logic are independent of the platform:
//!
//! - [`version`] - alias substitution and constraint matching over the
//!   manifest's version lines
//! - [`templating`] - Tera-based rendering with `port`, `env`, `module` and
//!   `svcprop`, reading platform values through an explicit environment
//! - [`validation`] - existence, port placeholder and `nginx -t` checks on a
//!   scratch copy of the build directory
//!
//! Everything else is a thin collaborator behind a trait so it can be faked:
//!
//! - [`stager`] - the staging directory layout
//! - [`manifest`] - `manifest.yml`
//! - [`installer`] - placing a dependency into the staging area
//! - [`command`] - running external executables
//!
//! [`supply`] drives the whole run, and [`cli`] exposes it together with the
//! standalone `varify` renderer.
//!
//! # Template Example
//!
//! ```text
//! {{ module(name="ngx_stream_module") }}
//! events {}
//! http {
//!   server {
//!     listen {{port}};
//!     location /db { return 200 "{{ svcprop(service="postgres", name="mydb", key="uri") }}"; }
//!   }
//! }
//! ```

pub mod cli;
pub mod command;
pub mod config;
pub mod constants;
pub mod core;
pub mod installer;
pub mod manifest;
pub mod models;
pub mod stager;
pub mod supply;
pub mod templating;
pub mod utils;
pub mod validation;
pub mod version;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
