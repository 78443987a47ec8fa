//! Global constants used throughout the buildpack.
//!
//! File names, environment variable names and alias names shared by the
//! resolver, the renderer and the validator live here so the staging driver and
//! the standalone `varify` tool agree on them.

/// Name of the server dependency in the buildpack manifest.
pub const NGINX_DEPENDENCY: &str = "nginx";

/// Configuration template expected at the root of the application.
pub const NGINX_CONF: &str = "nginx.conf";

/// Optional user configuration file at the root of the application.
pub const BUILDPACK_YML: &str = "buildpack.yml";

/// Buildpack manifest at the root of the buildpack.
pub const MANIFEST_YML: &str = "manifest.yml";

/// Alias used when the user does not request a version.
pub const MAINLINE_ALIAS: &str = "mainline";

/// Alias whose versions trigger the advisory warning.
pub const STABLE_ALIAS: &str = "stable";

/// Environment variable holding the port the server must listen on.
pub const PORT_ENV: &str = "PORT";

/// Environment variable holding the directory of dynamic nginx modules.
pub const MODULES_ENV: &str = "NGINX_MODULES";

/// Environment variable holding the JSON service-binding catalog.
pub const SERVICES_ENV: &str = "VCAP_SERVICES";

/// Port used when rendering the trial configuration during validation.
pub const TRIAL_PORT: &str = "8080";

/// Placeholder that every configuration template must reference.
pub const PORT_PLACEHOLDER: &str = "{{port}}";

/// Name of the standalone rendering tool.
pub const VARIFY_BINARY: &str = "varify";

/// Logs directory created under the build directory during setup.
pub const LOGS_DIR: &str = "logs";

/// Advisory logged when the resolved version belongs to the stable line.
pub const STABLE_LINE_WARNING: &str =
    r#"Warning: usage of "stable" versions of NGINX is discouraged in most cases by the NGINX team."#;
