//! Custom Tera functions available to nginx configuration templates.
//!
//! | Function | Example | Result |
//! |---|---|---|
//! | `port` | `{{ port() }}` | value of `PORT` |
//! | `env` | `{{ env(name="HOSTNAME") }}` | value of the variable, empty when unset |
//! | `module` | `{{ module(name="ngx_stream_module") }}` | `load_module $NGINX_MODULES/ngx_stream_module.so;` |
//! | `svcprop` | `{{ svcprop(service="db", name="mydb", key="uri") }}` | property of a bound service |
//!
//! `svcprop` accepts an optional `subkey` to read one level into a nested
//! property: `{{ svcprop(service="db", name="mydb", key="creds", subkey="user") }}`.
//! Its lookups never fall back to an empty string; see
//! [`ServiceBindingCatalog::property`].
//!
//! Every function rejects unknown argument names, so a typo such as `nmae=`
//! fails the render instead of silently producing an empty value.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tera::{Tera, Value};

use super::environment::Environment;
use super::services::{ServiceBindingCatalog, ServiceLookupError};
use crate::constants::{MODULES_ENV, PORT_ENV};

/// Catalog as decoded for one render; a decode failure is reported by the
/// first `svcprop` call that needs it.
pub type SharedCatalog = Arc<Result<ServiceBindingCatalog, ServiceLookupError>>;

/// Register `port`, `env`, `module` and `svcprop` on a Tera instance.
pub fn register(tera: &mut Tera, environment: &Arc<dyn Environment>, catalog: SharedCatalog) {
    tera.register_function("port", create_port_function(Arc::clone(environment)));
    tera.register_function("env", create_env_function(Arc::clone(environment)));
    tera.register_function("module", create_module_function(Arc::clone(environment)));
    tera.register_function("svcprop", create_svcprop_function(catalog));
}

/// `port()`: the platform-assigned listening port.
pub fn create_port_function(environment: Arc<dyn Environment>) -> impl tera::Function + 'static {
    move |args: &HashMap<String, Value>| -> tera::Result<Value> {
        check_arguments("port", args, &[])?;
        Ok(Value::String(environment.get(PORT_ENV).unwrap_or_default()))
    }
}

/// `env(name=...)`: any environment variable, empty when unset.
pub fn create_env_function(environment: Arc<dyn Environment>) -> impl tera::Function + 'static {
    move |args: &HashMap<String, Value>| -> tera::Result<Value> {
        check_arguments("env", args, &["name"])?;
        let name = required_string("env", args, "name")?;
        Ok(Value::String(environment.get(name).unwrap_or_default()))
    }
}

/// `module(name=...)`: a `load_module` directive for a dynamic module.
pub fn create_module_function(environment: Arc<dyn Environment>) -> impl tera::Function + 'static {
    move |args: &HashMap<String, Value>| -> tera::Result<Value> {
        check_arguments("module", args, &["name"])?;
        let name = required_string("module", args, "name")?;
        Ok(Value::String(load_module_directive(
            &environment.get(MODULES_ENV).unwrap_or_default(),
            name,
        )))
    }
}

/// `svcprop(service=..., name=..., key=..., subkey=...)`: a service-binding property.
pub fn create_svcprop_function(catalog: SharedCatalog) -> impl tera::Function + 'static {
    move |args: &HashMap<String, Value>| -> tera::Result<Value> {
        check_arguments("svcprop", args, &["service", "name", "key", "subkey"])?;
        let service = required_string("svcprop", args, "service")?;
        let name = required_string("svcprop", args, "name")?;
        let key = required_string("svcprop", args, "key")?;
        let subkey = optional_string("svcprop", args, "subkey")?;

        let catalog = catalog.as_ref().as_ref().map_err(|e| tera::Error::msg(e.to_string()))?;
        catalog
            .property(service, name, key, subkey)
            .map(Value::String)
            .map_err(|e| tera::Error::msg(e.to_string()))
    }
}

/// `load_module <modules_dir>/<name>.so;`
#[must_use]
pub fn load_module_directive(modules_dir: &str, name: &str) -> String {
    format!("load_module {}.so;", Path::new(modules_dir).join(name).display())
}

fn check_arguments(
    function: &str,
    args: &HashMap<String, Value>,
    allowed: &[&str],
) -> tera::Result<()> {
    let mut unknown: Vec<&str> =
        args.keys().map(String::as_str).filter(|key| !allowed.contains(key)).collect();
    if unknown.is_empty() {
        return Ok(());
    }
    unknown.sort_unstable();

    let accepted = if allowed.is_empty() {
        "no arguments".to_string()
    } else {
        allowed.iter().map(|a| format!("`{a}`")).collect::<Vec<_>>().join(", ")
    };
    Err(tera::Error::msg(format!(
        "Function `{function}` got unexpected argument(s) {}; it accepts {accepted}",
        unknown.iter().map(|u| format!("`{u}`")).collect::<Vec<_>>().join(", ")
    )))
}

fn required_string<'a>(
    function: &str,
    args: &'a HashMap<String, Value>,
    key: &str,
) -> tera::Result<&'a str> {
    optional_string(function, args, key)?.ok_or_else(|| {
        tera::Error::msg(format!("Function `{function}` requires a `{key}` argument"))
    })
}

fn optional_string<'a>(
    function: &str,
    args: &'a HashMap<String, Value>,
    key: &str,
) -> tera::Result<Option<&'a str>> {
    match args.get(key) {
        None => Ok(None),
        Some(Value::String(value)) => Ok(Some(value)),
        Some(other) => Err(tera::Error::msg(format!(
            "Function `{function}` expects `{key}` to be a string, got `{other}`"
        ))),
    }
}
