//! Rendering of nginx configuration templates.

use std::sync::Arc;

use tera::{Context as TeraContext, Tera};

use super::environment::Environment;
use super::error::{TEMPLATE_NAME, TemplateError};
use super::functions;
use super::services::ServiceBindingCatalog;
use crate::constants::{PORT_ENV, SERVICES_ENV};

/// Renders configuration templates against an [`Environment`].
///
/// Each call builds a fresh Tera instance, so nothing leaks between renders:
/// the service-binding blob is decoded once per call and never cached.
///
/// Rendering is all-or-nothing. A malformed template fails with
/// [`TemplateError::Parse`] before any directive runs; a failing directive
/// aborts the whole render with [`TemplateError::Exec`].
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use nginx_buildpack::templating::{MapEnvironment, TemplateRenderer};
///
/// let env = MapEnvironment::new().with("PORT", "8080");
/// let renderer = TemplateRenderer::new(Arc::new(env));
///
/// let rendered = renderer.render("listen {{port}};", "").unwrap();
/// assert_eq!(rendered, "listen 8080;");
/// ```
#[derive(Clone)]
pub struct TemplateRenderer {
    environment: Arc<dyn Environment>,
}

impl TemplateRenderer {
    /// Create a renderer reading platform values from `environment`.
    #[must_use]
    pub fn new(environment: Arc<dyn Environment>) -> Self {
        Self {
            environment,
        }
    }

    /// Render `template` with service bindings taken from `services_json`.
    ///
    /// A blank `services_json` is an empty catalog. Malformed JSON only
    /// matters to templates that call `svcprop`.
    ///
    /// # Errors
    ///
    /// - [`TemplateError::Parse`] when the directive syntax is malformed
    /// - [`TemplateError::Exec`] when a directive fails, including every
    ///   unsatisfied `svcprop` lookup and any undefined variable
    pub fn render(&self, template: &str, services_json: &str) -> Result<String, TemplateError> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        tera.add_raw_template(TEMPLATE_NAME, template).map_err(|e| TemplateError::parse(&e))?;

        let catalog = Arc::new(ServiceBindingCatalog::parse(services_json));
        if let Err(e) = catalog.as_ref() {
            tracing::debug!("Service bindings unusable for this render: {e}");
        }
        functions::register(&mut tera, &self.environment, catalog);

        let mut context = TeraContext::new();
        context.insert("port", &self.environment.get(PORT_ENV).unwrap_or_default());

        let rendered =
            tera.render(TEMPLATE_NAME, &context).map_err(|e| TemplateError::exec(&e))?;
        tracing::debug!("Rendered {} bytes of configuration", rendered.len());
        Ok(rendered)
    }

    /// Render with service bindings read from `VCAP_SERVICES` in this
    /// renderer's environment.
    ///
    /// # Errors
    ///
    /// Same as [`render`](Self::render).
    pub fn render_from_environment(&self, template: &str) -> Result<String, TemplateError> {
        let services = self.environment.get(SERVICES_ENV).unwrap_or_default();
        self.render(template, &services)
    }
}

impl std::fmt::Debug for TemplateRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateRenderer").finish_non_exhaustive()
    }
}
