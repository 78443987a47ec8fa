//! `render` command and the rendering step shared with `varify`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use clap::Args;

use crate::core::StagingError;
use crate::templating::{Environment, ProcessEnvironment, TemplateRenderer};
use crate::utils::fs::{atomic_write, read_text_file};

/// Render a configuration template with the current environment.
#[derive(Args, Debug)]
pub struct RenderCommand {
    /// Template to render
    pub path: PathBuf,

    /// Where to write the result [default: overwrite the template]
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl RenderCommand {
    pub fn execute(self) -> Result<()> {
        let output = self.output.as_deref().unwrap_or(self.path.as_path());
        render_file(&self.path, output, Arc::new(ProcessEnvironment))
    }
}

/// Render `source` and atomically write the result to `destination`.
///
/// Service bindings come from `VCAP_SERVICES` in `environment`. Nothing is
/// written unless rendering succeeds, and the write itself is all-or-nothing.
///
/// # Errors
///
/// Returns an error if the template cannot be read, rendered or written.
pub fn render_file(source: &Path, destination: &Path, environment: Arc<dyn Environment>) -> Result<()> {
    let template = read_text_file(source)?;
    let rendered = TemplateRenderer::new(environment)
        .render_from_environment(&template)
        .map_err(StagingError::from)?;
    atomic_write(destination, rendered.as_bytes())?;
    tracing::debug!("Rendered {} to {}", source.display(), destination.display());
    Ok(())
}
