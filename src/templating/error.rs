//! Template error types.

use thiserror::Error;

/// Name the renderer registers the configuration template under.
pub(crate) const TEMPLATE_NAME: &str = "nginx.conf";

/// Failure to turn a configuration template into text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// Malformed directive syntax; nothing was evaluated.
    #[error("Template syntax error: {message}")]
    Parse {
        /// Cleaned-up description from the template engine.
        message: String,
    },

    /// A directive failed while rendering, e.g. a missing service property.
    #[error("Template rendering failed: {message}")]
    Exec {
        /// Cleaned-up description, innermost cause last.
        message: String,
    },
}

impl TemplateError {
    pub(crate) fn parse(error: &tera::Error) -> Self {
        Self::Parse {
            message: format_tera_error(error),
        }
    }

    pub(crate) fn exec(error: &tera::Error) -> Self {
        Self::Exec {
            message: format_tera_error(error),
        }
    }

    /// The engine's description without the variant prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Parse {
                message,
            }
            | Self::Exec {
                message,
            } => message,
        }
    }
}

/// Flatten a Tera error chain into one readable message.
///
/// Tera wraps the useful detail (a parse position or the message returned by
/// a function) in generic "Failed to render" layers; those layers are dropped
/// and the rest joined with arrows.
pub(crate) fn format_tera_error(error: &tera::Error) -> String {
    use std::error::Error;

    let mut all_messages = vec![error.to_string()];
    let mut current: Option<&dyn Error> = error.source();
    while let Some(err) = current {
        all_messages.push(err.to_string());
        current = err.source();
    }

    let quoted = format!("'{TEMPLATE_NAME}'");
    let messages: Vec<String> = all_messages
        .iter()
        .map(|msg| {
            msg.replace(&format!("Failed to render {quoted}"), "")
                .replace(&format!("Failed to parse {quoted}"), "")
                .replace(&format!("while rendering {quoted}"), "")
                .replace(&quoted, "template")
                .trim()
                .to_string()
        })
        .filter(|msg| !msg.is_empty())
        .collect();

    if messages.is_empty() {
        "unknown template error".to_string()
    } else {
        messages.join("\n  → ")
    }
}
