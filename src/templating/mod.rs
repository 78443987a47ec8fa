//! Configuration templating for nginx.
//!
//! User configuration files are Tera templates. Platform values reach them
//! through four functions ([`functions`]) and the `port` variable:
//!
//! ```text
//! {{ module(name="ngx_stream_module") }}
//! http {
//!   server {
//!     listen {{port}};
//!     set $db "{{ svcprop(service="postgres", name="mydb", key="uri") }}";
//!   }
//! }
//! ```
//!
//! Everything the functions read comes from an explicit [`Environment`]
//! handed to the [`TemplateRenderer`]; nothing reads process state directly.

pub mod environment;
pub mod error;
pub mod functions;
pub mod renderer;
pub mod services;


pub use environment::{Environment, MapEnvironment, OverlayEnvironment, ProcessEnvironment};
pub use error::TemplateError;
pub use renderer::TemplateRenderer;
pub use services::{PropertyValue, ServiceBinding, ServiceBindingCatalog, ServiceLookupError};
