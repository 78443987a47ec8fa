//! Core error types shared by the staging driver and the command-line tools.

pub mod error;

pub use error::{ErrorContext, StagingError, user_friendly_error};
