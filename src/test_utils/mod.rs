//! Test utilities for the buildpack.
//!
//! In-memory stand-ins for the staging collaborators, so the supply steps and
//! the validator can be exercised without a platform or an nginx binary, plus
//! [`StagingFixture`], which lays out a buildpack, a build directory and a
//! dependencies directory in temporary directories.
//!
//! # Example
//!
//! ```rust,no_run
//! use nginx_buildpack::test_utils::{RecordingCommandRunner, StagingFixture};
//!
//! let fixture = StagingFixture::new().unwrap();
//! fixture.write_app_file("nginx.conf", "listen {{port}};").unwrap();
//! let runner = RecordingCommandRunner::succeeding();
//! // hand fixture.stager(), fixture.manifest() and &runner to a Supplier
//! ```

pub mod fakes;
pub mod fixture;

pub use fakes::{FakeManifest, RecordedCommand, RecordingCommandRunner, RecordingInstaller, RecordingStager};
pub use fixture::StagingFixture;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

static INIT_LOGGING: Once = Once::new();

/// Initialize tracing for tests.
///
/// With `Some(level)` that level is used; otherwise `RUST_LOG` decides, and
/// without it nothing is logged. Safe to call from every test.
///
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}
