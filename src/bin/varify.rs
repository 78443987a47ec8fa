//! `varify`: render an nginx configuration template in place.
//!
//! Run once during staging on a scratch copy, and once at launch on the real
//! file. Reads `PORT`, `NGINX_MODULES`, `VCAP_SERVICES` and any variable the
//! template asks for from the process environment.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use nginx_buildpack::cli::{init_logging, render_file};
use nginx_buildpack::core::user_friendly_error;
use nginx_buildpack::templating::ProcessEnvironment;

/// Render an nginx configuration template in place.
#[derive(Parser, Debug)]
#[command(name = "varify", version)]
struct Args {
    /// Template to render and overwrite
    path: PathBuf,
}

fn main() {
    let args = Args::parse();
    init_logging(None);

    if let Err(e) = render_file(&args.path, &args.path, Arc::new(ProcessEnvironment)) {
        user_friendly_error(e).display();
        std::process::exit(1);
    }
}
