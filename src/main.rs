//! nginx buildpack command-line entry point.

use clap::Parser;
use nginx_buildpack::cli::Cli;
use nginx_buildpack::core::user_friendly_error;

fn main() {
    let cli = Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    if let Err(e) = cli.execute() {
        user_friendly_error(e).display();
        std::process::exit(1);
    }
}
