//! envv - team secrets sync with client-side encryption.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use envv::cli::output;
use envv::cli::{execute, Cli};
use envv::core::constants;

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env(constants::env::LOG).unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("envv=debug")
        } else {
            EnvFilter::new("envv=warn")
        }
    });

    let json = std::env::var(constants::env::LOG_FORMAT).is_ok_and(|v| v == "json");

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| {
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr)
        }))
        .init();

    if let Err(e) = execute(cli.command) {
        output::error(&e.to_string());
        if let Some(hint) = e.hint() {
            output::hint(&hint);
        }
        std::process::exit(1);
    }
}
