//! Skawsh Coupons CLI

use std::{io, process};

use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

mod cli;

#[tokio::main]
pub async fn main() {
    let cli = Cli::load().unwrap_or_else(|error| error.exit());

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_writer(io::stderr)
        .init();

    let stdout = io::stdout();

    if let Err(error) = cli.run(&mut stdout.lock()).await {
        #[expect(
            clippy::print_stderr,
            reason = "errors are reported to the operator, not logged"
        )]
        {
            eprintln!("{error}");
        }

        process::exit(1);
    }
}
