use std::io;

use anyhow::Result;
use chat_history_viewer::cli::{Cli, run};
use clap::Parser;
use is_terminal::IsTerminal;
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    run(cli)
}

/// Log to stderr so transcripts on stdout stay clean; `RUST_LOG` overrides `-v`
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
