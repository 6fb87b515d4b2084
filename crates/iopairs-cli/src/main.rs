//! iopairs - Generate input/output training pairs from documents with an LLM.

use clap::Parser;
use iopairs_cli::{Cli, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Credentials may live in a local .env file
    dotenvy::dotenv().ok();

    // Initialize tracing (log to stderr, stdout carries the banner and summary)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let formatter = Formatter::new(cli.format, !cli.no_color);

    if let Err(e) = iopairs_cli::run(cli).await {
        eprintln!("{}", formatter.error(&format!("Error: {}", e)));
        std::process::exit(1);
    }
}
