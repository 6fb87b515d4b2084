//! iopairs CLI library.
//!
//! Loads a job configuration, runs every process against its OpenAI-compatible
//! target and reports what was written.

pub mod cli;
pub mod error;
pub mod output;

pub use cli::{Cli, CliFormat};
pub use error::{CliError, Result};
pub use output::Formatter;

use iopairs_llm::OpenAiProvider;
use iopairs_pipeline::{Config, Pipeline};
use tracing::info;

/// Execute one invocation of the command line.
pub async fn run(cli: Cli) -> Result<()> {
    let formatter = Formatter::new(cli.format, !cli.no_color);
    println!("{}", formatter.banner());

    if cli.version {
        println!("{}", formatter.version());
        return Ok(());
    }

    let config = Config::from_file(&cli.config)?;
    info!(
        "Loaded {} processes from {}",
        config.processes.len(),
        cli.config.display()
    );

    let summary = Pipeline::new(OpenAiProvider::new()).run(&config).await?;
    println!("{}", formatter.summary(&summary)?);

    Ok(())
}
