//! CLI argument parsing.

use clap::Parser;
use iopairs_pipeline::DEFAULT_CONFIG_PATH;
use std::path::PathBuf;

/// iopairs - Generate input/output training pairs from documents with an LLM.
#[derive(Debug, Parser)]
#[command(name = "iopairs")]
#[command(about, long_about = None, disable_version_flag = true)]
pub struct Cli {
    /// Path to the config file
    #[arg(short, long, env = "IOPAIRS_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Print the version and exit
    #[arg(long)]
    pub version: bool,

    /// Run summary format
    #[arg(short, long, value_enum, default_value_t = CliFormat::Text)]
    pub format: CliFormat,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

/// Run summary formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Human-readable lines (default)
    Text,
    /// JSON object
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["iopairs"]).unwrap();
        // IOPAIRS_CONFIG may be set in a developer shell
        if std::env::var_os("IOPAIRS_CONFIG").is_none() {
            assert_eq!(cli.config, PathBuf::from("config.yaml"));
        }
        assert!(!cli.version);
        assert_eq!(cli.format, CliFormat::Text);
        assert!(!cli.no_color);
    }

    #[test]
    fn test_config_and_version_flags() {
        let cli = Cli::try_parse_from(["iopairs", "--config", "jobs/qa.yaml", "--version"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("jobs/qa.yaml"));
        assert!(cli.version);
    }

    #[test]
    fn test_json_format() {
        let cli = Cli::try_parse_from(["iopairs", "-f", "json", "--no-color"]).unwrap();
        assert_eq!(cli.format, CliFormat::Json);
        assert!(cli.no_color);
    }

    #[test]
    fn test_unknown_flag_rejected() {
        assert!(Cli::try_parse_from(["iopairs", "--profile", "x"]).is_err());
    }
}
