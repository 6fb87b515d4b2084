//! Output formatting for the CLI.

use crate::cli::CliFormat;
use crate::error::Result;
use colored::*;
use iopairs_pipeline::RunSummary;

const LOGO: &str = r"
  _                    _
 (_) ___  _ __   __ _ (_)_ __ ___
 | |/ _ \| '_ \ / _` || | '__/ __|
 | | (_) | |_) | (_| || | |  \__ \
 |_|\___/| .__/ \__,_||_|_|  |___/
         |_|
";

/// Output formatter.
pub struct Formatter {
    format: CliFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: CliFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Startup banner.
    pub fn banner(&self) -> String {
        self.colorize(LOGO, "blue")
    }

    /// Version line printed by `--version`.
    pub fn version(&self) -> String {
        format!("\n\tVersion: {}", env!("CARGO_PKG_VERSION"))
    }

    /// Format the result of a run.
    pub fn summary(&self, summary: &RunSummary) -> Result<String> {
        match self.format {
            CliFormat::Json => Ok(serde_json::to_string_pretty(summary)?),
            CliFormat::Text => Ok(self.summary_text(summary)),
        }
    }

    fn summary_text(&self, summary: &RunSummary) -> String {
        let mut lines = vec![self.success("All processes completed")];
        lines.push(format!(
            "  processes: {} run, {} skipped",
            summary.processes_run, summary.processes_skipped
        ));
        lines.push(format!(
            "  chunks:    {} processed, {} without output",
            summary.chunks_processed, summary.misses
        ));
        lines.push(format!("  pairs:     {}", summary.pairs_generated));
        for path in &summary.artifacts {
            lines.push(format!("  wrote {}", path.display()));
        }
        if summary.misses > 0 {
            lines.push(self.warning(&format!(
                "{} chunk(s) returned no structured output",
                summary.misses
            )));
            lines.push(
                "  tool-hinted processes discard prose replies; set skip_json_schema to save them as debug files"
                    .to_string(),
            );
        }
        lines.join("\n")
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sample() -> RunSummary {
        RunSummary {
            processes_run: 1,
            processes_skipped: 1,
            chunks_processed: 3,
            misses: 1,
            pairs_generated: 12,
            artifacts: vec![PathBuf::from("output/1700000000.jsonl")],
        }
    }

    #[test]
    fn test_text_summary() {
        let formatter = Formatter::new(CliFormat::Text, false);
        let output = formatter.summary(&sample()).unwrap();
        assert!(output.starts_with("✓ All processes completed"));
        assert!(output.contains("pairs:     12"));
        assert!(output.contains("wrote output/1700000000.jsonl"));
        assert!(output.contains("⚠ 1 chunk(s) returned no structured output"));
        assert!(output.contains("set skip_json_schema to save them as debug files"));
    }

    #[test]
    fn test_no_miss_hint_without_misses() {
        let formatter = Formatter::new(CliFormat::Text, false);
        let summary = RunSummary {
            misses: 0,
            ..sample()
        };
        let output = formatter.summary(&summary).unwrap();
        assert!(!output.contains("skip_json_schema"));
    }

    #[test]
    fn test_json_summary() {
        let formatter = Formatter::new(CliFormat::Json, false);
        let output = formatter.summary(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["pairs_generated"], 12);
        assert_eq!(value["artifacts"][0], "output/1700000000.jsonl");
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(CliFormat::Text, false);
        assert_eq!(formatter.error("boom"), "✗ boom");
        assert_eq!(formatter.banner(), LOGO);
    }

    #[test]
    fn test_version_line() {
        let formatter = Formatter::new(CliFormat::Text, false);
        assert!(formatter.version().contains(env!("CARGO_PKG_VERSION")));
    }
}
