//! Error types for the pipeline

use crate::config::ConfigError;
use iopairs_llm::LlmError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while running the pipeline
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Configuration could not be loaded or validated
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A document pattern matched no files
    #[error("No files found for: {pattern}")]
    NoMatchingDocuments {
        /// Pattern after joining with the base directory
        pattern: String,
    },

    /// A document pattern is not valid glob syntax
    #[error("Invalid document pattern {pattern}: {message}")]
    InvalidPattern {
        /// Offending pattern
        pattern: String,
        /// Glob diagnostics
        message: String,
    },

    /// Filesystem failure
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Path being read, written or created
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// A prompt template is malformed
    #[error("Template parse error in {name}: {message}")]
    TemplateParse {
        /// Template name
        name: String,
        /// Parser diagnostics
        message: String,
    },

    /// A prompt template references something the context does not provide
    #[error("Template execution error in {name}: {message}")]
    TemplateExec {
        /// Template name
        name: String,
        /// Execution diagnostics
        message: String,
    },

    /// Upstream call failed
    #[error("Upstream error: {0}")]
    Llm(#[from] LlmError),

    /// Model output did not parse or did not satisfy the schema
    #[error("Error parsing JSON {prompt}: {payload} ({diagnostics})")]
    InvalidStructuredOutput {
        /// Name of the process whose prompt produced the output
        prompt: String,
        /// Offending payload
        payload: String,
        /// Parser and validator diagnostics
        diagnostics: String,
    },

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PipelineError {
    /// Build an I/O error for `path`
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;
