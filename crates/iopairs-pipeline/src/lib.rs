//! iopairs Pipeline
//!
//! Turns a corpus of text documents into input/output training pairs by
//! calling a chat-completion endpoint once per chunk of text.
//!
//! # Architecture
//!
//! ```text
//! config.yaml → Config → documents → corpus → chunks
//!     → prompts → LlmProvider → extractor → Exporter → output/<secs>.jsonl
//! ```
//!
//! # Key Features
//!
//! - **Declarative jobs**: targets and processes loaded from YAML
//! - **Word-preserving chunking**: chunk boundaries never split a token
//! - **Prompt templates**: `{{ .Document }}` bound to each chunk
//! - **Structured output**: the `json_schema` tool contract, or fenced
//!   ```` ```json ```` blocks, validated against the process schema
//! - **Debug dumps**: a raw payload that could not be used is written to
//!   `<secs>_debug.json` before the error is returned
//!
//! # Example Usage
//!
//! ```no_run
//! use iopairs_llm::OpenAiProvider;
//! use iopairs_pipeline::{Config, Pipeline};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::from_file("config.yaml")?;
//! let pipeline = Pipeline::new(OpenAiProvider::new());
//!
//! let summary = pipeline.run(&config).await?;
//! println!("Generated {} pairs", summary.pairs_generated);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod chunking;
mod config;
mod corpus;
mod error;
mod export;
mod fs;
mod parser;
mod pipeline;
mod prompt;
mod types;


pub use chunking::chunk;
pub use config::{Config, ConfigError, DEFAULT_CONFIG_PATH};
pub use corpus::{collect_corpus, document_paths};
pub use error::{PipelineError, Result};
pub use export::{Clock, Exporter};
pub use fs::{ensure_dir, expand_files};
pub use parser::{extract_structured, fenced_blocks, SchemaValidator};
pub use pipeline::Pipeline;
pub use prompt::{render, PromptContext, Template};
pub use types::RunSummary;
