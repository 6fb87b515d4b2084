//! Job descriptions: targets and processes
//!
//! Both types are deserialized straight from the configuration file. Optional
//! numeric fields deserialize to zero when absent; [`Process::apply_defaults`]
//! replaces zero (and empty `output_dir`) with the documented defaults.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default `max_tokens` when a process does not set one
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Default `chunk_size` (in code points) when a process does not set one
pub const DEFAULT_CHUNK_SIZE: usize = 2048;

/// Default number of passes over the corpus
pub const DEFAULT_STEPS: usize = 1;

/// Default output directory, relative to the configuration file
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// A named chat-completion endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// Unique identifier referenced by processes
    #[serde(default)]
    pub name: String,

    /// Base URL of the chat-completion service (e.g., "https://api.openai.com/v1")
    #[serde(default)]
    pub api_url: String,

    /// Name of the environment variable holding the bearer credential
    #[serde(default)]
    pub api_key_env: String,
}

/// One generation job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Process {
    /// Process name, used in logs and error messages
    #[serde(default)]
    pub name: String,

    /// Model identifier passed to the target
    #[serde(default)]
    pub model: String,

    /// Name of the [`Target`] to call
    #[serde(default)]
    pub target: String,

    /// Sampling temperature; omitted from requests when zero
    #[serde(default)]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default)]
    pub max_tokens: u32,

    /// Chunk size in code points
    #[serde(default)]
    pub chunk_size: usize,

    /// Number of passes over the corpus
    #[serde(default)]
    pub steps: usize,

    /// Output directory, relative to the configuration file
    #[serde(default)]
    pub output_dir: String,

    /// Skip this process entirely
    #[serde(default)]
    pub skip: bool,

    /// Ordered list of glob patterns, relative to the configuration file
    #[serde(default)]
    pub documents: Vec<String>,

    /// System prompt template
    #[serde(default)]
    pub system_prompt: String,

    /// User prompt template
    #[serde(default)]
    pub user_prompt: String,

    /// Optional JSON Schema describing the structured output
    #[serde(default)]
    pub json_schema: Option<Value>,

    /// Keep the schema for validation but do not attach it as a tool
    #[serde(default)]
    pub skip_json_schema: bool,
}

impl Process {
    /// Replace unset values with their defaults
    pub fn apply_defaults(&mut self) {
        if self.max_tokens == 0 {
            self.max_tokens = DEFAULT_MAX_TOKENS;
        }
        if self.chunk_size == 0 {
            self.chunk_size = DEFAULT_CHUNK_SIZE;
        }
        if self.steps == 0 {
            self.steps = DEFAULT_STEPS;
        }
        if self.output_dir.is_empty() {
            self.output_dir = DEFAULT_OUTPUT_DIR.to_string();
        }
    }

    /// Whether requests for this process carry the structured-output tool
    pub fn uses_tool_schema(&self) -> bool {
        self.json_schema.is_some() && !self.skip_json_schema
    }

    /// Number of passes, never less than one
    pub fn effective_steps(&self) -> usize {
        self.steps.max(1)
    }
}
