//! Structured-output extraction
//!
//! Model replies are expected to carry JSON, either as the whole payload
//! (tool-call arguments) or inside one or more ```` ```json ```` fenced
//! blocks surrounded by prose. Every candidate is validated against the
//! process schema before it is accepted.

use crate::error::{PipelineError, Result};
use jsonschema::JSONSchema;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Non-greedy match of a fenced JSON block, across lines
static FENCED_JSON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```json([\s\S]*?)```").expect("fence pattern is valid"));

/// Inner text of every fenced JSON block, backslashes removed
///
/// Models sometimes double-escape quotes inside fences; stripping every
/// backslash undoes that at the cost of legitimate escapes.
pub fn fenced_blocks(raw: &str) -> Vec<String> {
    FENCED_JSON
        .captures_iter(raw)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().replace('\\', ""))
        .collect()
}

/// A compiled JSON Schema
pub struct SchemaValidator {
    schema: JSONSchema,
}

impl SchemaValidator {
    /// Compile a schema value
    pub fn compile(schema: &Value) -> std::result::Result<Self, String> {
        let schema =
            JSONSchema::compile(schema).map_err(|e| format!("Failed to compile schema: {}", e))?;
        Ok(Self { schema })
    }

    /// Parse `text` as JSON and validate it, returning the decoded value
    pub fn parse(&self, text: &str) -> std::result::Result<Value, String> {
        let value: Value =
            serde_json::from_str(text.trim()).map_err(|e| format!("JSON parse error: {}", e))?;

        self.schema.validate(&value).map_err(|errors| {
            let errors: Vec<String> = errors.map(|err| err.to_string()).collect();
            format!("Schema validation failed: {}", errors.join("; "))
        })?;

        Ok(value)
    }
}

/// Extract schema-valid JSON values from a raw model reply
///
/// Fenced blocks are tried first and returned in order when all of them
/// validate. Otherwise the whole reply is parsed and, if valid, returned as
/// a single value.
pub fn extract_structured(raw: &str, schema: &Value, prompt_name: &str) -> Result<Vec<Value>> {
    let invalid = |diagnostics: String| PipelineError::InvalidStructuredOutput {
        prompt: prompt_name.to_string(),
        payload: raw.to_string(),
        diagnostics,
    };

    let validator = SchemaValidator::compile(schema).map_err(invalid)?;
    let mut diagnostics = Vec::new();

    let blocks = fenced_blocks(raw);
    if !blocks.is_empty() {
        debug!("Found {} fenced JSON blocks", blocks.len());

        let parsed: std::result::Result<Vec<Value>, String> = blocks
            .iter()
            .enumerate()
            .map(|(idx, block)| {
                validator
                    .parse(block)
                    .map_err(|e| format!("block {}: {}", idx + 1, e))
            })
            .collect();

        match parsed {
            Ok(values) => return Ok(values),
            Err(e) => {
                warn!("Fenced JSON rejected for {}, trying whole response: {}", prompt_name, e);
                diagnostics.push(e);
            }
        }
    }

    match validator.parse(raw) {
        Ok(value) => Ok(vec![value]),
        Err(e) => {
            diagnostics.push(e);
            Err(invalid(diagnostics.join("; ")))
        }
    }
}
