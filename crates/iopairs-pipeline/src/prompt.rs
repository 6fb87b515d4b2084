//! Prompt templates
//!
//! Templates are literal text interleaved with actions such as
//! `{{ .Document }}`. The only field a prompt can reference is `Document`,
//! bound to the chunk being processed. `{{- ` and ` -}}` trim the whitespace
//! on that side of the action, and `{{/* ... */}}` is a comment.
//!
//! A bare `{{ . }}` names no field and fails when the template is executed.

use crate::error::{PipelineError, Result};

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Values available to a template
#[derive(Debug, Clone, Copy)]
pub struct PromptContext<'a> {
    /// Current chunk text
    pub document: &'a str,
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Text(String),
    Field(String),
}

/// A parsed template
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    nodes: Vec<Node>,
}

impl Template {
    /// Parse `source` into a template called `name`
    pub fn parse(name: &str, source: &str) -> Result<Self> {
        let mut nodes = Vec::new();
        let mut rest = source;
        let mut trim_next = false;

        while let Some(open) = rest.find(OPEN) {
            let mut text = &rest[..open];
            if trim_next {
                text = text.trim_start();
            }

            let after_open = &rest[open + OPEN.len()..];

            if let Some((trim_left, trim_right, remainder)) = parse_comment(name, after_open)? {
                if trim_left {
                    text = text.trim_end();
                }
                if !text.is_empty() {
                    nodes.push(Node::Text(text.to_string()));
                }
                trim_next = trim_right;
                rest = remainder;
                continue;
            }

            let close = after_open.find(CLOSE).ok_or_else(|| parse_error(name, "unclosed action"))?;
            let mut action = &after_open[..close];

            if let Some(stripped) = strip_left_marker(action) {
                text = text.trim_end();
                action = stripped;
            }
            trim_next = false;
            if let Some(stripped) = strip_right_marker(action) {
                trim_next = true;
                action = stripped;
            }

            if !text.is_empty() {
                nodes.push(Node::Text(text.to_string()));
            }
            nodes.push(Node::Field(parse_field(name, action.trim())?));

            rest = &after_open[close + CLOSE.len()..];
        }

        let tail = if trim_next { rest.trim_start() } else { rest };
        if !tail.is_empty() {
            nodes.push(Node::Text(tail.to_string()));
        }

        Ok(Self {
            name: name.to_string(),
            nodes,
        })
    }

    /// Render the template against `context`
    pub fn execute(&self, context: &PromptContext<'_>) -> Result<String> {
        let mut out = String::new();
        for node in &self.nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Field(field) if field == "Document" => out.push_str(context.document),
                Node::Field(field) => {
                    return Err(PipelineError::TemplateExec {
                        name: self.name.clone(),
                        message: format!("can't evaluate field {}", field),
                    })
                }
            }
        }
        Ok(out)
    }
}

/// Parse and execute a template in one go
pub fn render(name: &str, source: &str, document: &str) -> Result<String> {
    Template::parse(name, source)?.execute(&PromptContext { document })
}

fn parse_error(name: &str, message: impl Into<String>) -> PipelineError {
    PipelineError::TemplateParse {
        name: name.to_string(),
        message: message.into(),
    }
}

/// `{{- ` needs whitespace after the dash
fn strip_left_marker(action: &str) -> Option<&str> {
    let stripped = action.strip_prefix('-')?;
    stripped
        .starts_with(|c: char| c.is_whitespace())
        .then_some(stripped)
}

/// ` -}}` needs whitespace before the dash
fn strip_right_marker(action: &str) -> Option<&str> {
    let stripped = action.strip_suffix('-')?;
    stripped
        .ends_with(|c: char| c.is_whitespace())
        .then_some(stripped)
}

/// `{{/* ... */}}` with optional trim markers
///
/// Returns whether each side trims, plus the source after the closing braces.
/// `None` means the action is not a comment.
fn parse_comment<'s>(name: &str, after_open: &'s str) -> Result<Option<(bool, bool, &'s str)>> {
    let (trim_left, inner) = match strip_left_marker(after_open) {
        Some(stripped) => (true, stripped.trim_start()),
        None => (false, after_open),
    };
    let Some(body) = inner.strip_prefix("/*") else {
        return Ok(None);
    };

    let end = body
        .find("*/")
        .ok_or_else(|| parse_error(name, "unclosed comment"))?;
    let tail = &body[end + 2..];

    if let Some(rest) = tail.strip_prefix(CLOSE) {
        return Ok(Some((trim_left, false, rest)));
    }
    let trimmed = tail
        .strip_prefix(|c: char| c.is_whitespace())
        .and_then(|t| t.strip_prefix('-'))
        .and_then(|t| t.strip_prefix(CLOSE));
    match trimmed {
        Some(rest) => Ok(Some((trim_left, true, rest))),
        None => Err(parse_error(name, "comment ends before closing delimiter")),
    }
}

fn parse_field(name: &str, action: &str) -> Result<String> {
    if action.is_empty() {
        return Err(parse_error(name, "missing value for command"));
    }

    let ident = action
        .strip_prefix('.')
        .ok_or_else(|| parse_error(name, format!("unexpected \"{}\" in command", action)))?;

    let mut chars = ident.chars();
    let valid = match chars.next() {
        // A bare "." is well formed but names no field
        None => true,
        Some(first) => {
            (first.is_alphabetic() || first == '_')
                && chars.all(|c| c.is_alphanumeric() || c == '_')
        }
    };

    if !valid {
        return Err(parse_error(name, format!("bad field reference \"{}\"", action)));
    }

    Ok(ident.to_string())
}
