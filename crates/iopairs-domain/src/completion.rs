//! Provider-agnostic chat-completion request and reply

use serde_json::Value;

/// Name of the function tool carrying the output schema
pub const STRUCTURED_OUTPUT_TOOL: &str = "json_schema";

/// A two-turn chat-completion request
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Model identifier
    pub model: String,

    /// Rendered system prompt
    pub system_prompt: String,

    /// Rendered user prompt
    pub user_prompt: String,

    /// Generation limit; `None` leaves it to the service
    pub max_tokens: Option<u32>,

    /// Sampling temperature; `None` leaves it to the service
    pub temperature: Option<f32>,

    /// Schema attached as the [`STRUCTURED_OUTPUT_TOOL`] function, if any
    pub tool_schema: Option<Value>,
}

impl CompletionRequest {
    /// Create a request without limits or tools
    pub fn new(
        model: impl Into<String>,
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
            max_tokens: None,
            temperature: None,
            tool_schema: None,
        }
    }

    /// Set the generation limit; zero means unset
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = (max_tokens != 0).then_some(max_tokens);
        self
    }

    /// Set the temperature; zero means unset
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = (temperature != 0.0).then_some(temperature);
        self
    }

    /// Attach the structured-output tool
    pub fn with_tool_schema(mut self, schema: Value) -> Self {
        self.tool_schema = Some(schema);
        self
    }

    /// Whether the structured-output tool is attached
    pub fn is_hinted(&self) -> bool {
        self.tool_schema.is_some()
    }
}

/// A tool invocation returned by the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCall {
    /// Function name
    pub name: String,

    /// Raw JSON argument string
    pub arguments: String,
}

/// One reply alternative
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Choice {
    /// Message text, if any
    pub content: Option<String>,

    /// Tool invocations, if any
    pub tool_calls: Vec<ToolCall>,
}

impl Choice {
    /// A choice carrying plain text
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            tool_calls: Vec::new(),
        }
    }

    /// A choice carrying one tool call
    pub fn tool_call(name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            content: None,
            tool_calls: vec![ToolCall {
                name: name.into(),
                arguments: arguments.into(),
            }],
        }
    }
}

/// A chat-completion reply
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completion {
    /// Reply alternatives in service order
    pub choices: Vec<Choice>,
}

impl Completion {
    /// Concatenated arguments of every tool call named `name`, across all choices
    pub fn tool_arguments(&self, name: &str) -> String {
        self.choices
            .iter()
            .flat_map(|choice| choice.tool_calls.iter())
            .filter(|call| call.name == name)
            .map(|call| call.arguments.as_str())
            .collect()
    }

    /// Concatenated message content across all choices
    pub fn content(&self) -> String {
        self.choices
            .iter()
            .filter_map(|choice| choice.content.as_deref())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_zero_limits_are_unset() {
        let request = CompletionRequest::new("m", "s", "u")
            .with_max_tokens(0)
            .with_temperature(0.0);
        assert_eq!(request.max_tokens, None);
        assert_eq!(request.temperature, None);

        let request = request.with_max_tokens(100).with_temperature(0.5);
        assert_eq!(request.max_tokens, Some(100));
        assert_eq!(request.temperature, Some(0.5));
    }

    #[test]
    fn test_hinted() {
        let request = CompletionRequest::new("m", "s", "u");
        assert!(!request.is_hinted());
        assert!(request.with_tool_schema(json!({})).is_hinted());
    }

    #[test]
    fn test_tool_arguments_concatenate_across_choices() {
        let completion = Completion {
            choices: vec![
                Choice::tool_call(STRUCTURED_OUTPUT_TOOL, r#"{"conversations":"#),
                Choice::tool_call("other", "ignored"),
                Choice::tool_call(STRUCTURED_OUTPUT_TOOL, "[]}"),
            ],
        };

        assert_eq!(
            completion.tool_arguments(STRUCTURED_OUTPUT_TOOL),
            r#"{"conversations":[]}"#
        );
    }

    #[test]
    fn test_content_concatenates_across_choices() {
        let completion = Completion {
            choices: vec![Choice::text("Hello, "), Choice::default(), Choice::text("world")],
        };
        assert_eq!(completion.content(), "Hello, world");
    }
}
