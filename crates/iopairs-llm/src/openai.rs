//! OpenAI-compatible Provider Implementation
//!
//! Speaks the `POST {api_url}/chat/completions` wire shape used by OpenAI and
//! by most hosted and self-hosted inference servers.
//!
//! # Features
//!
//! - Bearer authentication read from the target's environment variable
//! - Optional `json_schema` function tool for structured output
//! - A fresh HTTP client per call, so no endpoint state outlives a request
//!
//! # Examples
//!
//! ```no_run
//! use iopairs_domain::{CompletionRequest, LlmProvider, Target};
//! use iopairs_llm::OpenAiProvider;
//!
//! # async fn example() -> Result<(), iopairs_llm::LlmError> {
//! let target = Target {
//!     name: "openai".to_string(),
//!     api_url: "https://api.openai.com/v1".to_string(),
//!     api_key_env: "OPENAI_API_KEY".to_string(),
//! };
//! let request = CompletionRequest::new("gpt-4o-mini", "Be brief.", "Say hello.");
//! let completion = OpenAiProvider::new().complete(&target, &request).await?;
//! # Ok(())
//! # }
//! ```

use crate::LlmError;
use iopairs_domain::{
    Choice, Completion, CompletionRequest, LlmProvider, Target, ToolCall, STRUCTURED_OUTPUT_TOOL,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, trace};

/// Chat-completion provider for OpenAI-compatible endpoints
#[derive(Debug, Clone, Default)]
pub struct OpenAiProvider {
    api_key_override: Option<String>,
}

/// Request body for the chat-completions API
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<Tool<'a>>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct Tool<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    function: FunctionDefinition<'a>,
}

#[derive(Debug, Serialize)]
struct FunctionDefinition<'a> {
    name: &'static str,
    parameters: &'a Value,
}

/// Response from the chat-completions API
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ResponseChoice>,
}

#[derive(Debug, Deserialize)]
struct ResponseChoice {
    #[serde(default)]
    message: ResponseMessage,
}

#[derive(Debug, Default, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ResponseToolCall>>,
}

#[derive(Debug, Deserialize)]
struct ResponseToolCall {
    function: ResponseFunctionCall,
}

#[derive(Debug, Deserialize)]
struct ResponseFunctionCall {
    #[serde(default)]
    name: String,
    #[serde(default)]
    arguments: String,
}

impl OpenAiProvider {
    /// Create a provider that reads credentials from each target's environment variable
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a fixed API key instead of the target's environment variable
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key_override = Some(api_key.into());
        self
    }

    fn api_key(&self, target: &Target) -> Result<String, LlmError> {
        if let Some(key) = &self.api_key_override {
            return Ok(key.clone());
        }
        std::env::var(&target.api_key_env)
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| LlmError::MissingApiKey(target.api_key_env.clone()))
    }

    /// Endpoint URL for a target
    pub fn endpoint(target: &Target) -> String {
        format!("{}/chat/completions", target.api_url.trim_end_matches('/'))
    }
}

fn build_body(request: &CompletionRequest) -> ChatCompletionRequest<'_> {
    let tools = request.tool_schema.as_ref().map(|schema| {
        vec![Tool {
            kind: "function",
            function: FunctionDefinition {
                name: STRUCTURED_OUTPUT_TOOL,
                parameters: schema,
            },
        }]
    });

    ChatCompletionRequest {
        model: &request.model,
        messages: vec![
            ChatMessage {
                role: "system",
                content: &request.system_prompt,
            },
            ChatMessage {
                role: "user",
                content: &request.user_prompt,
            },
        ],
        max_tokens: request.max_tokens,
        temperature: request.temperature,
        tools,
    }
}

impl From<ChatCompletionResponse> for Completion {
    fn from(response: ChatCompletionResponse) -> Self {
        let choices = response
            .choices
            .into_iter()
            .map(|choice| Choice {
                content: choice.message.content,
                tool_calls: choice
                    .message
                    .tool_calls
                    .unwrap_or_default()
                    .into_iter()
                    .map(|call| ToolCall {
                        name: call.function.name,
                        arguments: call.function.arguments,
                    })
                    .collect(),
            })
            .collect();

        Completion { choices }
    }
}

impl LlmProvider for OpenAiProvider {
    type Error = LlmError;

    async fn complete(
        &self,
        target: &Target,
        request: &CompletionRequest,
    ) -> Result<Completion, Self::Error> {
        let api_key = self.api_key(target)?;
        let url = Self::endpoint(target);
        let body = build_body(request);

        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| LlmError::Communication(format!("Failed to build HTTP client: {}", e)))?;

        debug!("POST {} (model {})", url, request.model);
        trace!("Chat request: {:?}", body);

        let response = client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("HTTP error: {}", e);
                LlmError::Communication(format!("Request failed: {}", e))
            })?;

        let status = response.status();
        trace!("Chat response status: {}", status);

        let text = response
            .text()
            .await
            .map_err(|e| LlmError::Communication(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            error!("API error from {}: HTTP {}", target.name, status);
            return Err(LlmError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: ChatCompletionResponse =
            serde_json::from_str(&text).map_err(|e| LlmError::InvalidResponse {
                message: format!("Failed to parse response: {}", e),
                body: text.clone(),
            })?;

        Ok(parsed.into())
    }
}
