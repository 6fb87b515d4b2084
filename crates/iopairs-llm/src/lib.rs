//! iopairs LLM Provider Layer
//!
//! Implementations of the `LlmProvider` trait from `iopairs-domain`.
//!
//! # Providers
//!
//! - `OpenAiProvider`: Any endpoint speaking the `/chat/completions` wire shape
//! - `MockProvider`: Deterministic mock for testing
//!
//! # Examples
//!
//! ```
//! use iopairs_domain::{Choice, CompletionRequest, LlmProvider, Target};
//! use iopairs_llm::{interpret_reply, MockProvider};
//!
//! # async fn example() -> Result<(), iopairs_llm::LlmError> {
//! let provider = MockProvider::with_text("Hello from LLM!");
//! let target = Target {
//!     name: "local".to_string(),
//!     api_url: "http://localhost:8000/v1".to_string(),
//!     api_key_env: "LOCAL_KEY".to_string(),
//! };
//! let request = CompletionRequest::new("model", "system", "user");
//!
//! let completion = provider.complete(&target, &request).await?;
//! assert_eq!(interpret_reply(&completion, false)?, "Hello from LLM!");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod openai;

use iopairs_domain::{
    Choice, Completion, CompletionRequest, LlmProvider, Target, STRUCTURED_OUTPUT_TOOL,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tracing::warn;

pub use openai::OpenAiProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or transport failure
    #[error("Communication error: {0}")]
    Communication(String),

    /// Endpoint answered with a non-success status
    #[error("API error (HTTP {status}): {body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body as received
        body: String,
    },

    /// Body could not be decoded as a chat-completion reply
    #[error("Invalid response: {message}")]
    InvalidResponse {
        /// Decoder diagnostics
        message: String,
        /// Response body as received
        body: String,
    },

    /// Reply contained zero choices
    #[error("API response contained no choices")]
    EmptyChoices,

    /// Credential environment variable is not set
    #[error("Missing API key: environment variable {0} is not set")]
    MissingApiKey(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

impl LlmError {
    /// Upstream body received before the failure, if any
    pub fn raw_payload(&self) -> Option<&str> {
        match self {
            LlmError::Api { body, .. } | LlmError::InvalidResponse { body, .. } => {
                Some(body.as_str()).filter(|body| !body.is_empty())
            }
            _ => None,
        }
    }
}

/// Reduce a reply to the raw text the pipeline works with
///
/// When the request carried the structured-output tool (`hinted`), the
/// arguments of every `json_schema` tool call are concatenated; an empty
/// result is returned as-is and means the model never called the tool.
/// Otherwise the message content of every choice is concatenated.
pub fn interpret_reply(completion: &Completion, hinted: bool) -> Result<String, LlmError> {
    if completion.choices.is_empty() {
        return Err(LlmError::EmptyChoices);
    }

    if hinted {
        let arguments = completion.tool_arguments(STRUCTURED_OUTPUT_TOOL);
        if arguments.is_empty() {
            warn!(
                "Reply did not call the `{}` function; its content is discarded",
                STRUCTURED_OUTPUT_TOOL
            );
        }
        Ok(arguments)
    } else {
        Ok(completion.content())
    }
}

/// Mock LLM provider for deterministic testing
///
/// This provider returns pre-configured replies without making any network calls.
/// Replies can be keyed by the rendered user prompt; every request is recorded.
///
/// # Examples
///
/// ```
/// use iopairs_llm::MockProvider;
///
/// let mut provider = MockProvider::with_text("Fixed response");
/// provider.add_text_response("special prompt", "Special response");
/// assert_eq!(provider.call_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_reply: Completion,
    replies: Arc<Mutex<HashMap<String, Option<Completion>>>>,
    requests: Arc<Mutex<Vec<(Target, CompletionRequest)>>>,
}

impl MockProvider {
    /// Create a new MockProvider returning `reply` for all prompts
    pub fn new(reply: Completion) -> Self {
        Self {
            default_reply: reply,
            replies: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a MockProvider replying with plain message content
    pub fn with_text(content: impl Into<String>) -> Self {
        Self::new(Completion {
            choices: vec![Choice::text(content)],
        })
    }

    /// Create a MockProvider replying with one `json_schema` tool call
    pub fn with_tool_call(arguments: impl Into<String>) -> Self {
        Self::new(Completion {
            choices: vec![Choice::tool_call(STRUCTURED_OUTPUT_TOOL, arguments)],
        })
    }

    /// Add a specific reply for a given user prompt
    pub fn add_response(&mut self, user_prompt: impl Into<String>, reply: Completion) {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(user_prompt.into(), Some(reply));
    }

    /// Add a plain-text reply for a given user prompt
    pub fn add_text_response(&mut self, user_prompt: impl Into<String>, content: impl Into<String>) {
        self.add_response(
            user_prompt,
            Completion {
                choices: vec![Choice::text(content)],
            },
        );
    }

    /// Configure to fail for a specific user prompt
    pub fn add_error(&mut self, user_prompt: impl Into<String>) {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(user_prompt.into(), None);
    }

    /// Get the number of times complete was called
    pub fn call_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Requests received so far, with the target they were sent to
    pub fn requests(&self) -> Vec<(Target, CompletionRequest)> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::with_text("Default mock response")
    }
}

impl LlmProvider for MockProvider {
    type Error = LlmError;

    async fn complete(
        &self,
        target: &Target,
        request: &CompletionRequest,
    ) -> Result<Completion, Self::Error> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((target.clone(), request.clone()));

        let replies = self.replies.lock().unwrap_or_else(PoisonError::into_inner);
        match replies.get(&request.user_prompt) {
            Some(Some(reply)) => Ok(reply.clone()),
            Some(None) => Err(LlmError::Other("Mock error".to_string())),
            None => Ok(self.default_reply.clone()),
        }
    }
}
