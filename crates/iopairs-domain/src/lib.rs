//! iopairs Domain Layer
//!
//! This crate contains the core vocabulary of the iopairs pipeline. It defines
//! the job descriptions read from configuration, the shape of a chat-completion
//! exchange, and the trait interface that LLM providers implement.
//!
//! ## Key Concepts
//!
//! - **Target**: A named chat-completion endpoint plus the environment variable
//!   holding its credential
//! - **Process**: One declarative generation job producing one set of outputs
//! - **Completion**: A provider-agnostic view of a chat-completion request and reply
//! - **ResponseEnvelope**: What the model returned verbatim, and what parsed
//! - **Conversation**: The natural `{input, output}` training pair
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture:
//! - No I/O and no network calls
//! - Provider implementations live in `iopairs-llm`
//! - Orchestration lives in `iopairs-pipeline`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod completion;
pub mod conversation;
pub mod envelope;
pub mod job;
pub mod traits;

// Re-exports for convenience
pub use completion::{
    Choice, Completion, CompletionRequest, ToolCall, STRUCTURED_OUTPUT_TOOL,
};
pub use conversation::{Conversation, ConversationsResponse};
pub use envelope::ResponseEnvelope;
pub use job::{Process, Target};
pub use traits::LlmProvider;
