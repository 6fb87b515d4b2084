//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::{Completion, CompletionRequest, Target};
use std::future::Future;

/// Trait for chat-completion providers
///
/// Implemented by the infrastructure layer (iopairs-llm). Implementations must
/// not keep per-target state between calls: everything needed to reach the
/// endpoint is taken from `target` on every call.
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Send one chat-completion request to `target`
    fn complete(
        &self,
        target: &Target,
        request: &CompletionRequest,
    ) -> impl Future<Output = Result<Completion, Self::Error>> + Send;
}
