//! Core Pipeline implementation

use crate::chunking::chunk;
use crate::config::{Config, ConfigError};
use crate::corpus::collect_corpus;
use crate::error::{PipelineError, Result};
use crate::export::{Clock, Exporter};
use crate::parser::extract_structured;
use crate::prompt::{PromptContext, Template};
use crate::types::RunSummary;
use iopairs_domain::{
    CompletionRequest, ConversationsResponse, LlmProvider, Process, ResponseEnvelope, Target,
};
use iopairs_llm::{interpret_reply, LlmError};
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// A failed model call, with whatever raw payload was seen before it failed
#[derive(Debug)]
struct CallFailure {
    raw: String,
    error: PipelineError,
}

impl From<PipelineError> for CallFailure {
    fn from(error: PipelineError) -> Self {
        Self {
            raw: String::new(),
            error,
        }
    }
}

impl From<LlmError> for CallFailure {
    fn from(error: LlmError) -> Self {
        Self {
            raw: error.raw_payload().unwrap_or_default().to_string(),
            error: error.into(),
        }
    }
}

/// Runs every configured process against an LLM provider
///
/// Processes, steps and chunks are handled strictly one after another.
/// The first failure stops the run; artifacts written before it are kept.
pub struct Pipeline<P>
where
    P: LlmProvider<Error = LlmError>,
{
    provider: P,
    clock: Option<Clock>,
}

impl<P> Pipeline<P>
where
    P: LlmProvider<Error = LlmError>,
{
    /// Create a new Pipeline
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            clock: None,
        }
    }

    /// Stamp artifacts with `clock` instead of the system clock
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = Some(clock);
        self
    }

    /// The provider calls are dispatched to
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Run every process in declaration order
    pub async fn run(&self, config: &Config) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        for process in &config.processes {
            if process.skip {
                info!("Skipping process: {}", process.name);
                summary.processes_skipped += 1;
                continue;
            }

            match self.run_process(config, process).await {
                Ok(outcome) => summary.merge(outcome),
                Err(e) => {
                    error!("Process {} failed: {}", process.name, e);
                    return Err(e);
                }
            }
        }

        info!(
            "All processes completed: {} run, {} skipped, {} chunks, {} pairs",
            summary.processes_run,
            summary.processes_skipped,
            summary.chunks_processed,
            summary.pairs_generated
        );

        Ok(summary)
    }

    fn exporter(&self, config: &Config, process: &Process) -> Exporter {
        let exporter = Exporter::new(config.base_dir().join(&process.output_dir));
        match &self.clock {
            Some(clock) => exporter.with_clock(clock.clone()),
            None => exporter,
        }
    }

    async fn run_process(&self, config: &Config, process: &Process) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        info!("Processing: {}", process.name);

        let target = config
            .target(&process.target)
            .ok_or_else(|| ConfigError::UnknownTarget {
                process: process.name.clone(),
                target: process.target.clone(),
            })?;

        info!("Collecting corpus...");
        let corpus = collect_corpus(&process.documents, config.base_dir())?;
        info!("Corpus collected: {} bytes", corpus.len());

        if corpus.trim().is_empty() {
            warn!("Corpus for {} is empty, nothing to do", process.name);
            summary.processes_skipped += 1;
            return Ok(summary);
        }

        let exporter = self.exporter(config, process);
        let steps = process.effective_steps();
        let chunks = chunk(&corpus, process.chunk_size);

        for step in 1..=steps {
            let step_info = format!("Step({} of {})", step, steps);
            info!("{} chunking corpus into {} chunks", step_info, chunks.len());

            for (idx, text) in chunks.iter().enumerate() {
                let chunk_info = format!("{} Chunk({} of {})", step_info, idx + 1, chunks.len());
                info!("{} processing", chunk_info);

                let envelope = match self.model_call(target, process, text).await {
                    Ok(envelope) => envelope,
                    Err(failure) => {
                        if !failure.raw.is_empty() {
                            error!("Saving raw response for {} to a debug file", process.name);
                        }
                        if let Err(e) = exporter.dump_debug(&failure.raw) {
                            error!("Failed to save raw response: {}", e);
                        }
                        return Err(failure.error);
                    }
                };
                summary.chunks_processed += 1;

                if envelope.is_miss() {
                    warn!("{} returned nothing for {}", chunk_info, process.name);
                    summary.misses += 1;
                    continue;
                }

                if let Some(data) = &envelope.data {
                    let path = exporter.export_data(data)?;
                    summary.pairs_generated += count_pairs(data);
                    summary.artifacts.push(path);
                } else {
                    summary.artifacts.push(exporter.dump_raw(&envelope.raw)?);
                }

                info!("{} completed", chunk_info);
            }

            info!("{} completed", step_info);
        }

        summary.processes_run += 1;
        Ok(summary)
    }

    /// One chat-completion round trip for one chunk
    async fn model_call(
        &self,
        target: &Target,
        process: &Process,
        document: &str,
    ) -> std::result::Result<ResponseEnvelope, CallFailure> {
        let context = PromptContext { document };
        let system_prompt =
            Template::parse("systemPrompt", &process.system_prompt)?.execute(&context)?;
        let user_prompt = Template::parse("userPrompt", &process.user_prompt)?.execute(&context)?;

        let mut request = CompletionRequest::new(&process.model, system_prompt, user_prompt)
            .with_max_tokens(process.max_tokens)
            .with_temperature(process.temperature);
        if process.uses_tool_schema() {
            if let Some(schema) = &process.json_schema {
                request = request.with_tool_schema(schema.clone());
            }
        }

        debug!("Requesting chat completion from {}", target.name);
        let started = Instant::now();
        let completion = self.provider.complete(target, &request).await;
        info!("Took: {:.2} seconds", started.elapsed().as_secs_f32());

        let raw = interpret_reply(&completion?, request.is_hinted())?;
        debug!("Response length: {} chars", raw.len());

        let Some(schema) = process.json_schema.as_ref().filter(|_| !raw.is_empty()) else {
            return Ok(ResponseEnvelope::raw(raw));
        };

        match extract_structured(&raw, schema, &process.name) {
            Ok(values) => Ok(ResponseEnvelope::from_values(raw, values)),
            Err(error) => Err(CallFailure { raw, error }),
        }
    }
}

/// Pairs in exported data, when it has the `{conversations: [...]}` shape
fn count_pairs(data: &Value) -> usize {
    match data {
        Value::Array(items) => items.iter().map(count_pairs).sum(),
        other => ConversationsResponse::from_value(other).map_or(0, |r| r.len()),
    }
}
