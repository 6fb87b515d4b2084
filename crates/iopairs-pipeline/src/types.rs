//! Result types for a pipeline run

use serde::Serialize;
use std::path::PathBuf;

/// What a completed run did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Processes that were executed to completion
    pub processes_run: usize,

    /// Processes passed over because of `skip: true` or an empty corpus
    pub processes_skipped: usize,

    /// Model calls made, across all steps
    pub chunks_processed: usize,

    /// Calls where the model never invoked the structured-output tool
    pub misses: usize,

    /// Training pairs seen in exported data
    pub pairs_generated: usize,

    /// Files written, in write order
    pub artifacts: Vec<PathBuf>,
}

impl RunSummary {
    /// Combine the counts of a finished process into this summary
    pub fn merge(&mut self, other: RunSummary) {
        self.processes_run += other.processes_run;
        self.processes_skipped += other.processes_skipped;
        self.chunks_processed += other.chunks_processed;
        self.misses += other.misses;
        self.pairs_generated += other.pairs_generated;
        self.artifacts.extend(other.artifacts);
    }
}
