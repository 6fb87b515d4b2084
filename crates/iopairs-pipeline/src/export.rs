//! Writing artifacts to a process output directory
//!
//! Every artifact is named after the unix second it was written in:
//! `<secs>.jsonl` for structured data, `<secs>.txt` for raw text and
//! `<secs>_debug.json` for payloads that failed to parse. A second write
//! within the same second gets a `-<n>` suffix instead of overwriting.

use crate::error::{PipelineError, Result};
use crate::fs::ensure_dir;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

/// Source of unix timestamps, in seconds
pub type Clock = Arc<dyn Fn() -> u64 + Send + Sync>;

fn system_clock() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Writes artifacts into one output directory
#[derive(Clone)]
pub struct Exporter {
    dir: PathBuf,
    clock: Clock,
}

impl std::fmt::Debug for Exporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Exporter").field("dir", &self.dir).finish()
    }
}

impl Exporter {
    /// Exporter for `dir`, stamped with the system clock
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            clock: Arc::new(system_clock),
        }
    }

    /// Replace the timestamp source
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Output directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write a structured value as pretty-printed JSON to `<secs>.jsonl`
    pub fn export_data(&self, data: &Value) -> Result<PathBuf> {
        let json = serde_json::to_string_pretty(data)?;
        self.write("", "jsonl", json.as_bytes())
    }

    /// Write unstructured model text to `<secs>.txt`
    pub fn dump_raw(&self, raw: &str) -> Result<PathBuf> {
        self.write("", "txt", raw.as_bytes())
    }

    /// Write a raw payload to `<secs>_debug.json`
    ///
    /// Nothing is written for an empty payload.
    pub fn dump_debug(&self, raw: &str) -> Result<Option<PathBuf>> {
        if raw.is_empty() {
            return Ok(None);
        }

        let path = self.write("_debug", "json", raw.as_bytes())?;
        info!("Raw response saved to {}", path.display());
        Ok(Some(path))
    }

    fn write(&self, tag: &str, ext: &str, contents: &[u8]) -> Result<PathBuf> {
        ensure_dir(&self.dir)?;

        let path = self.free_path(tag, ext);
        std::fs::write(&path, contents).map_err(|e| PipelineError::io(&path, e))?;
        debug!("Wrote {} bytes to {}", contents.len(), path.display());

        Ok(path)
    }

    fn free_path(&self, tag: &str, ext: &str) -> PathBuf {
        let stamp = (self.clock)();
        let mut path = self.dir.join(format!("{}{}.{}", stamp, tag, ext));
        let mut n = 1;
        while path.exists() {
            path = self.dir.join(format!("{}{}-{}.{}", stamp, tag, n, ext));
            n += 1;
        }
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fixed(dir: &Path, secs: u64) -> Exporter {
        Exporter::new(dir).with_clock(Arc::new(move || secs))
    }

    fn file_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_export_data_is_pretty_json() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = fixed(dir.path(), 1_700_000_000);

        let path = exporter
            .export_data(&json!({"conversations": [{"input": "Q", "output": "A"}]}))
            .unwrap();

        assert_eq!(path, dir.path().join("1700000000.jsonl"));
        let contents = std::fs::read_to_string(path).unwrap();
        assert_eq!(
            contents,
            "{\n  \"conversations\": [\n    {\n      \"input\": \"Q\",\n      \"output\": \"A\"\n    }\n  ]\n}"
        );
    }

    #[test]
    fn test_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("output");
        let exporter = fixed(&out, 42);

        exporter.dump_raw("hello").unwrap();
        assert_eq!(std::fs::read_to_string(out.join("42.txt")).unwrap(), "hello");
    }

    #[test]
    fn test_dump_debug() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = fixed(dir.path(), 7);

        let path = exporter.dump_debug("not json").unwrap().unwrap();
        assert_eq!(path, dir.path().join("7_debug.json"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "not json");
    }

    #[test]
    fn test_dump_debug_empty_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("output");
        let exporter = fixed(&out, 7);

        assert_eq!(exporter.dump_debug("").unwrap(), None);
        assert!(!out.exists());
    }

    #[test]
    fn test_same_second_writes_do_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = fixed(dir.path(), 100);

        exporter.export_data(&json!({"n": 1})).unwrap();
        exporter.export_data(&json!({"n": 2})).unwrap();
        exporter.export_data(&json!({"n": 3})).unwrap();
        exporter.dump_debug("x").unwrap();
        exporter.dump_debug("y").unwrap();

        assert_eq!(
            file_names(dir.path()),
            vec![
                "100-1.jsonl",
                "100-2.jsonl",
                "100.jsonl",
                "100_debug-1.json",
                "100_debug.json",
            ]
        );
        let first: Value =
            serde_json::from_str(&std::fs::read_to_string(dir.path().join("100.jsonl")).unwrap())
                .unwrap();
        assert_eq!(first, json!({"n": 1}));
    }

    #[test]
    fn test_system_clock_is_recent() {
        // 2023-11-14T22:13:20Z
        assert!(system_clock() > 1_700_000_000);
    }
}
