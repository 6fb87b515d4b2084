//! Corpus assembly from document patterns

use crate::error::{PipelineError, Result};
use crate::fs::expand_files;
use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Expand every pattern relative to `base_dir` and merge the results
///
/// Duplicates across patterns are removed; paths come back in lexicographic order.
pub fn document_paths(patterns: &[String], base_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = BTreeSet::new();

    for pattern in patterns {
        let joined = clean_path(&base_dir.join(pattern));
        let joined = joined.to_string_lossy();
        let matches = expand_files(&joined)?;
        debug!("Pattern {} matched {} files", joined, matches.len());
        paths.extend(matches);
    }

    Ok(paths.into_iter().collect())
}

/// Fold `.` and `..` components without touching the filesystem
///
/// `..` directly under the root stays at the root. Leading `..` of a relative
/// path is kept.
fn clean_path(path: &Path) -> PathBuf {
    let mut cleaned: Vec<Component> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match cleaned.last() {
                Some(Component::Normal(_)) => {
                    cleaned.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => cleaned.push(component),
            },
            other => cleaned.push(other),
        }
    }

    if cleaned.is_empty() {
        return PathBuf::from(".");
    }
    cleaned.iter().collect()
}

/// Read every matched document and concatenate them, one `\n` after each
pub fn collect_corpus(patterns: &[String], base_dir: &Path) -> Result<String> {
    let mut corpus = String::new();

    for path in document_paths(patterns, base_dir)? {
        let text = std::fs::read_to_string(&path).map_err(|e| PipelineError::io(&path, e))?;
        corpus.push_str(&text);
        corpus.push('\n');
    }

    Ok(corpus)
}
