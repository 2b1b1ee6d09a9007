//! Owned plan data shared by the store, the review reducer, and the TUI.
//!
//! A [`Plan`] is a read-only snapshot. The UI never edits one in place; after every
//! reject the store is queried again and the whole snapshot is swapped out.

use std::collections::HashMap;

use serde::Deserialize;

/// One proposed edit: the literal `old` span is replaced by the literal `new` span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub id: String, // UUID v4 text
    pub old: String,
    pub new: String,
}

/// All proposed changes for a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileResult {
    pub id: String, // UUID v4 text
    pub path: String,
    /// Full proposed body when the file does not exist yet.
    pub content: Option<String>,
    /// Undecided replacements, in proposal order.
    pub replacements: Vec<Replacement>,
    /// Number of replacements neither applied nor rejected.
    pub pending: usize,
}

impl FileResult {
    pub fn is_new_file(&self) -> bool {
        self.content.is_some()
    }
}

/// Per-path results plus the ordered list of paths that still need review.
#[derive(Debug, Clone, Default)]
pub struct PlanResult {
    /// Sorted, deduplicated paths with pending replacements or new-file content.
    pub sorted_paths: Vec<String>,
    pub results_by_path: HashMap<String, FileResult>,
}

impl PlanResult {
    /// Builds a `PlanResult` from loose per-file results.
    ///
    /// Paths are sorted and deduplicated; a path is navigable only while it has
    /// pending replacements or carries new-file content.
    pub fn from_results(results: Vec<FileResult>) -> Self {
        let mut sorted_paths: Vec<String> = results
            .iter()
            .filter(|r| r.pending > 0 || r.is_new_file())
            .map(|r| r.path.clone())
            .collect();
        sorted_paths.sort();
        sorted_paths.dedup();

        let results_by_path = results.into_iter().map(|r| (r.path.clone(), r)).collect();
        Self { sorted_paths, results_by_path }
    }

    pub fn result_for(&self, path: &str) -> Option<&FileResult> {
        self.results_by_path.get(path)
    }

    pub fn num_pending_for_path(&self, path: &str) -> usize {
        self.result_for(path).map(|r| r.pending).unwrap_or(0)
    }
}

/// Snapshot of a change set under review.
#[derive(Debug, Clone, Default)]
pub struct Plan {
    pub id: String,
    pub name: String,
    pub branch: String,
    pub result: PlanResult,
    /// Current body of each file with the plan's changes applied.
    pub files: HashMap<String, String>,
    /// Original body of each file before the plan touched it. Absent for new files.
    pub contexts: HashMap<String, String>,
}

impl Plan {
    pub fn path_count(&self) -> usize {
        self.result.sorted_paths.len()
    }

    pub fn path_at(&self, index: usize) -> Option<&str> {
        self.result.sorted_paths.get(index).map(String::as_str)
    }

    pub fn original_body(&self, path: &str) -> Option<&str> {
        self.contexts.get(path).map(String::as_str)
    }

    pub fn current_body(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }
}

/// One row of `planrev list`.
#[derive(Debug, Clone)]
pub struct PlanSummary {
    pub id: String,
    pub name: String,
    pub branch: String,
    pub created_at: i64, // Unix timestamp seconds
    pub pending: i64,
}

/// The identity of a single replacement on the change-management side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectTarget {
    pub plan_id: String,
    pub branch: String,
    pub result_id: String,
    pub replacement_id: String,
}

// ---------------------------------------------------------------------------
// Import format
// ---------------------------------------------------------------------------

fn default_branch() -> String {
    "main".to_owned()
}

/// A plan as produced by the backend, deserialised by `planrev import`.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanSnapshot {
    pub name: String,
    #[serde(default = "default_branch")]
    pub branch: String,
    #[serde(default)]
    pub files: Vec<FileSnapshot>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FileSnapshot {
    pub path: String,
    /// Pre-change body; omitted for files that do not exist yet.
    #[serde(default)]
    pub original: Option<String>,
    /// Body with the plan applied; derived from `original` when omitted.
    #[serde(default)]
    pub current: Option<String>,
    /// Full proposed body for a new file.
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub replacements: Vec<ReplacementSnapshot>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReplacementSnapshot {
    pub old: String,
    pub new: String,
}

impl FileSnapshot {
    /// Returns the body the plan would leave on disk.
    ///
    /// An explicit `current` wins. Otherwise each replacement is applied in order to
    /// the first occurrence of its old span in `original` (or `content` for a new
    /// file). Replacements whose old span is missing are skipped.
    pub fn current_body(&self) -> Option<String> {
        if let Some(current) = &self.current {
            return Some(current.clone());
        }
        let mut body = self.original.clone().or_else(|| self.content.clone())?;
        for rep in &self.replacements {
            if rep.old.is_empty() {
                continue;
            }
            if let Some(at) = body.find(&rep.old) {
                body.replace_range(at..at + rep.old.len(), &rep.new);
            }
        }
        Some(body)
    }
}
