//! Run report types and rendering for CLI output.
//!
//! A migration run produces one [`RunReport`]: which files changed (and
//! under which rules), which were skipped, and content hashes before and
//! after each change for audit. The report renders as human-readable text
//! by default, or as JSON for machine consumers.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

// ============================================================================
// Content Hash
// ============================================================================

/// SHA-256 content hash, hex-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentHash(pub String);

impl ContentHash {
    /// Compute the hash of raw content.
    pub fn compute(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        ContentHash(hex::encode(hasher.finalize()))
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Report Types
// ============================================================================

/// One file the run modified (or would modify, under dry-run).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangedFile {
    /// Path relative to the walk root, forward slashes.
    pub path: String,
    /// Names of the rules that applied.
    pub rules: Vec<String>,
    /// Content hash before the rewrite.
    pub old_hash: ContentHash,
    /// Content hash after the rewrite.
    pub new_hash: ContentHash,
}

/// One file the run skipped instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFile {
    /// Path relative to the walk root.
    pub path: String,
    /// Why the file was skipped (e.g. not valid UTF-8).
    pub reason: String,
}

/// Summary of a whole migration run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// The walk root as given on the command line.
    pub root: String,
    /// True when no file was written.
    pub dry_run: bool,
    /// Number of candidate files examined.
    pub files_scanned: usize,
    /// Files modified, in walk order.
    pub changed: Vec<ChangedFile>,
    /// Files skipped with their reasons.
    pub skipped: Vec<SkippedFile>,
}

impl RunReport {
    /// Create an empty report for a run over `root`.
    pub fn new(root: impl Into<String>, dry_run: bool) -> Self {
        RunReport {
            root: root.into(),
            dry_run,
            files_scanned: 0,
            changed: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Render the report as human-readable text, one line per modified
    /// file, followed by a summary line.
    pub fn render_text(&self) -> String {
        let verb = if self.dry_run { "would migrate" } else { "migrated" };
        let mut out = String::new();
        for file in &self.changed {
            out.push_str(&format!("{} {} [{}]\n", verb, file.path, file.rules.join(", ")));
        }
        for file in &self.skipped {
            out.push_str(&format!("skipped {} ({})\n", file.path, file.reason));
        }
        out.push_str(&format!(
            "{} scanned, {} changed, {} skipped\n",
            self.files_scanned,
            self.changed.len(),
            self.skipped.len()
        ));
        out
    }

    /// Render the report as pretty-printed JSON.
    pub fn render_json(&self) -> String {
        serde_json::to_string_pretty(self).expect("report serialization cannot fail")
    }
}

// ============================================================================
// Tests
// ============================================================================
