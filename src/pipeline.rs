//! Per-file migration pass and whole-tree run.
//!
//! Each candidate file flows through a linear pipeline: read, match,
//! rewrite, reconcile imports, write back. Files are processed
//! independently, one at a time; no state is shared across files. A file is
//! written if and only if at least one rule's applies-decision was true for
//! it, so non-matching files are never opened for writing and stay
//! byte-for-byte untouched.
//!
//! Access failures abort the run. Files that are not valid UTF-8 are
//! skipped and reported instead.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::{ReplacementRule, RuleSet};
use crate::error::RefitError;
use crate::imports;
use crate::output::{ChangedFile, ContentHash, RunReport, SkippedFile};
use crate::rewrite;
use crate::walk;

// ============================================================================
// Per-File Outcome
// ============================================================================

/// What happened to one candidate file.
#[derive(Debug)]
enum FileOutcome {
    /// No rule applied; the file was not touched.
    Unchanged,
    /// At least one rule applied; the file was rewritten (or would be,
    /// under dry-run).
    Changed(ChangedFile),
    /// The file could not be decoded and was skipped.
    Skipped(SkippedFile),
}

// ============================================================================
// Whole-Tree Run
// ============================================================================

/// Run the full rule set over the tree rooted at `root`.
///
/// Under `dry_run`, no file is written; the returned report describes what
/// a real run would change.
pub fn run(root: &Path, rules: &RuleSet, dry_run: bool) -> Result<RunReport, RefitError> {
    rules.validate()?;

    // Walk once per distinct suffix; the set dedupes files matched by
    // overlapping suffixes and gives a deterministic processing order.
    let mut candidates: BTreeSet<PathBuf> = BTreeSet::new();
    for suffix in rules.suffixes() {
        candidates.extend(walk::walk_sources(root, suffix)?);
    }

    let mut report = RunReport::new(root.display().to_string(), dry_run);
    report.files_scanned = candidates.len();

    for path in &candidates {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let applicable = rules.rules_for(&file_name);
        if applicable.is_empty() {
            continue;
        }

        match process_file(path, root, &applicable, dry_run)? {
            FileOutcome::Unchanged => {}
            FileOutcome::Changed(changed) => {
                info!(path = changed.path.as_str(), rules = ?changed.rules, "migrated");
                report.changed.push(changed);
            }
            FileOutcome::Skipped(skipped) => {
                warn!(
                    path = skipped.path.as_str(),
                    reason = skipped.reason.as_str(),
                    "skipped"
                );
                report.skipped.push(skipped);
            }
        }
    }

    Ok(report)
}

// ============================================================================
// Per-File Pass
// ============================================================================

/// Relative display path for reports: forward slashes on every platform.
fn relative_display(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace(std::path::MAIN_SEPARATOR, "/")
}

/// Run every applicable rule over one file and write the result back if any
/// rule applied.
fn process_file(
    path: &Path,
    root: &Path,
    rules: &[&ReplacementRule],
    dry_run: bool,
) -> Result<FileOutcome, RefitError> {
    let rel = relative_display(path, root);

    let bytes = fs::read(path).map_err(|e| RefitError::access(path, e))?;
    let original = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(_) => {
            return Ok(FileOutcome::Skipped(SkippedFile {
                path: rel,
                reason: "not valid UTF-8".to_string(),
            }));
        }
    };

    let mut text = original.clone();
    let mut applied: Vec<String> = Vec::new();

    for rule in rules.iter().copied() {
        // The applies-decision is taken against the current text so a rule
        // sees the effect of the rules before it.
        if !rule.applies(&text) {
            debug!(path = rel.as_str(), rule = rule.name.as_str(), "no match");
            continue;
        }

        let rewritten = rewrite::rewrite(&text, rule)?;
        let module_path = imports::module_path_for(path, root, &rule.module)?;
        text = imports::reconcile(&rewritten.text, &rule.required_symbols, &module_path)?;

        debug!(
            path = rel.as_str(),
            rule = rule.name.as_str(),
            literals = rewritten.literal_count,
            handlers = rewritten.handler_count,
            "applied"
        );
        applied.push(rule.name.clone());
    }

    if applied.is_empty() {
        return Ok(FileOutcome::Unchanged);
    }

    if !dry_run {
        fs::write(path, text.as_bytes()).map_err(|e| RefitError::access(path, e))?;
    }

    Ok(FileOutcome::Changed(ChangedFile {
        path: rel,
        rules: applied,
        old_hash: ContentHash::compute(original.as_bytes()),
        new_hash: ContentHash::compute(text.as_bytes()),
    }))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_file(root: &Path, rel: &str, content: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn file_with_no_trigger_is_unchanged_outcome() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "Plain.tsx", "export const X = 1;\n");
        let rules = RuleSet::builtin();
        let applicable: Vec<&ReplacementRule> = rules.rules.iter().collect();

        let outcome = process_file(&path, dir.path(), &applicable, false).unwrap();
        assert!(matches!(outcome, FileOutcome::Unchanged));
    }

    #[test]
    fn invalid_utf8_is_skipped_outcome() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Broken.tsx");
        fs::write(&path, [0xff, 0xfe, 0x00, 0x01]).unwrap();
        let rules = RuleSet::builtin();
        let applicable: Vec<&ReplacementRule> = rules.rules.iter().collect();

        let outcome = process_file(&path, dir.path(), &applicable, false).unwrap();
        match outcome {
            FileOutcome::Skipped(skipped) => {
                assert_eq!(skipped.path, "Broken.tsx");
                assert!(skipped.reason.contains("UTF-8"));
            }
            other => panic!("expected skip, got {:?}", other),
        }
    }

    #[test]
    fn changed_outcome_carries_distinct_hashes() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            dir.path(),
            "Avatar.tsx",
            "import React from 'react';\nconst src = '/uploads/profiles/default-avatar.png';\n",
        );
        let rules = RuleSet::builtin();
        let applicable: Vec<&ReplacementRule> = rules.rules.iter().collect();

        let outcome = process_file(&path, dir.path(), &applicable, false).unwrap();
        match outcome {
            FileOutcome::Changed(changed) => {
                assert_ne!(changed.old_hash, changed.new_hash);
                assert_eq!(changed.rules, vec!["default-avatar".to_string()]);
            }
            other => panic!("expected change, got {:?}", other),
        }
    }

    #[test]
    fn dry_run_leaves_file_bytes_alone() {
        let dir = TempDir::new().unwrap();
        let content = "const src = '/uploads/profiles/default-avatar.png';\n";
        let path = write_file(dir.path(), "Avatar.tsx", content);
        let rules = RuleSet::builtin();
        let applicable: Vec<&ReplacementRule> = rules.rules.iter().collect();

        let outcome = process_file(&path, dir.path(), &applicable, true).unwrap();
        assert!(matches!(outcome, FileOutcome::Changed(_)));
        assert_eq!(fs::read_to_string(&path).unwrap(), content);
    }

    #[test]
    fn run_validates_rules_first() {
        let dir = TempDir::new().unwrap();
        let empty = RuleSet { rules: vec![] };
        let err = run(dir.path(), &empty, false).unwrap_err();
        assert_eq!(err.error_code().code(), 2);
    }
}
