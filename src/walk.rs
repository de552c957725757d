//! Suffix-filtered recursive tree walk.
//!
//! Enumerates candidate files under a root directory by recursive descent,
//! filtered to names ending with a configured suffix. Ordering is
//! OS-dependent and callers must not rely on it; every file is processed
//! independently downstream.
//!
//! Well-known vendored and derived directories are skipped so a walk over a
//! front-end project does not descend into `node_modules` or build output.

use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::RefitError;

/// Directories never descended into.
const DEFAULT_EXCLUDE_DIRS: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    "node_modules",
    "build",
    "dist",
    ".next",
    ".cache",
    "coverage",
];

/// Check if a path contains an excluded directory component.
fn should_exclude(path: &Path) -> bool {
    path.components().any(|component| {
        if let std::path::Component::Normal(name) = component {
            DEFAULT_EXCLUDE_DIRS
                .iter()
                .any(|dir| name.to_string_lossy() == *dir)
        } else {
            false
        }
    })
}

/// Enumerate files under `root` whose name ends with `suffix`.
///
/// A missing or unreadable root aborts the run with an access error, as
/// does any entry the walk cannot read. Partial continuation is deliberate
/// non-behavior: a migration must either see the whole tree or fail.
pub fn walk_sources(root: &Path, suffix: &str) -> Result<Vec<PathBuf>, RefitError> {
    if !root.is_dir() {
        return Err(RefitError::access(
            root,
            io::Error::new(io::ErrorKind::NotFound, "root is not a directory"),
        ));
    }

    let mut files = Vec::new();
    // Exclusion looks only at components below the root, so a root that
    // happens to live under a directory named like an excluded one (a CI
    // "build" checkout, say) still walks.
    for entry in WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| !should_exclude(e.path().strip_prefix(root).unwrap_or_else(|_| e.path())))
    {
        let entry = entry.map_err(|e| {
            let path = e
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| root.to_path_buf());
            RefitError::access(path, e.into())
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if name.ends_with(suffix) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

// ============================================================================
// Tests
// ============================================================================
