//! Refit: one-shot, import-aware source tree migration.
//!
//! A maintenance tool that rewrites source files in place, substituting
//! hard-coded default-resource paths and inline error handlers with shared
//! named constants and shared handler functions, inserting or merging the
//! corresponding import statement when missing.
//!
//! The pipeline applied independently to each matched file:
//!
//! 1. [`walk`] enumerates candidate files under a root directory
//! 2. [`matcher`] decides per file whether a rule applies
//! 3. [`rewrite`] performs the textual substitutions
//! 4. [`imports`] reconciles the file's import statements
//! 5. [`pipeline`] writes the result back, if and only if a rule applied
//!
//! Substitution is purely textual, not syntax-aware. Writes are per-file and
//! not transactional: a crash mid-run may leave some files migrated and
//! others not, which is acceptable for a tool meant to run once against a
//! known tree.

pub mod config;
pub mod error;
pub mod imports;
pub mod matcher;
pub mod output;
pub mod pipeline;
pub mod rewrite;
pub mod walk;
