//! Error types and exit code constants for refit.
//!
//! This module provides a unified error type (`RefitError`) covering the
//! failures a migration run can hit, and a stable exit-code mapping for the
//! CLI.
//!
//! ## Exit Code Mapping
//!
//! - `2`: Invalid arguments or an unusable rules file
//! - `3`: Access errors (root or a discovered file cannot be read/written)
//! - `10`: Internal errors (bugs, unexpected state)
//!
//! Encoding failures are deliberately absent: a file that cannot be decoded
//! as UTF-8 is skipped and reported, never fatal.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

// ============================================================================
// Exit Codes
// ============================================================================

/// Stable exit codes for CLI failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ErrorCode {
    /// Invalid arguments from caller (bad input, malformed rules file).
    InvalidArguments = 2,
    /// Access errors (missing path, permissions, failed read/write).
    AccessError = 3,
    /// Internal errors (bugs, unexpected state).
    InternalError = 10,
}

impl ErrorCode {
    /// Get the numeric code value.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// Unified error type for a migration run.
///
/// Access errors abort the run deliberately: migrations must be
/// all-or-nothing auditable, so there is no partial-recovery path once a
/// file cannot be read or written.
#[derive(Debug, Error)]
pub enum RefitError {
    /// A rules file could not be loaded or failed validation.
    #[error("invalid rules: {message}")]
    InvalidRules { message: String },

    /// The root directory or a discovered file could not be accessed.
    #[error("cannot access {}: {}", path.display(), source)]
    Access {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Internal error (bug or unexpected state).
    #[error("internal error: {message}")]
    Internal { message: String },
}

// ============================================================================
// Error Code Mapping
// ============================================================================

impl From<&RefitError> for ErrorCode {
    fn from(err: &RefitError) -> Self {
        match err {
            RefitError::InvalidRules { .. } => ErrorCode::InvalidArguments,
            RefitError::Access { .. } => ErrorCode::AccessError,
            RefitError::Internal { .. } => ErrorCode::InternalError,
        }
    }
}

impl From<RefitError> for ErrorCode {
    fn from(err: RefitError) -> Self {
        ErrorCode::from(&err)
    }
}

// ============================================================================
// Convenience Constructors
// ============================================================================

impl RefitError {
    /// Create an invalid rules error.
    pub fn invalid_rules(message: impl Into<String>) -> Self {
        RefitError::InvalidRules {
            message: message.into(),
        }
    }

    /// Create an access error for a path.
    pub fn access(path: impl Into<PathBuf>, source: io::Error) -> Self {
        RefitError::Access {
            path: path.into(),
            source,
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        RefitError::Internal {
            message: message.into(),
        }
    }

    /// Get the exit code for this error.
    pub fn error_code(&self) -> ErrorCode {
        ErrorCode::from(self)
    }
}

// ============================================================================
// Tests
// ============================================================================
