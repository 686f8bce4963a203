//! Controller and Configuration Errors.
//!
//! This module defines the error handling for the interrupt controller. It provides:
//! 1. **Controller Errors:** Out-of-range line or context addressing and latency timeouts.
//! 2. **Configuration Errors:** I/O, parse, and validation failures while loading a [`Config`](crate::Config).
//!
//! Every error is returned to the immediate caller; the controller never logs
//! and swallows a failure on its own.

use thiserror::Error;

use super::{ContextId, LineId};

/// Errors reported by controller operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ClicError {
    /// The addressed interrupt line does not exist.
    #[error("interrupt line {id} out of range (controller has {count} lines)")]
    InvalidLine {
        /// Requested line index.
        id: LineId,
        /// Number of lines the controller was built with.
        count: usize,
    },

    /// The addressed execution context does not exist.
    #[error("context {context} out of range (controller has {count} contexts)")]
    InvalidContext {
        /// Requested context index.
        context: ContextId,
        /// Number of contexts the controller was built with.
        count: usize,
    },

    /// A line was not serviced within the polling budget.
    ///
    /// Distinct from a zero-latency success; the caller decides whether to
    /// retry, abort, or report.
    #[error("interrupt line {line} not serviced within {polls} polls")]
    Timeout {
        /// Line that was awaited.
        line: LineId,
        /// Number of polls spent before giving up.
        polls: u64,
    },
}

/// Result alias for controller operations.
pub type Result<T, E = ClicError> = std::result::Result<T, E>;

/// Errors raised while loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration text is not valid JSON for [`Config`](crate::Config).
    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field holds a value outside its permitted range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
