//! Common types and constants used throughout the interrupt controller model.
//!
//! This module provides the building blocks shared by every component. It includes:
//! 1. **Identifiers:** Aliases for interrupt line and execution context indices.
//! 2. **Constants:** Register map offsets, attribute bit layout, and capacity limits.
//! 3. **Error Handling:** Controller and configuration error types.

/// Register map, attribute encoding, and capacity constants.
pub mod constants;

/// Error types for controller operations and configuration loading.
pub mod error;

/// Index of an interrupt line, valid in `0..num_interrupts`.
pub type LineId = usize;

/// Index of an execution context (hart), valid in `0..num_contexts`.
pub type ContextId = usize;

pub use error::{ClicError, ConfigError, Result};
