//! Core-local interrupt controller (CLIC) model.
//!
//! This crate models a priority-based, threshold-gated interrupt controller with the following:
//! 1. **Controller:** Line registry, threshold gate, arbiter, and cooperative dispatch loop.
//! 2. **Instrumentation:** Per-line service counts, last-service tracking, and latency sampling.
//! 3. **SoC:** A memory-mapped register block exposing the controller to a bus.
//! 4. **Configuration:** JSON-deserializable geometry and latency parameters.
//!
//! The controller consumes only a delivery callback and its own poll counter;
//! it performs no real waiting.

/// Controller (lines, registry, threshold gate, arbiter, dispatch, shared handle).
pub mod clic;
/// Common types and constants (identifiers, register map, errors).
pub mod common;
/// Controller configuration (defaults, geometry, latency sampling).
pub mod config;
/// System-on-chip view (device trait, CLIC register block).
pub mod soc;
/// Dispatch statistics and latency reports.
pub mod stats;

/// Main controller type; construct with `Clic::new` or `Clic::from_fn`.
pub use crate::clic::Clic;
/// Error returned by controller operations.
pub use crate::common::ClicError;
/// Root configuration type; use `Config::default()` or `Config::from_json`.
pub use crate::config::Config;
