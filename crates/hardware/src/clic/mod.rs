//! Core-Local Interrupt Controller (CLIC) model.
//!
//! The controller arbitrates a fixed set of interrupt lines against a
//! per-context priority threshold and services at most one line per
//! dispatch cycle. It is organized leaf first:
//! 1. **Lines:** Per-line priority, trigger mode, polarity, enable, and pending state.
//! 2. **Registry:** Fixed-capacity table of lines with configuration and input sampling.
//! 3. **Threshold Gate:** Per-context cutoff deciding which priorities are eligible.
//! 4. **Arbiter:** Pure selection of the next line (priority, then lowest id).
//! 5. **Dispatch:** Poll loop, edge/level latch policy, handler invocation, latency sampling.
//! 6. **Shared Handle:** Single-lock wrapper for multi-threaded hosts.

/// Next-line selection.
pub mod arbiter;

/// Dispatch loop and the `Clic` controller.
pub mod dispatch;

/// Delivery callback capability.
pub mod handler;

/// Per-line state, trigger modes, and attribute encoding.
pub mod line;

/// Fixed-capacity line table.
pub mod registry;

/// Lock-guarded controller handle.
pub mod shared;

/// Per-context priority thresholds.
pub mod threshold;

pub use dispatch::{Clic, DrainOutcome};
pub use handler::{Acknowledging, Delivery, DeliveryHandler, NullHandler};
pub use line::{InterruptLine, Polarity, TriggerMode};
pub use registry::LineRegistry;
pub use shared::SharedClic;
pub use threshold::ThresholdGate;
