//! Priority Arbiter.
//!
//! Selects at most one line to service per dispatch cycle. The decision is a
//! pure function of the registry and the gate:
//! 1. **Candidates:** lines that are enabled and pending.
//! 2. **Gating:** candidates blocked by the context threshold are dropped.
//! 3. **Ordering:** the numerically smallest priority wins.
//! 4. **Tie-break:** among equal priorities the lowest line id wins.

use super::registry::LineRegistry;
use super::threshold::{ThresholdGate, blocks};
use crate::common::{ContextId, LineId, Result};

/// Returns the line that `context` would service next, if any.
///
/// Fails only when `context` is out of range.
pub fn select_next(
    registry: &LineRegistry,
    gate: &ThresholdGate,
    context: ContextId,
) -> Result<Option<LineId>> {
    let threshold = gate.get_threshold(context)?;
    Ok(registry
        .iter()
        .filter(|(_, line)| line.is_active() && !blocks(threshold, line.priority))
        .min_by_key(|&(id, line)| (line.priority, id))
        .map(|(id, _)| id))
}
