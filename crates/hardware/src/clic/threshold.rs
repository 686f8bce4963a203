//! Threshold Gate.
//!
//! Holds one priority threshold per execution context and decides whether a
//! candidate priority may be dispatched on that context.
//!
//! A priority is blocked when it is greater than or equal to the threshold,
//! except that a threshold of 0 blocks nothing. Priority 0 is therefore
//! admitted under every threshold.

use tracing::debug;

use crate::common::{ClicError, ContextId, Result};

/// Returns `true` if `priority` is suppressed by `threshold`.
#[inline]
pub const fn blocks(threshold: u8, priority: u8) -> bool {
    threshold != 0 && priority >= threshold
}

/// Per-context priority thresholds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThresholdGate {
    thresholds: Box<[u8]>,
}

impl ThresholdGate {
    /// Creates a gate for `contexts` contexts, each starting at threshold 0.
    pub fn new(contexts: usize) -> Self {
        Self {
            thresholds: vec![0; contexts].into_boxed_slice(),
        }
    }

    /// Returns the number of contexts.
    #[inline]
    pub const fn contexts(&self) -> usize {
        self.thresholds.len()
    }

    /// Fails with [`ClicError::InvalidContext`] if `context` does not exist.
    pub const fn check(&self, context: ContextId) -> Result<()> {
        if context < self.thresholds.len() {
            Ok(())
        } else {
            Err(ClicError::InvalidContext {
                context,
                count: self.thresholds.len(),
            })
        }
    }

    /// Stores the threshold of a context.
    pub fn set_threshold(&mut self, context: ContextId, value: u8) -> Result<()> {
        self.check(context)?;
        self.thresholds[context] = value;
        debug!(context, threshold = value, "threshold updated");
        Ok(())
    }

    /// Returns the threshold of a context.
    pub fn get_threshold(&self, context: ContextId) -> Result<u8> {
        self.check(context)?;
        Ok(self.thresholds[context])
    }

    /// Returns `true` if `priority` is suppressed on `context`.
    pub fn blocked(&self, priority: u8, context: ContextId) -> Result<bool> {
        Ok(blocks(self.get_threshold(context)?, priority))
    }

    /// Returns every threshold to 0.
    pub fn reset(&mut self) {
        self.thresholds.fill(0);
    }
}
