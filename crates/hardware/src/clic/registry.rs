//! Interrupt Line Registry.
//!
//! The registry owns the state of every interrupt line in a fixed-capacity
//! table allocated once at construction. It provides:
//! 1. **Configuration:** Priority, trigger mode, and polarity per line.
//! 2. **Enable / Pending:** Software control of the enable and pending bits.
//! 3. **Input Sampling:** Edge detection and level following for raw input signals.
//! 4. **Poll Clock:** The monotonic poll counter used to stamp pending rises.
//!
//! Every operation addressing a line fails with [`ClicError::InvalidLine`] when
//! the id is out of range; all other operations are total.

use tracing::debug;

use super::line::{InterruptLine, Polarity, TriggerMode, decode_attr};
use crate::common::constants::PRIORITY_REG_BITS;
use crate::common::{ClicError, LineId, Result};

/// Fixed-size table of interrupt lines.
#[derive(Clone, Debug)]
pub struct LineRegistry {
    /// Line state indexed by line id.
    lines: Box<[InterruptLine]>,
    /// Mask applied to written priorities (implemented priority bits).
    priority_mask: u8,
    /// Monotonic poll counter.
    now: u64,
}

impl LineRegistry {
    /// Creates a registry of `count` disabled, idle lines at priority 0.
    ///
    /// # Arguments
    ///
    /// * `count` - Number of lines.
    /// * `priority_bits` - Implemented priority bits; values of 8 or more keep the full byte.
    pub fn new(count: usize, priority_bits: u8) -> Self {
        let priority_mask = if priority_bits >= PRIORITY_REG_BITS {
            u8::MAX
        } else {
            (1u8 << priority_bits) - 1
        };
        Self {
            lines: vec![InterruptLine::default(); count].into_boxed_slice(),
            priority_mask,
            now: 0,
        }
    }

    /// Returns the number of lines.
    #[inline]
    pub const fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns `true` if the registry holds no lines.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Returns the mask applied to written priorities.
    #[inline]
    pub const fn priority_mask(&self) -> u8 {
        self.priority_mask
    }

    /// Returns the current value of the poll counter.
    #[inline]
    pub const fn now(&self) -> u64 {
        self.now
    }

    /// Returns the state of line `id`.
    pub fn line(&self, id: LineId) -> Result<&InterruptLine> {
        self.lines.get(id).ok_or(ClicError::InvalidLine {
            id,
            count: self.lines.len(),
        })
    }

    fn line_mut(&mut self, id: LineId) -> Result<&mut InterruptLine> {
        let count = self.lines.len();
        self.lines
            .get_mut(id)
            .ok_or(ClicError::InvalidLine { id, count })
    }

    /// Iterates over `(id, line)` pairs in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (LineId, &InterruptLine)> + '_ {
        self.lines.iter().enumerate()
    }

    /// Sets priority, trigger mode, and polarity of a line.
    ///
    /// Leaves the enable and pending bits untouched.
    pub fn configure(
        &mut self,
        id: LineId,
        priority: u8,
        trigger: TriggerMode,
        polarity: Polarity,
    ) -> Result<()> {
        let mask = self.priority_mask;
        let line = self.line_mut(id)?;
        line.priority = priority & mask;
        line.trigger = trigger;
        line.polarity = polarity;
        debug!(
            line = id,
            priority = line.priority,
            ?trigger,
            ?polarity,
            "configured interrupt line"
        );
        Ok(())
    }

    /// Sets only the priority of a line.
    pub fn set_priority(&mut self, id: LineId, priority: u8) -> Result<()> {
        let mask = self.priority_mask;
        self.line_mut(id)?.priority = priority & mask;
        Ok(())
    }

    /// Sets trigger mode and polarity from an attribute byte.
    pub fn set_attr(&mut self, id: LineId, attr: u8) -> Result<()> {
        let (trigger, polarity) = decode_attr(attr);
        let line = self.line_mut(id)?;
        line.trigger = trigger;
        line.polarity = polarity;
        Ok(())
    }

    /// Enables a line for dispatch.
    pub fn enable(&mut self, id: LineId) -> Result<()> {
        self.line_mut(id)?.enabled = true;
        Ok(())
    }

    /// Disables a line. A pending request is kept and resumes on re-enable.
    pub fn disable(&mut self, id: LineId) -> Result<()> {
        self.line_mut(id)?.enabled = false;
        Ok(())
    }

    /// Marks a line pending, regardless of enable state or trigger mode.
    pub fn set_pending(&mut self, id: LineId) -> Result<()> {
        let now = self.now;
        self.line_mut(id)?.raise(now);
        Ok(())
    }

    /// Clears the pending bit of a line.
    pub fn clear_pending(&mut self, id: LineId) -> Result<()> {
        self.line_mut(id)?.lower();
        Ok(())
    }

    /// Returns whether a line is pending.
    pub fn is_pending(&self, id: LineId) -> Result<bool> {
        Ok(self.line(id)?.pending)
    }

    /// Returns whether a line is enabled.
    pub fn is_enabled(&self, id: LineId) -> Result<bool> {
        Ok(self.line(id)?.enabled)
    }

    /// Samples the raw input signal of a line.
    ///
    /// Edge lines latch pending on the transition selected by their polarity
    /// and ignore the level otherwise. Level lines make pending follow the
    /// asserted level, so deasserting the input withdraws the request.
    pub fn drive_input(&mut self, id: LineId, level: bool) -> Result<()> {
        let now = self.now;
        let line = self.line_mut(id)?;
        let previous = line.input;
        line.input = level;
        match line.trigger {
            TriggerMode::Edge => {
                let edge = previous != level && line.polarity.is_asserted(level);
                if edge {
                    line.raise(now);
                }
            }
            TriggerMode::Level => {
                if line.polarity.is_asserted(level) {
                    line.raise(now);
                } else {
                    line.lower();
                }
            }
        }
        Ok(())
    }

    /// Disables every line and clears pending, input, and timing state.
    ///
    /// Priorities and attributes survive; the poll counter keeps running.
    pub fn reset(&mut self) {
        for line in &mut self.lines {
            line.enabled = false;
            line.input = false;
            line.lower();
        }
    }

    /// Advances the poll counter and returns the new value.
    pub(crate) const fn advance(&mut self) -> u64 {
        self.now += 1;
        self.now
    }

    /// Applies the service-time latch policy and returns the latency sample.
    ///
    /// Edge lines drop their pending bit. Level lines stay pending and are
    /// re-stamped so a repeat service measures from this one.
    pub(crate) fn claim(&mut self, id: LineId, now: u64) -> Result<Option<u64>> {
        let line = self.line_mut(id)?;
        let latency = line.pending_since.map(|since| now.saturating_sub(since));
        match line.trigger {
            TriggerMode::Edge => line.lower(),
            TriggerMode::Level => line.pending_since = Some(now),
        }
        Ok(latency)
    }
}
