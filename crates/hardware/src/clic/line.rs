//! Interrupt Line State.
//!
//! This module defines the per-line state owned by the registry. It provides:
//! 1. **Trigger Modes:** Edge (one-shot latch) and level (persistent) sampling.
//! 2. **Polarity:** Which raw input level or transition counts as an assertion.
//! 3. **Attribute Encoding:** Conversion to and from the `clicintattr` byte.

use serde::{Deserialize, Serialize};

use crate::common::constants::{CLIC_ATTR_POL_POS, CLIC_ATTR_TRIG_EDGE};

/// How a line latches its pending bit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerMode {
    /// Pending is a one-shot latch, cleared when the line is serviced.
    Edge,
    /// Pending persists until explicitly cleared or the input deasserts.
    #[default]
    Level,
}

/// Which input sense counts as asserted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Polarity {
    /// Active-high level, rising edge.
    #[default]
    Positive,
    /// Active-low level, falling edge.
    Negative,
}

impl Polarity {
    /// Returns `true` if the raw input `level` is the asserted level.
    #[inline]
    pub const fn is_asserted(self, level: bool) -> bool {
        match self {
            Self::Positive => level,
            Self::Negative => !level,
        }
    }
}

/// Decodes trigger mode and polarity from an attribute byte.
///
/// Bits outside [`CLIC_ATTR_MASK`](crate::common::constants::CLIC_ATTR_MASK) are ignored.
pub const fn decode_attr(attr: u8) -> (TriggerMode, Polarity) {
    let trigger = if attr & CLIC_ATTR_TRIG_EDGE != 0 {
        TriggerMode::Edge
    } else {
        TriggerMode::Level
    };
    let polarity = if attr & CLIC_ATTR_POL_POS != 0 {
        Polarity::Positive
    } else {
        Polarity::Negative
    };
    (trigger, polarity)
}

/// Encodes trigger mode and polarity into an attribute byte.
pub const fn encode_attr(trigger: TriggerMode, polarity: Polarity) -> u8 {
    let mut attr = 0;
    if matches!(trigger, TriggerMode::Edge) {
        attr |= CLIC_ATTR_TRIG_EDGE;
    }
    if matches!(polarity, Polarity::Positive) {
        attr |= CLIC_ATTR_POL_POS;
    }
    attr
}

/// State of one interrupt line.
///
/// A line is a dispatch candidate only while it is both enabled and pending.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct InterruptLine {
    /// Urgency; lower values are serviced first, 0 is the most urgent.
    pub priority: u8,
    /// Pending latch behaviour.
    pub trigger: TriggerMode,
    /// Sense of the raw input.
    pub polarity: Polarity,
    /// Whether the line may be dispatched.
    pub enabled: bool,
    /// Whether the line is requesting service.
    pub pending: bool,
    /// Last sampled raw input level, used for edge detection.
    #[serde(skip)]
    pub(crate) input: bool,
    /// Poll count at which `pending` last rose; feeds latency samples.
    #[serde(skip)]
    pub(crate) pending_since: Option<u64>,
}

impl InterruptLine {
    /// Returns `true` if the line is enabled and pending.
    #[inline]
    pub const fn is_active(&self) -> bool {
        self.enabled && self.pending
    }

    /// Returns the attribute byte describing this line's trigger mode and polarity.
    pub const fn attr(&self) -> u8 {
        encode_attr(self.trigger, self.polarity)
    }

    /// Sets pending, stamping the rise time if it was clear.
    pub(crate) fn raise(&mut self, now: u64) {
        if !self.pending {
            self.pending = true;
            self.pending_since = Some(now);
        }
    }

    /// Clears pending and forgets the rise time.
    pub(crate) fn lower(&mut self) {
        self.pending = false;
        self.pending_since = None;
    }
}
