//! Controller Constants.
//!
//! This module defines the constants shared by the line registry and the
//! memory-mapped front end. It includes:
//! 1. **Register Map:** Byte offsets of the per-line and per-context register banks.
//! 2. **Attribute Encoding:** Bit layout of the `clicintattr` byte.
//! 3. **Capacity Limits:** Upper bounds imposed by the register window.

/// Offset of the per-line interrupt pending bank (`clicintip`).
pub const CLIC_INTIP_OFFSET: u64 = 0x000;

/// Offset of the per-line interrupt enable bank (`clicintie`).
pub const CLIC_INTIE_OFFSET: u64 = 0x400;

/// Offset of the per-line attribute bank (`clicintattr`).
pub const CLIC_INTATTR_OFFSET: u64 = 0x800;

/// Offset of the per-line priority bank (`cliciprio`).
pub const CLIC_INTPRIO_OFFSET: u64 = 0xC00;

/// Offset of the first per-context threshold register (`mithreshold`).
pub const CLIC_MITHRESHOLD_OFFSET: u64 = 0x1000;

/// Stride between consecutive per-context register pages.
pub const CLIC_CONTEXT_STRIDE: u64 = 0x1000;

/// Width of one per-line register bank in bytes.
pub const CLIC_BANK_SIZE: u64 = 0x400;

/// Attribute bit selecting edge-triggered sampling (clear = level).
pub const CLIC_ATTR_TRIG_EDGE: u8 = 0x02;

/// Attribute bit selecting positive (active-high / rising) polarity.
pub const CLIC_ATTR_POL_POS: u8 = 0x04;

/// Attribute bits that carry meaning; the rest read back as zero.
pub const CLIC_ATTR_MASK: u8 = CLIC_ATTR_TRIG_EDGE | CLIC_ATTR_POL_POS;

/// Maximum number of lines addressable through one register bank.
pub const MAX_INTERRUPTS: usize = CLIC_BANK_SIZE as usize;

/// Maximum number of contexts; keeps the device window within 64 KiB.
pub const MAX_CONTEXTS: usize = 15;

/// Width of the priority registers in bits.
pub const PRIORITY_REG_BITS: u8 = 8;
