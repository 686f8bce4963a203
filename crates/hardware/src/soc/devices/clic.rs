//! Core-Local Interrupt Controller (CLIC) register block.
//!
//! Exposes a [`Clic`] through byte-wide memory-mapped registers, one byte per
//! line in each per-line bank and one threshold page per hart.
//!
//! # Memory Map
//!
//! * `0x0000 + id`: `clicintip`, interrupt pending (nonzero write sets, zero clears)
//! * `0x0400 + id`: `clicintie`, interrupt enable
//! * `0x0800 + id`: `clicintattr`, bit 1 edge-triggered, bit 2 positive polarity
//! * `0x0C00 + id`: `cliciprio`, interrupt priority (lower is more urgent)
//! * `0x1000 + hart * 0x1000`: `mithreshold`, per-hart priority threshold
//!
//! Wider accesses are composed little-endian from the byte registers.

use tracing::warn;

use crate::clic::{Clic, Delivery, DeliveryHandler};
use crate::common::constants::{
    CLIC_ATTR_MASK, CLIC_BANK_SIZE, CLIC_CONTEXT_STRIDE, CLIC_INTATTR_OFFSET, CLIC_INTIE_OFFSET,
    CLIC_INTIP_OFFSET, CLIC_INTPRIO_OFFSET, CLIC_MITHRESHOLD_OFFSET,
};
use crate::common::{ContextId, LineId, Result};
use crate::config::ControllerConfig;
use crate::soc::devices::Device;

/// A decoded register address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Register {
    Pending(LineId),
    Enable(LineId),
    Attr(LineId),
    Priority(LineId),
    Threshold(ContextId),
}

/// CLIC device structure.
#[derive(Debug)]
pub struct ClicDevice {
    /// Base physical address of the device.
    base_addr: u64,
    /// Controller state behind the registers.
    clic: Clic,
}

impl ClicDevice {
    /// Creates a new CLIC device.
    ///
    /// # Arguments
    ///
    /// * `base_addr` - The base physical address.
    /// * `clic` - The controller whose state the registers expose.
    pub const fn new(base_addr: u64, clic: Clic) -> Self {
        Self { base_addr, clic }
    }

    /// Builds the controller from `config` and maps it at `config.base_addr`.
    pub fn from_config<H>(config: &ControllerConfig, handler: H) -> Self
    where
        H: DeliveryHandler + 'static,
    {
        Self::new(config.base_addr, Clic::new(config, handler))
    }

    /// Returns the controller.
    pub const fn clic(&self) -> &Clic {
        &self.clic
    }

    /// Returns the controller for direct manipulation.
    pub const fn clic_mut(&mut self) -> &mut Clic {
        &mut self.clic
    }

    /// Consumes the device and returns the controller.
    pub fn into_inner(self) -> Clic {
        self.clic
    }

    /// Samples the raw input vector; `levels[i]` drives line `i`.
    ///
    /// Entries beyond the number of lines are ignored.
    pub fn update_irqs(&mut self, levels: &[bool]) {
        let count = self.clic.num_lines();
        for (id, &level) in levels.iter().enumerate().take(count) {
            if let Err(err) = self.clic.drive_input(id, level) {
                warn!(%err, "input sample rejected");
            }
        }
    }

    /// Returns the interrupt output presented to `hart`: whether a request is
    /// asserted, and if so its line id and priority.
    pub fn interrupt_output(&self, hart: ContextId) -> Result<Option<Delivery>> {
        self.clic.pending_request(hart)
    }

    /// Acknowledges the request on `hart`, servicing it through the controller.
    pub fn claim(&mut self, hart: ContextId) -> Result<Option<Delivery>> {
        self.clic.poll(hart)
    }

    /// Size of the register window in bytes.
    const fn window_size(&self) -> u64 {
        CLIC_MITHRESHOLD_OFFSET + self.clic.num_contexts() as u64 * CLIC_CONTEXT_STRIDE
    }

    /// Maps a device-relative offset to a register, if one lives there.
    fn decode(&self, offset: u64) -> Option<Register> {
        if offset >= CLIC_MITHRESHOLD_OFFSET {
            let rel = offset - CLIC_MITHRESHOLD_OFFSET;
            let context = (rel / CLIC_CONTEXT_STRIDE) as usize;
            return (rel % CLIC_CONTEXT_STRIDE == 0 && context < self.clic.num_contexts())
                .then_some(Register::Threshold(context));
        }

        let bank = offset / CLIC_BANK_SIZE * CLIC_BANK_SIZE;
        let id = (offset - bank) as usize;
        if id >= self.clic.num_lines() {
            return None;
        }
        match bank {
            CLIC_INTIP_OFFSET => Some(Register::Pending(id)),
            CLIC_INTIE_OFFSET => Some(Register::Enable(id)),
            CLIC_INTATTR_OFFSET => Some(Register::Attr(id)),
            CLIC_INTPRIO_OFFSET => Some(Register::Priority(id)),
            _ => None,
        }
    }

    fn read_register(&self, reg: Register) -> Result<u8> {
        let lines = self.clic.lines();
        Ok(match reg {
            Register::Pending(id) => u8::from(lines.is_pending(id)?),
            Register::Enable(id) => u8::from(lines.is_enabled(id)?),
            Register::Attr(id) => lines.line(id)?.attr(),
            Register::Priority(id) => lines.line(id)?.priority,
            Register::Threshold(context) => self.clic.get_threshold(context)?,
        })
    }

    fn write_register(&mut self, reg: Register, val: u8) -> Result<()> {
        match reg {
            Register::Pending(id) if val != 0 => self.clic.set_pending(id),
            Register::Pending(id) => self.clic.clear_pending(id),
            Register::Enable(id) if val & 1 != 0 => self.clic.enable(id),
            Register::Enable(id) => self.clic.disable(id),
            Register::Attr(id) => self.clic.lines_mut().set_attr(id, val & CLIC_ATTR_MASK),
            Register::Priority(id) => self.clic.lines_mut().set_priority(id, val),
            Register::Threshold(context) => self.clic.set_threshold(context, val),
        }
    }
}

impl Device for ClicDevice {
    /// Returns the device name.
    fn name(&self) -> &str {
        "CLIC"
    }

    /// Returns the address range (Base, Size).
    fn address_range(&self) -> (u64, u64) {
        (self.base_addr, self.window_size())
    }

    /// Reads a byte register; unmapped offsets read as zero.
    fn read_u8(&mut self, offset: u64) -> u8 {
        self.decode(offset)
            .and_then(|reg| self.read_register(reg).ok())
            .unwrap_or(0)
    }

    /// Writes a byte register; unmapped offsets are ignored.
    fn write_u8(&mut self, offset: u64, val: u8) {
        let Some(reg) = self.decode(offset) else {
            return;
        };
        if let Err(err) = self.write_register(reg, val) {
            warn!(%err, offset, "CLIC register write rejected");
        }
    }

    /// Re-evaluates arbitration; returns true if any hart has a request asserted.
    fn tick(&mut self) -> bool {
        (0..self.clic.num_contexts())
            .any(|hart| matches!(self.clic.select_next(hart), Ok(Some(_))))
    }

    /// Returns a mutable reference to the CLIC if this device is one.
    fn as_clic_mut(&mut self) -> Option<&mut ClicDevice> {
        Some(self)
    }
}
