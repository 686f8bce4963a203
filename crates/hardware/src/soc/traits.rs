//! Device trait for memory-mapped register access.
//!
//! This module defines the `Device` trait implemented by bus-attached register blocks. It provides:
//! 1. **Identification:** `name` and `address_range` for bus routing.
//! 2. **Access:** Byte, half, word, and doubleword read/write at device-relative offsets.
//! 3. **Lifecycle:** Optional `tick` reporting whether an interrupt request is asserted.
//! 4. **Downcasting:** Optional cast to `ClicDevice` for controller-specific access.
//!
//! Implementors must be `Send` so a device can be handed to another thread.

use crate::soc::devices::ClicDevice;

/// Trait for memory-mapped devices attached to a system bus.
///
/// Unmapped reads return 0 and unmapped writes are ignored; a device never
/// faults the bus.
pub trait Device: Send {
    /// Returns a short name for this device (e.g., `"CLIC"`).
    fn name(&self) -> &str;
    /// Returns (base_address, size_in_bytes) for this device's register window.
    fn address_range(&self) -> (u64, u64);
    /// Reads one byte at the given device-relative offset.
    fn read_u8(&mut self, offset: u64) -> u8;
    /// Writes one byte at the given offset.
    fn write_u8(&mut self, offset: u64, val: u8);

    /// Reads two bytes (little-endian) at the given offset.
    fn read_u16(&mut self, offset: u64) -> u16 {
        u16::from_le_bytes([self.read_u8(offset), self.read_u8(offset + 1)])
    }
    /// Reads four bytes (little-endian) at the given offset.
    fn read_u32(&mut self, offset: u64) -> u32 {
        let mut bytes = [0u8; 4];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = self.read_u8(offset + i as u64);
        }
        u32::from_le_bytes(bytes)
    }
    /// Reads eight bytes (little-endian) at the given offset.
    fn read_u64(&mut self, offset: u64) -> u64 {
        let mut bytes = [0u8; 8];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = self.read_u8(offset + i as u64);
        }
        u64::from_le_bytes(bytes)
    }

    /// Writes two bytes (little-endian) at the given offset.
    fn write_u16(&mut self, offset: u64, val: u16) {
        self.write_bytes(offset, &val.to_le_bytes());
    }
    /// Writes four bytes (little-endian) at the given offset.
    fn write_u32(&mut self, offset: u64, val: u32) {
        self.write_bytes(offset, &val.to_le_bytes());
    }
    /// Writes eight bytes (little-endian) at the given offset.
    fn write_u64(&mut self, offset: u64, val: u64) {
        self.write_bytes(offset, &val.to_le_bytes());
    }

    /// Writes a contiguous byte slice at the given offset (default: byte-by-byte).
    fn write_bytes(&mut self, offset: u64, data: &[u8]) {
        for (i, byte) in data.iter().enumerate() {
            self.write_u8(offset + i as u64, *byte);
        }
    }

    /// Advances device state by one cycle; returns `true` if an interrupt request is asserted.
    fn tick(&mut self) -> bool {
        false
    }

    /// Returns a mutable reference as `ClicDevice` if this device is the CLIC; otherwise `None`.
    fn as_clic_mut(&mut self) -> Option<&mut ClicDevice> {
        None
    }
}
