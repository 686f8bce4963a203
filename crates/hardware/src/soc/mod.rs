//! System-on-Chip (SoC) Components.
//!
//! This module holds the memory-mapped face of the controller: the device
//! trait used for bus routing and the CLIC register block.

/// Memory-mapped device implementations.
pub mod devices;

/// Device trait definitions for MMIO access.
pub mod traits;

pub use devices::ClicDevice;
pub use traits::Device;
