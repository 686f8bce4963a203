//! Memory-Mapped IO Devices.
//!
//! This module contains the register-level front end of the core-local
//! interrupt controller.

/// Core-Local Interrupt Controller (CLIC) register block.
pub mod clic;

pub use clic::ClicDevice;

pub use crate::soc::traits::Device;
