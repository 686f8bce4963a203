//! Configuration system for the interrupt controller model.
//!
//! This module defines the configuration structures used to parameterize the
//! controller. It provides:
//! 1. **Defaults:** Baseline constants matching the reference CLIC build (64 lines, one hart).
//! 2. **Structures:** Controller geometry and latency sampling parameters.
//! 3. **Loading:** JSON parsing with validation, from a string or a file.
//!
//! Configuration is supplied as JSON, or use `Config::default()` for the reference build.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::common::ConfigError;
use crate::common::constants::{MAX_CONTEXTS, MAX_INTERRUPTS, PRIORITY_REG_BITS};

/// Default configuration constants for the controller.
///
/// These values define the baseline build when not explicitly overridden
/// in a JSON configuration.
mod defaults {
    /// Number of interrupt lines in the reference build.
    pub const NUM_INTERRUPTS: usize = 64;

    /// Number of execution contexts (harts) with their own threshold.
    pub const NUM_CONTEXTS: usize = 1;

    /// Number of implemented priority bits (full byte).
    pub const PRIORITY_BITS: u8 = 8;

    /// Base physical address of the register window.
    pub const BASE_ADDR: u64 = 0x0280_0000;

    /// Number of trials averaged by a latency measurement.
    pub const LATENCY_TRIALS: u32 = 10;

    /// Poll budget per latency trial before it is declared a timeout.
    pub const LATENCY_MAX_POLLS: u64 = 10_000;
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use clicsim_core::config::Config;
///
/// let json = r#"{
///     "controller": {
///         "num_interrupts": 32,
///         "priority_bits": 4
///     },
///     "latency": {
///         "trials": 3
///     }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.controller.num_interrupts, 32);
/// assert_eq!(config.controller.num_contexts, 1);
/// assert_eq!(config.controller.priority_bits, 4);
/// assert_eq!(config.latency.trials, 3);
/// assert_eq!(config.latency.max_polls, 10_000);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Controller geometry and register window placement
    #[serde(default)]
    pub controller: ControllerConfig,
    /// Latency sampling parameters
    #[serde(default)]
    pub latency: LatencyConfig,
}

impl Config {
    /// Parses and validates a JSON configuration.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Checks every field against its permitted range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.controller.validate()?;
        self.latency.validate()
    }
}

/// Controller geometry.
///
/// Defines how many lines and contexts exist, how many priority bits are
/// implemented, and where the register window lives.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ControllerConfig {
    /// Number of interrupt lines (1..=1024)
    #[serde(default = "ControllerConfig::default_num_interrupts")]
    pub num_interrupts: usize,

    /// Number of execution contexts, each with its own threshold (1..=15)
    #[serde(default = "ControllerConfig::default_num_contexts")]
    pub num_contexts: usize,

    /// Implemented priority bits (1..=8); higher bits of a written priority are dropped
    #[serde(default = "ControllerConfig::default_priority_bits")]
    pub priority_bits: u8,

    /// Base physical address of the register window
    #[serde(default = "ControllerConfig::default_base_addr")]
    pub base_addr: u64,
}

impl ControllerConfig {
    /// Returns the default number of interrupt lines.
    const fn default_num_interrupts() -> usize {
        defaults::NUM_INTERRUPTS
    }

    /// Returns the default number of contexts.
    const fn default_num_contexts() -> usize {
        defaults::NUM_CONTEXTS
    }

    /// Returns the default number of implemented priority bits.
    const fn default_priority_bits() -> u8 {
        defaults::PRIORITY_BITS
    }

    /// Returns the default register window base address.
    const fn default_base_addr() -> u64 {
        defaults::BASE_ADDR
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.num_interrupts == 0 || self.num_interrupts > MAX_INTERRUPTS {
            return Err(ConfigError::Invalid(format!(
                "num_interrupts must be in 1..={MAX_INTERRUPTS}, got {}",
                self.num_interrupts
            )));
        }
        if self.num_contexts == 0 || self.num_contexts > MAX_CONTEXTS {
            return Err(ConfigError::Invalid(format!(
                "num_contexts must be in 1..={MAX_CONTEXTS}, got {}",
                self.num_contexts
            )));
        }
        if self.priority_bits == 0 || self.priority_bits > PRIORITY_REG_BITS {
            return Err(ConfigError::Invalid(format!(
                "priority_bits must be in 1..={PRIORITY_REG_BITS}, got {}",
                self.priority_bits
            )));
        }
        Ok(())
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            num_interrupts: defaults::NUM_INTERRUPTS,
            num_contexts: defaults::NUM_CONTEXTS,
            priority_bits: defaults::PRIORITY_BITS,
            base_addr: defaults::BASE_ADDR,
        }
    }
}

/// Latency sampling parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LatencyConfig {
    /// Number of trials averaged per measurement
    #[serde(default = "LatencyConfig::default_trials")]
    pub trials: u32,

    /// Poll budget per trial; exhausting it records a timeout
    #[serde(default = "LatencyConfig::default_max_polls")]
    pub max_polls: u64,
}

impl LatencyConfig {
    /// Returns the default number of latency trials.
    const fn default_trials() -> u32 {
        defaults::LATENCY_TRIALS
    }

    /// Returns the default per-trial poll budget.
    const fn default_max_polls() -> u64 {
        defaults::LATENCY_MAX_POLLS
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.trials == 0 {
            return Err(ConfigError::Invalid("latency.trials must be nonzero".into()));
        }
        if self.max_polls == 0 {
            return Err(ConfigError::Invalid(
                "latency.max_polls must be nonzero".into(),
            ));
        }
        Ok(())
    }
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            trials: defaults::LATENCY_TRIALS,
            max_polls: defaults::LATENCY_MAX_POLLS,
        }
    }
}
