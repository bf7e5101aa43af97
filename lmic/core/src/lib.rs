#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

//! # LMIC HAL Core
//!
//! Core types shared by every layer of the LMIC hardware abstraction: the
//! 64 µs [`Ticks`] unit, the saturating deadline policy, clock configuration,
//! and the traits a platform implements to feed the tick clock with a
//! microsecond counter and a periodic interrupt.

use core::fmt;

pub mod config;
pub mod ticks;
pub mod timer;

pub use config::*;
pub use ticks::*;
pub use timer::*;

/// LMIC HAL version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result type used throughout the HAL
pub type HalResult<T> = Result<T, HalError>;

/// Error types for HAL setup and platform plumbing
///
/// The timing core itself has no recoverable failures; these only surface
/// while bringing the clock up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HalError {
    /// Configuration rejected by [`ClockConfig::validate`]
    InvalidConfig,
    /// The clock was initialised twice
    AlreadyInitialized,
    /// Hardware timer or periodic interrupt could not be started
    TimerFault,
}

impl fmt::Display for HalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HalError::InvalidConfig => write!(f, "Invalid clock configuration"),
            HalError::AlreadyInitialized => write!(f, "Clock already initialised"),
            HalError::TimerFault => write!(f, "Hardware timer failed to start"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for HalError {}

#[cfg(feature = "defmt")]
impl defmt::Format for HalError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            HalError::InvalidConfig => defmt::write!(fmt, "InvalidConfig"),
            HalError::AlreadyInitialized => defmt::write!(fmt, "AlreadyInitialized"),
            HalError::TimerFault => defmt::write!(fmt, "TimerFault"),
        }
    }
}
