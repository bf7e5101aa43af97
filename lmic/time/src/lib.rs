#![cfg_attr(not(feature = "std"), no_std)]

//! # LMIC HAL Time
//!
//! The tick clock a LoRaWAN MAC schedules against.
//!
//! A [`Clock`] owns the hardware microsecond counter, the accumulated tick
//! base and the critical-section [`Arbiter`](lmic_hal_sync::Arbiter) that
//! serialises them. Reads go through a critical section so they never race the
//! periodic rebase interrupt that folds the hardware counter into the base.
//!
//! ## Module Overview
//! - [`clock`]    – tick counter, initialisation and rebase.
//! - [`deadline`] – saturating deadline checks and the blocking wait.
//! - [`halt`]     – terminal failure sink.

pub mod clock;
pub mod deadline;
pub mod halt;

pub use clock::Clock;
pub use halt::failed;
pub use lmic_hal_core::{ClockConfig, HalError, HalResult, Ticks};
pub use lmic_hal_sync::{CriticalGuard, InterruptMask};
