#![cfg_attr(not(feature = "std"), no_std)]

//! # LMIC HAL Sync
//!
//! Reentrant critical sections built on a global interrupt mask. Entering a
//! section masks every maskable interrupt and bumps a nesting depth; leaving
//! the outermost section unmasks again. Inner sections never unmask early.
//!
//! The [`Arbiter`] hands out [`CriticalGuard`]s so every enter is paired with
//! exactly one exit, including early returns and panics. Data shared with
//! interrupt handlers lives in [`critical_section::Mutex`] and is borrowed
//! with the token a guard provides.

pub mod arbiter;
pub mod mask;

pub use arbiter::{Arbiter, CriticalGuard};
pub use critical_section::{CriticalSection, Mutex};
pub use mask::InterruptMask;
