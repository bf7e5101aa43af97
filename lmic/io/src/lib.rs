#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

//! # LMIC HAL I/O
//!
//! Thin synchronous collaborators of the MAC stack that carry no timing
//! invariants: the radio's chip-select, reset and antenna-switch pins plus
//! its SPI bus, and a byte-oriented text/hex logger for tracing.

pub mod debug;
pub mod event;
pub mod radio;

pub use debug::DebugLog;
pub use event::MacEvent;
pub use radio::{DioLine, RadioError, RadioIrq, RadioPins, ResetLine, RstLevel};
