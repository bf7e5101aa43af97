#![no_std]

//! Cortex-M port of the LMIC HAL tick clock.
//!
//! Maps the clock's hardware seams onto a single-core Cortex-M: PRIMASK as
//! the interrupt mask, the DWT cycle counter as the microsecond register and
//! SysTick as the periodic rebase interrupt.
//!
//! ARMv6-M (Cortex-M0/M0+) has no DWT cycle counter: there the crate builds
//! without [`DwtTimer`] and [`CortexMClock`], and the board pairs
//! [`CortexMInterrupts`] and [`SysTickTicker`] with a `MicrosTimer` of its own.
//!
//! ```ignore
//! static CLOCK: CortexMClock = CortexMClock::new(
//!     DwtTimer::new(SYSCLK_HZ),
//!     CortexMInterrupts::new(),
//!     ClockConfig::DEFAULT,
//! );
//! static DIVIDER: RebaseDivider = RebaseDivider::new();
//!
//! let mut cp = cortex_m::Peripherals::take().unwrap();
//! cp.DCB.enable_trace();
//! cp.DWT.enable_cycle_counter();
//! let mut ticker = SysTickTicker::new(cp.SYST, SYSCLK_HZ, &DIVIDER);
//! CLOCK.init(&mut ticker)?;
//! ```

pub mod interrupts;
pub mod timer;

#[cfg(not(armv6m))]
use lmic_hal_time::Clock;

pub use interrupts::CortexMInterrupts;
#[cfg(not(armv6m))]
pub use timer::DwtTimer;
pub use timer::{RebaseDivider, SysTickTicker, SYSTICK_PERIOD_US};

/// Tick clock on DWT and PRIMASK
#[cfg(not(armv6m))]
pub type CortexMClock = Clock<DwtTimer, CortexMInterrupts>;

#[cfg(test)]
extern crate std;
