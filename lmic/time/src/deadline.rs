//! Deadline scheduling over the tick clock
//!
//! Deadlines are plain [`Ticks`] compared to `now()` by signed difference, so
//! they stay correct across the 2^32 wrap as long as they lie within 2^31
//! ticks of the present.

use core::convert::Infallible;

use lmic_hal_core::{ticks, MicrosTimer, Ticks, DUE_WINDOW};
use lmic_hal_sync::InterruptMask;

use crate::Clock;

impl<T: MicrosTimer, M: InterruptMask> Clock<T, M> {
    /// Saturating distance from now to `target`.
    ///
    /// `0` when due or past, `0xFFFF` when further away than 16 bits can
    /// express, the exact tick count otherwise.
    pub fn delta_ticks(&self, target: Ticks) -> u16 {
        ticks::delta_ticks(target, self.now())
    }

    /// Non-blocking deadline check: `Ok(())` once `target` is due
    pub fn poll_deadline(&self, target: Ticks) -> nb::Result<(), Infallible> {
        if self.delta_ticks(target) == 0 {
            Ok(())
        } else {
            Err(nb::Error::WouldBlock)
        }
    }

    /// Busy-wait until `target` is due.
    ///
    /// Blocks the calling context completely, with no timeout. A target more
    /// than 2^31 ticks ahead reads as past and returns at once.
    pub fn wait_until(&self, target: Ticks) {
        loop {
            match self.poll_deadline(target) {
                Ok(()) => return,
                Err(nb::Error::WouldBlock) => core::hint::spin_loop(),
                Err(nb::Error::Other(never)) => match never {},
            }
        }
    }

    /// True when `target` is due now or within the next tick
    pub fn check_timer(&self, target: Ticks) -> bool {
        self.delta_ticks(target) < DUE_WINDOW
    }
}
