//! Hardware timers behind the tick clock
//!
//! The DWT cycle counter serves as the microsecond register and SysTick as
//! the rebase interrupt. SysTick's 24-bit reload cannot span a rebase period
//! at typical core clocks, so it runs at 1 ms and a [`RebaseDivider`] counts
//! those expiries down to one rebase.

use core::sync::atomic::{AtomicU32, Ordering};

use cortex_m::peripheral::syst::SystClkSource;
#[cfg(not(armv6m))]
use cortex_m::peripheral::DWT;
use cortex_m::peripheral::SYST;
use lmic_hal_core::{HalError, HalResult, MicrosTimer, PeriodicTicker};

/// SysTick expiry period
pub const SYSTICK_PERIOD_US: u32 = 1_000;

const SYST_RELOAD_MAX: u32 = 0x00FF_FFFF;

/// Microsecond counter derived from the DWT cycle counter.
///
/// The board must enable tracing and the cycle counter (`DCB::enable_trace`,
/// `DWT::enable_cycle_counter`) before the clock is started. ARMv6-M cores
/// have no cycle counter, so this timer is not built for them; boards there
/// supply their own `MicrosTimer`.
#[cfg(not(armv6m))]
#[derive(Debug)]
pub struct DwtTimer {
    sysclk_hz: u32,
    origin: u32,
}

#[cfg(not(armv6m))]
impl DwtTimer {
    /// Timer for a core running at `sysclk_hz`
    pub const fn new(sysclk_hz: u32) -> Self {
        Self {
            sysclk_hz,
            origin: 0,
        }
    }
}

#[cfg(not(armv6m))]
impl MicrosTimer for DwtTimer {
    fn start(&mut self) -> HalResult<()> {
        if self.sysclk_hz == 0 {
            log::error!("core clock frequency is zero");
            return Err(HalError::InvalidConfig);
        }
        if !DWT::cycle_counter_enabled() {
            log::error!("DWT cycle counter is not running");
            return Err(HalError::TimerFault);
        }
        self.origin = DWT::cycle_count();
        Ok(())
    }

    #[inline]
    fn elapsed_us(&self) -> u32 {
        cycles_to_us(DWT::cycle_count().wrapping_sub(self.origin), self.sysclk_hz)
    }

    fn reset(&mut self) {
        self.origin = DWT::cycle_count();
    }

    /// The cycle counter wraps after 2^32 cycles: ~8.9 s at 480 MHz.
    fn max_interval_us(&self) -> u32 {
        cycles_to_us(u32::MAX, self.sysclk_hz)
    }
}

/// Whole microseconds in `cycles` at `sysclk_hz`, capped at `u32::MAX`
#[cfg(not(armv6m))]
const fn cycles_to_us(cycles: u32, sysclk_hz: u32) -> u32 {
    if sysclk_hz == 0 {
        return 0;
    }
    let us = cycles as u64 * 1_000_000 / sysclk_hz as u64;
    if us > u32::MAX as u64 {
        u32::MAX
    } else {
        us as u32
    }
}

/// Counts SysTick expiries down to a rebase.
///
/// Lives in a `static` shared by [`SysTickTicker::arm`] and the SysTick
/// exception. Uses plain atomic loads and stores only, which ARMv6-M has.
#[derive(Debug)]
pub struct RebaseDivider {
    every: AtomicU32,
    countdown: AtomicU32,
}

impl RebaseDivider {
    pub const fn new() -> Self {
        Self {
            every: AtomicU32::new(0),
            countdown: AtomicU32::new(0),
        }
    }

    /// Rebase once every `expiries` SysTick periods
    pub fn set_every(&self, expiries: u32) {
        self.every.store(expiries, Ordering::Relaxed);
        self.countdown.store(expiries, Ordering::Relaxed);
    }

    /// Call from the SysTick exception; `true` when a rebase is due.
    ///
    /// Returns `false` until the divider has been armed.
    pub fn on_interrupt(&self) -> bool {
        let every = self.every.load(Ordering::Relaxed);
        if every == 0 {
            return false;
        }

        let left = self.countdown.load(Ordering::Relaxed);
        if left <= 1 {
            self.countdown.store(every, Ordering::Relaxed);
            true
        } else {
            self.countdown.store(left - 1, Ordering::Relaxed);
            false
        }
    }
}

impl Default for RebaseDivider {
    fn default() -> Self {
        Self::new()
    }
}

/// SysTick driven rebase interrupt
///
/// ```ignore
/// static DIVIDER: RebaseDivider = RebaseDivider::new();
///
/// #[exception]
/// fn SysTick() {
///     if DIVIDER.on_interrupt() {
///         CLOCK.rebase();
///     }
/// }
/// ```
pub struct SysTickTicker {
    syst: SYST,
    sysclk_hz: u32,
    divider: &'static RebaseDivider,
}

impl SysTickTicker {
    pub fn new(syst: SYST, sysclk_hz: u32, divider: &'static RebaseDivider) -> Self {
        Self {
            syst,
            sysclk_hz,
            divider,
        }
    }

    pub fn free(self) -> SYST {
        self.syst
    }
}

impl PeriodicTicker for SysTickTicker {
    /// Rebase periods are rounded down to whole milliseconds, minimum one.
    fn arm(&mut self, period_us: u32) -> HalResult<()> {
        let reload = systick_reload(self.sysclk_hz)?;

        self.syst.disable_counter();
        self.divider.set_every(expiries_per_rebase(period_us));
        self.syst.set_clock_source(SystClkSource::Core);
        self.syst.set_reload(reload);
        self.syst.clear_current();
        self.syst.enable_interrupt();
        self.syst.enable_counter();

        log::debug!("SysTick reload {} for {} us rebase", reload, period_us);
        Ok(())
    }
}

fn systick_reload(sysclk_hz: u32) -> HalResult<u32> {
    let cycles = sysclk_hz / (1_000_000 / SYSTICK_PERIOD_US);
    if cycles == 0 || cycles - 1 > SYST_RELOAD_MAX {
        log::error!("no SysTick reload for a {} Hz core clock", sysclk_hz);
        return Err(HalError::TimerFault);
    }
    Ok(cycles - 1)
}

fn expiries_per_rebase(period_us: u32) -> u32 {
    (period_us / SYSTICK_PERIOD_US).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lmic_hal_core::ClockConfig;

    #[test]
    fn divider_is_silent_until_armed() {
        let divider = RebaseDivider::new();
        assert!(!divider.on_interrupt());
    }

    #[test]
    fn divider_fires_every_nth_expiry() {
        let divider = RebaseDivider::new();
        divider.set_every(3);

        let fired: [bool; 6] = core::array::from_fn(|_| divider.on_interrupt());
        assert_eq!(fired, [false, false, true, false, false, true]);
    }

    #[test]
    fn reload_fits_systick() {
        assert_eq!(systick_reload(48_000_000), Ok(47_999));
        assert_eq!(systick_reload(500), Err(HalError::TimerFault));
        assert_eq!(systick_reload(u32::MAX), Ok(4_294_966));
    }

    #[test]
    fn cycles_scale_without_truncating_the_clock() {
        // 2.097 MHz: whole cycles per us would round down to 2 and run ~5% fast
        assert_eq!(cycles_to_us(2_097_152, 2_097_152), 1_000_000);
        assert_eq!(cycles_to_us(48_000_000, 48_000_000), 1_000_000);
        assert_eq!(cycles_to_us(479, 480_000_000), 0);
        assert_eq!(cycles_to_us(480, 480_000_000), 1);
        assert_eq!(cycles_to_us(u32::MAX, 32_768), u32::MAX);
        assert_eq!(cycles_to_us(1_000, 0), 0);
    }

    #[test]
    fn horizon_bounds_the_rebase_period() {
        let fast = DwtTimer::new(480_000_000);
        assert_eq!(fast.max_interval_us(), 8_947_848);
        assert!(ClockConfig::DEFAULT.rebase_interval_us > fast.max_interval_us());

        let typical = DwtTimer::new(48_000_000);
        assert_eq!(typical.max_interval_us(), 89_478_485);
        assert!(ClockConfig::DEFAULT.rebase_interval_us <= typical.max_interval_us());

        assert_eq!(DwtTimer::new(0).max_interval_us(), 0);
    }

    #[test]
    fn rebase_period_in_systick_expiries() {
        assert_eq!(expiries_per_rebase(10_000_000), 10_000);
        assert_eq!(expiries_per_rebase(1_500), 1);
        assert_eq!(expiries_per_rebase(200), 1);
    }
}
