//! Monotonic tick counter
//!
//! `now = base + (hardware_elapsed_us >> 6)`. The periodic rebase interrupt
//! adds the hardware count to `base` and zeroes the register, which keeps the
//! register far away from its own overflow. Both halves of that update happen
//! inside one critical section, so a foreground read never sees the register
//! reset without the matching base increment.

use core::cell::{Cell, RefCell};

use critical_section::Mutex;
use lmic_hal_core::{ClockConfig, HalError, HalResult, MicrosTimer, PeriodicTicker, Ticks, TICK_SHIFT};
use lmic_hal_sync::{Arbiter, CriticalGuard, InterruptMask};

/// Interrupt-safe 64 µs tick clock.
///
/// Owns the only shared mutable state of the timing core: the tick base, the
/// hardware timer and the critical-section depth. `new` is `const` so
/// firmware can keep the clock in a `static` shared with its timer interrupt.
pub struct Clock<T, M> {
    arbiter: Arbiter<M>,
    base: Mutex<Cell<u32>>,
    timer: Mutex<RefCell<T>>,
    initialized: Mutex<Cell<bool>>,
    config: ClockConfig,
}

impl<T: MicrosTimer, M: InterruptMask> Clock<T, M> {
    /// Create a stopped clock
    pub const fn new(timer: T, mask: M, config: ClockConfig) -> Self {
        Self {
            arbiter: Arbiter::new(mask),
            base: Mutex::new(Cell::new(0)),
            timer: Mutex::new(RefCell::new(timer)),
            initialized: Mutex::new(Cell::new(false)),
            config,
        }
    }

    /// Start the clock.
    ///
    /// Zeroes the tick base, starts the hardware counter and arms `ticker` to
    /// deliver a rebase every `rebase_interval_us`. Runs with interrupts
    /// masked so the first rebase cannot observe a half-initialised clock.
    ///
    /// Fails with `InvalidConfig` when the period is longer than the counter
    /// can run before wrapping.
    pub fn init<P: PeriodicTicker + ?Sized>(&self, ticker: &mut P) -> HalResult<()> {
        self.config.validate()?;

        self.arbiter
            .with(|cs| {
                let initialized = self.initialized.borrow(cs);
                if initialized.get() {
                    return Err(HalError::AlreadyInitialized);
                }

                let mut timer = self.timer.borrow_ref_mut(cs);
                if self.config.rebase_interval_us > timer.max_interval_us() {
                    return Err(HalError::InvalidConfig);
                }

                self.base.borrow(cs).set(0);
                timer.start()?;
                ticker.arm(self.config.rebase_interval_us)?;
                initialized.set(true);
                Ok(())
            })
            .map_err(|err| {
                log::error!("tick clock init failed: {}", err);
                err
            })?;

        log::info!(
            "tick clock started, rebase every {} us",
            self.config.rebase_interval_us
        );
        Ok(())
    }

    /// Current tick count, wrapping at 2^32
    pub fn now(&self) -> Ticks {
        self.arbiter.with(|cs| {
            let elapsed = self.timer.borrow_ref(cs).elapsed_us();
            Ticks::new(self.base.borrow(cs).get()).wrapping_add(elapsed >> TICK_SHIFT)
        })
    }

    /// Fold the hardware counter into the tick base and reset it.
    ///
    /// Called from the periodic interrupt. A rebase delivered before `init`
    /// is ignored.
    pub fn rebase(&self) {
        let folded = self.arbiter.with(|cs| {
            if !self.initialized.borrow(cs).get() {
                return None;
            }

            let mut timer = self.timer.borrow_ref_mut(cs);
            let ticks = timer.elapsed_us() >> TICK_SHIFT;
            let base = self.base.borrow(cs);
            base.set(base.get().wrapping_add(ticks));
            timer.reset();
            Some(ticks)
        });

        match folded {
            Some(ticks) => log::trace!("rebase folded {} ticks", ticks),
            None => log::debug!("rebase before init ignored"),
        }
    }

    /// Enter a critical section on this clock's arbiter
    pub fn enter_critical(&self) -> CriticalGuard<'_, M> {
        self.arbiter.enter()
    }

    /// Mask interrupts without a guard.
    ///
    /// # Safety
    ///
    /// Must be paired with exactly one [`exit_critical_raw`](Self::exit_critical_raw).
    pub unsafe fn enter_critical_raw(&self) {
        // SAFETY: forwarded caller contract.
        unsafe { self.arbiter.enter_raw() }
    }

    /// Leave a section opened with [`enter_critical_raw`](Self::enter_critical_raw).
    ///
    /// # Safety
    ///
    /// Must close a section opened on the same execution context.
    pub unsafe fn exit_critical_raw(&self) {
        // SAFETY: forwarded caller contract.
        unsafe { self.arbiter.exit_raw() }
    }

    /// True once `init` has succeeded
    pub fn is_initialized(&self) -> bool {
        self.arbiter.with(|cs| self.initialized.borrow(cs).get())
    }

    pub fn config(&self) -> &ClockConfig {
        &self.config
    }

    pub fn arbiter(&self) -> &Arbiter<M> {
        &self.arbiter
    }
}
