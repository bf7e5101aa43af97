use cortex_m::interrupt;
use cortex_m::register::primask;
use lmic_hal_sync::InterruptMask;

/// The PRIMASK global interrupt mask of a single-core Cortex-M
#[derive(Debug, Default)]
pub struct CortexMInterrupts;

impl CortexMInterrupts {
    pub const fn new() -> Self {
        Self
    }
}

impl InterruptMask for CortexMInterrupts {
    #[inline]
    fn disable(&self) {
        interrupt::disable();
    }

    #[inline]
    unsafe fn enable(&self) {
        // SAFETY: the arbiter only unmasks when its outermost section ends.
        unsafe { interrupt::enable() };
    }

    #[inline]
    fn is_masked(&self) -> bool {
        primask::read().is_inactive()
    }
}
