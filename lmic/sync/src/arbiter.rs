//! Reentrant critical-section arbiter

use core::cell::Cell;
use core::marker::PhantomData;

use critical_section::{CriticalSection, Mutex};

use crate::mask::InterruptMask;

/// Owner of the global interrupt mask and the critical-section depth.
///
/// Interrupts are masked whenever the depth is above zero and are unmasked
/// exactly when it drops back to zero.
pub struct Arbiter<M> {
    mask: M,
    depth: Mutex<Cell<usize>>,
}

impl<M: InterruptMask> Arbiter<M> {
    /// Create an arbiter with depth zero
    pub const fn new(mask: M) -> Self {
        Self {
            mask,
            depth: Mutex::new(Cell::new(0)),
        }
    }

    /// Enter a critical section
    ///
    /// Returns a guard that leaves the section when dropped.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let _guard = arbiter.enter();
    /// // interrupts are masked here
    /// ```
    #[inline]
    pub fn enter(&self) -> CriticalGuard<'_, M> {
        // SAFETY: paired with the `exit_raw` in `CriticalGuard::drop`.
        unsafe { self.enter_raw() };
        CriticalGuard {
            arbiter: self,
            _not_send: PhantomData,
        }
    }

    /// Run `f` inside a critical section, handing it the section token
    #[inline]
    pub fn with<R>(&self, f: impl FnOnce(CriticalSection<'_>) -> R) -> R {
        let guard = self.enter();
        f(guard.token())
    }

    /// Mask interrupts and increment the depth.
    ///
    /// # Safety
    ///
    /// Must be paired with exactly one later [`exit_raw`](Self::exit_raw) on
    /// the same execution context. Prefer [`enter`](Self::enter).
    #[inline]
    pub unsafe fn enter_raw(&self) {
        self.mask.disable();
        // SAFETY: interrupts are masked.
        let cs = unsafe { CriticalSection::new() };
        let depth = self.depth.borrow(cs);
        depth.set(depth.get() + 1);
    }

    /// Decrement the depth and unmask interrupts when it reaches zero.
    ///
    /// An exit without a matching enter trips a debug assertion; release
    /// builds leave the depth at zero and the mask untouched.
    ///
    /// # Safety
    ///
    /// Must close a section opened with [`enter_raw`](Self::enter_raw) on the
    /// same execution context.
    #[inline]
    pub unsafe fn exit_raw(&self) {
        // SAFETY: the caller is inside a section, so interrupts are masked.
        let cs = unsafe { CriticalSection::new() };
        let depth = self.depth.borrow(cs);
        match depth.get() {
            0 => {
                debug_assert!(false, "critical section exit without matching enter");
                log::warn!("critical section exit without matching enter ignored");
            }
            1 => {
                depth.set(0);
                // SAFETY: the outermost section just ended.
                unsafe { self.mask.enable() };
            }
            n => depth.set(n - 1),
        }
    }

    /// Number of sections currently open, not counting this query's own
    pub fn depth(&self) -> usize {
        self.with(|cs| self.depth.borrow(cs).get() - 1)
    }

    /// True while some caller holds a critical section
    pub fn is_active(&self) -> bool {
        self.depth() > 0
    }

    /// The underlying interrupt mask
    pub fn mask(&self) -> &M {
        &self.mask
    }
}

/// RAII guard for a critical section
///
/// Automatically exits the critical section when dropped. Not `Send`: a
/// section must end on the context that opened it.
pub struct CriticalGuard<'a, M: InterruptMask> {
    arbiter: &'a Arbiter<M>,
    _not_send: PhantomData<*const ()>,
}

impl<M: InterruptMask> CriticalGuard<'_, M> {
    /// Token for borrowing `critical_section::Mutex` data
    pub fn token(&self) -> CriticalSection<'_> {
        // SAFETY: interrupts stay masked for as long as the guard lives.
        unsafe { CriticalSection::new() }
    }
}

impl<M: InterruptMask> Drop for CriticalGuard<'_, M> {
    fn drop(&mut self) {
        // SAFETY: opened by `Arbiter::enter`.
        unsafe { self.arbiter.exit_raw() };
    }
}
