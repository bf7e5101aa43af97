//! Global interrupt mask abstraction

/// Processor-level switch for all maskable interrupts.
///
/// Ports implement this with the target's `cpsid`/`cpsie` equivalent; the
/// host port emulates it with a lock that the simulated interrupt thread has
/// to take before running a handler.
pub trait InterruptMask: Sync {
    /// Mask all maskable interrupts.
    ///
    /// Must be idempotent: masking while already masked by the same context is
    /// a no-op.
    fn disable(&self);

    /// Unmask interrupts.
    ///
    /// # Safety
    ///
    /// Unmasking inside a critical section breaks every guarantee data
    /// borrowed through that section relies on. Only the [`Arbiter`] calls
    /// this, when the outermost section ends.
    ///
    /// [`Arbiter`]: crate::Arbiter
    unsafe fn enable(&self);

    /// True while interrupts are masked
    fn is_masked(&self) -> bool;
}
