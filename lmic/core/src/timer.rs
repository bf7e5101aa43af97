//! Hardware timer abstraction
//!
//! The clock needs two things from the platform: a free-running microsecond
//! counter it can reset, and a periodic interrupt that calls back into the
//! clock to fold that counter into the tick base.

use crate::HalResult;

/// Free-running, resettable microsecond counter
pub trait MicrosTimer {
    /// Start counting from zero
    fn start(&mut self) -> HalResult<()>;

    /// Microseconds elapsed since the last start or reset
    fn elapsed_us(&self) -> u32;

    /// Reset the counter to zero without stopping it
    fn reset(&mut self);

    /// Longest rebase period, in microseconds, this counter can span
    /// before its own register wraps
    fn max_interval_us(&self) -> u32 {
        u32::MAX
    }
}

/// Periodic interrupt facility driving the clock's rebase.
///
/// Implementations route every expiry to `Clock::rebase` on the clock that
/// armed them.
pub trait PeriodicTicker {
    /// Start firing every `period_us` microseconds
    fn arm(&mut self, period_us: u32) -> HalResult<()>;
}
