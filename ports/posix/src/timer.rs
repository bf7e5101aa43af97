//! Microsecond counters for POSIX hosts

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Instant;

use lmic_hal_core::{HalResult, MicrosTimer};

/// Microsecond counter backed by the monotonic clock.
///
/// Like a 32-bit hardware register it wraps after ~71.6 minutes; the clock's
/// rebase keeps it well below that.
#[derive(Debug, Default)]
pub struct HostTimer {
    origin: Option<Instant>,
}

impl HostTimer {
    pub const fn new() -> Self {
        Self { origin: None }
    }
}

impl MicrosTimer for HostTimer {
    fn start(&mut self) -> HalResult<()> {
        self.origin = Some(Instant::now());
        Ok(())
    }

    fn elapsed_us(&self) -> u32 {
        match self.origin {
            Some(origin) => origin.elapsed().as_micros() as u32,
            None => 0,
        }
    }

    fn reset(&mut self) {
        self.origin = Some(Instant::now());
    }
}

/// Simulated counter whose time only moves when a [`SimTimeHandle`] says so
#[derive(Debug)]
pub struct SimTimer {
    wall_us: Arc<AtomicU32>,
    origin_us: u32,
    running: bool,
}

/// Test-side control of a [`SimTimer`]
#[derive(Debug, Clone)]
pub struct SimTimeHandle {
    wall_us: Arc<AtomicU32>,
}

impl SimTimer {
    /// Create a stopped simulated counter and the handle that drives it
    pub fn with_handle() -> (Self, SimTimeHandle) {
        let wall_us = Arc::new(AtomicU32::new(0));
        let timer = Self {
            wall_us: Arc::clone(&wall_us),
            origin_us: 0,
            running: false,
        };
        (timer, SimTimeHandle { wall_us })
    }
}

impl MicrosTimer for SimTimer {
    fn start(&mut self) -> HalResult<()> {
        self.origin_us = self.wall_us.load(Ordering::SeqCst);
        self.running = true;
        Ok(())
    }

    fn elapsed_us(&self) -> u32 {
        if !self.running {
            return 0;
        }
        self.wall_us.load(Ordering::SeqCst).wrapping_sub(self.origin_us)
    }

    fn reset(&mut self) {
        self.origin_us = self.wall_us.load(Ordering::SeqCst);
    }
}

impl SimTimeHandle {
    /// Let `us` microseconds of simulated time pass
    pub fn advance_us(&self, us: u32) {
        self.wall_us.fetch_add(us, Ordering::SeqCst);
    }

    /// Simulated microseconds since creation, wrapping at 2^32
    pub fn now_us(&self) -> u32 {
        self.wall_us.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn host_timer_counts_from_start_and_reset() {
        let mut timer = HostTimer::new();
        assert_eq!(timer.elapsed_us(), 0);

        timer.start().unwrap();
        thread::sleep(Duration::from_millis(5));
        assert!(timer.elapsed_us() >= 5_000);

        timer.reset();
        assert!(timer.elapsed_us() < 5_000);
    }

    #[test]
    fn sim_timer_follows_handle() {
        let (mut timer, time) = SimTimer::with_handle();
        time.advance_us(500);
        assert_eq!(timer.elapsed_us(), 0);

        timer.start().unwrap();
        time.advance_us(1_000);
        assert_eq!(timer.elapsed_us(), 1_000);

        timer.reset();
        assert_eq!(timer.elapsed_us(), 0);
        assert_eq!(time.now_us(), 1_500);
    }
}
