//! Periodic rebase interrupt for POSIX hosts
//!
//! A dedicated thread plays the role of the hardware ticker. It sleeps until
//! the next absolute deadline rather than for a relative period, so handler
//! run time does not accumulate as drift.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use lmic_hal_core::{HalError, HalResult, MicrosTimer, PeriodicTicker};
use lmic_hal_sync::InterruptMask;
use lmic_hal_time::Clock;

use crate::PortError;

/// Default name of the ticker thread
pub const DEFAULT_TICKER_NAME: &str = "lmic-rebase";

type Handler = Arc<dyn Fn() + Send + Sync>;

/// Runs a handler on its own thread at a fixed period
pub struct ThreadTicker {
    handler: Handler,
    name: String,
    running: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl ThreadTicker {
    /// Ticker calling `handler` on every expiry
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            handler: Arc::new(handler),
            name: DEFAULT_TICKER_NAME.to_string(),
            running: Arc::new(AtomicBool::new(false)),
            thread: None,
        }
    }

    /// Ticker delivering rebases to `clock`
    pub fn for_clock<T, M>(clock: Arc<Clock<T, M>>) -> Self
    where
        T: MicrosTimer + Send + 'static,
        M: InterruptMask + Send + 'static,
    {
        Self::new(move || clock.rebase())
    }

    /// Set the thread name used by the next `arm`
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Stop the ticker thread and wait for it to exit.
    ///
    /// Deadlocks if called while holding a critical section the handler
    /// needs: the thread may be blocked inside it. Use [`detach`](Self::detach)
    /// there instead.
    pub fn stop(&mut self) -> Result<(), PortError> {
        self.running.store(false, Ordering::Release);

        let Some(handle) = self.thread.take() else {
            return Ok(());
        };
        handle.thread().unpark();
        handle.join().map_err(|_| PortError::TickerPanicked)?;
        log::debug!("{} stopped", self.name);
        Ok(())
    }

    /// Signal the ticker thread to exit without waiting for it.
    ///
    /// A handler already in progress still runs to completion.
    pub fn detach(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.thread.take() {
            handle.thread().unpark();
            log::debug!("{} detached", self.name);
        }
    }
}

impl PeriodicTicker for ThreadTicker {
    /// Start firing every `period_us`; re-arming replaces the previous period.
    fn arm(&mut self, period_us: u32) -> HalResult<()> {
        if period_us == 0 {
            return Err(HalError::InvalidConfig);
        }
        if self.thread.is_some() {
            self.stop().map_err(|_| HalError::TimerFault)?;
        }

        let period = Duration::from_micros(u64::from(period_us));
        let running = Arc::clone(&self.running);
        let handler = Arc::clone(&self.handler);
        running.store(true, Ordering::Release);

        let spawned = thread::Builder::new()
            .name(self.name.clone())
            .spawn(move || ticker_thread(period, running, handler));

        match spawned {
            Ok(handle) => {
                log::debug!("{} armed every {:?}", self.name, period);
                self.thread = Some(handle);
                Ok(())
            }
            Err(err) => {
                self.running.store(false, Ordering::Release);
                log::error!("failed to spawn {}: {}", self.name, err);
                Err(HalError::TimerFault)
            }
        }
    }
}

impl Drop for ThreadTicker {
    fn drop(&mut self) {
        if let Err(err) = self.stop() {
            log::warn!("{}", err);
        }
    }
}

fn ticker_thread(period: Duration, running: Arc<AtomicBool>, handler: Handler) {
    let mut next_tick = Instant::now();

    loop {
        next_tick += period;

        // park instead of sleep so `stop` does not wait out a long period
        loop {
            if !running.load(Ordering::Acquire) {
                return;
            }
            let now = Instant::now();
            if now >= next_tick {
                break;
            }
            thread::park_timeout(next_tick - now);
        }

        handler();
    }
}

/// Ticker that only records the armed period; tests fire it by hand
pub struct ManualTicker {
    handler: Handler,
    period_us: Option<u32>,
    fired: AtomicUsize,
}

impl ManualTicker {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            handler: Arc::new(handler),
            period_us: None,
            fired: AtomicUsize::new(0),
        }
    }

    pub fn for_clock<T, M>(clock: Arc<Clock<T, M>>) -> Self
    where
        T: MicrosTimer + Send + 'static,
        M: InterruptMask + Send + 'static,
    {
        Self::new(move || clock.rebase())
    }

    /// Deliver one expiry
    pub fn fire(&self) {
        self.fired.fetch_add(1, Ordering::Relaxed);
        (self.handler)();
    }

    pub fn period_us(&self) -> Option<u32> {
        self.period_us
    }

    pub fn fired(&self) -> usize {
        self.fired.load(Ordering::Relaxed)
    }
}

impl PeriodicTicker for ManualTicker {
    fn arm(&mut self, period_us: u32) -> HalResult<()> {
        self.period_us = Some(period_us);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thread_ticker_fires_periodically() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut ticker = {
            let count = Arc::clone(&count);
            ThreadTicker::new(move || {
                count.fetch_add(1, Ordering::SeqCst);
            })
        };

        ticker.arm(10_000).unwrap();
        assert!(ticker.is_running());
        thread::sleep(Duration::from_millis(100));
        ticker.stop().unwrap();
        assert!(!ticker.is_running());

        let fired = count.load(Ordering::SeqCst);
        // ~10 expiries, with slack for scheduler jitter
        assert!((5..=12).contains(&fired), "expected ~10 ticks, got {fired}");

        thread::sleep(Duration::from_millis(30));
        assert_eq!(count.load(Ordering::SeqCst), fired);
    }

    #[test]
    fn stop_does_not_wait_out_long_period() {
        let mut ticker = ThreadTicker::new(|| {}).with_name("long-period");
        ticker.arm(10_000_000).unwrap();

        let started = Instant::now();
        ticker.stop().unwrap();
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn zero_period_is_rejected() {
        let mut ticker = ThreadTicker::new(|| {});
        assert_eq!(ticker.arm(0), Err(HalError::InvalidConfig));
        assert!(!ticker.is_running());
    }

    #[test]
    fn panicking_handler_is_reported() {
        let mut ticker = ThreadTicker::new(|| panic!("handler failed"));
        ticker.arm(1_000).unwrap();
        thread::sleep(Duration::from_millis(20));
        assert!(matches!(ticker.stop(), Err(PortError::TickerPanicked)));
    }

    #[test]
    fn detach_returns_while_handler_is_blocked() {
        let gate = Arc::new(parking_lot::Mutex::new(()));
        let ran = Arc::new(AtomicUsize::new(0));
        let mut ticker = {
            let gate = Arc::clone(&gate);
            let ran = Arc::clone(&ran);
            ThreadTicker::new(move || {
                let _held = gate.lock();
                ran.fetch_add(1, Ordering::SeqCst);
            })
        };

        let held = gate.lock();
        ticker.arm(1_000).unwrap();
        thread::sleep(Duration::from_millis(10));

        let started = Instant::now();
        ticker.detach();
        assert!(started.elapsed() < Duration::from_millis(100));
        assert!(!ticker.is_running());

        drop(held);
        thread::sleep(Duration::from_millis(20));
        let settled = ran.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(20));
        assert_eq!(ran.load(Ordering::SeqCst), settled);
        assert!(settled <= 1);
    }

    #[test]
    fn manual_ticker_records_period_and_fires() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut ticker = {
            let count = Arc::clone(&count);
            ManualTicker::new(move || {
                count.fetch_add(1, Ordering::SeqCst);
            })
        };

        ticker.arm(250_000).unwrap();
        assert_eq!(ticker.period_us(), Some(250_000));
        ticker.fire();
        ticker.fire();
        assert_eq!(ticker.fired(), 2);
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }
}
