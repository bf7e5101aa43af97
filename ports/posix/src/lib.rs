//! POSIX port of the LMIC HAL.
//!
//! Runs the tick clock on a Linux/Unix host. Hardware is replaced piece by
//! piece: the microsecond register by [`HostTimer`], the global interrupt mask
//! by [`HostInterrupts`] and the periodic rebase interrupt by a
//! [`ThreadTicker`] thread. [`PosixHal`] wires the three together.
//!
//! ```no_run
//! use lmic_hal_posix::{PortConfig, PosixHal};
//!
//! let mut hal = PosixHal::start(PortConfig::default())?;
//! let clock = hal.clock();
//! let target = clock.now() + 100;
//! clock.wait_until(target);
//! hal.shutdown()?;
//! # Ok::<(), lmic_hal_posix::PortError>(())
//! ```

pub mod debug;
pub mod interrupts;
pub mod ticker;
pub mod timer;

use std::sync::Arc;
use std::thread;

use lmic_hal_core::{ClockConfig, HalError};
use lmic_hal_time::Clock;

pub use debug::{stderr_log, FmtLineWriter, HostDebugLog, StderrWriter};
pub use interrupts::HostInterrupts;
pub use ticker::{ManualTicker, ThreadTicker, DEFAULT_TICKER_NAME};
pub use timer::{HostTimer, SimTimeHandle, SimTimer};

/// Tick clock driven by the host's monotonic clock
pub type HostClock = Clock<HostTimer, HostInterrupts>;

/// Errors raised by the POSIX port
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("clock initialisation failed: {0}")]
    Hal(#[from] HalError),
    #[error("rebase ticker thread panicked")]
    TickerPanicked,
    #[error("cannot join the rebase ticker from inside a critical section")]
    InsideCriticalSection,
}

/// Configuration for [`PosixHal::start`]
#[derive(Debug, Clone)]
pub struct PortConfig {
    pub clock: ClockConfig,
    pub ticker_name: &'static str,
}

impl PortConfig {
    pub fn with_clock(mut self, clock: ClockConfig) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_ticker_name(mut self, name: &'static str) -> Self {
        self.ticker_name = name;
        self
    }
}

impl Default for PortConfig {
    fn default() -> Self {
        Self {
            clock: ClockConfig::DEFAULT,
            ticker_name: DEFAULT_TICKER_NAME,
        }
    }
}

/// Running host HAL: a started clock and its rebase thread
pub struct PosixHal {
    clock: Arc<HostClock>,
    ticker: ThreadTicker,
}

impl PosixHal {
    /// Build the clock, start it and arm the rebase thread
    pub fn start(config: PortConfig) -> Result<Self, PortError> {
        let clock = Arc::new(HostClock::new(
            HostTimer::new(),
            HostInterrupts::new(),
            config.clock,
        ));
        let mut ticker =
            ThreadTicker::for_clock(Arc::clone(&clock)).with_name(config.ticker_name);

        clock.init(&mut ticker)?;
        log::info!("posix HAL started");

        Ok(Self { clock, ticker })
    }

    /// Shared handle to the running clock
    pub fn clock(&self) -> Arc<HostClock> {
        Arc::clone(&self.clock)
    }

    /// Stop the rebase thread and wait for it to exit. The clock keeps
    /// counting but is no longer rebased, so its hardware register will
    /// eventually wrap.
    ///
    /// Called from inside one of the clock's critical sections, the rebase
    /// thread may be blocked on that section and cannot be joined: the thread
    /// is detached and `InsideCriticalSection` returned.
    pub fn shutdown(mut self) -> Result<(), PortError> {
        if self.holds_section() {
            self.ticker.detach();
            return Err(PortError::InsideCriticalSection);
        }
        self.ticker.stop()?;
        log::info!("posix HAL stopped");
        Ok(())
    }

    fn holds_section(&self) -> bool {
        self.clock.arbiter().mask().owner() == Some(thread::current().id())
    }
}

impl Drop for PosixHal {
    fn drop(&mut self) {
        if self.holds_section() {
            log::warn!("posix HAL dropped inside a critical section, detaching ticker");
            self.ticker.detach();
        }
    }
}
