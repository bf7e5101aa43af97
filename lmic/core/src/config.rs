//! Clock configuration

use crate::{HalError, HalResult, Ticks};

/// Default rebase period: fold the hardware counter into the tick base every 10 s
pub const DEFAULT_REBASE_INTERVAL_US: u32 = 10_000_000;

/// Longest rebase period accepted.
///
/// Hardware microsecond counters are commonly read as signed 32-bit values,
/// so the register must be folded before it reaches 2^31 µs (~35.8 min).
pub const MAX_REBASE_INTERVAL_US: u32 = i32::MAX as u32;

/// Configuration for the tick clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockConfig {
    /// Period of the rebase interrupt in microseconds
    pub rebase_interval_us: u32,
}

impl ClockConfig {
    /// Default configuration, usable in `const` contexts
    pub const DEFAULT: Self = Self {
        rebase_interval_us: DEFAULT_REBASE_INTERVAL_US,
    };

    /// Creates a new clock configuration builder.
    pub fn builder() -> ClockConfigBuilder {
        ClockConfigBuilder::default()
    }

    /// Checks that the rebase period is non-zero and short enough to keep the
    /// hardware register away from its own overflow.
    pub fn validate(&self) -> HalResult<()> {
        if self.rebase_interval_us == 0 || self.rebase_interval_us > MAX_REBASE_INTERVAL_US {
            return Err(HalError::InvalidConfig);
        }
        Ok(())
    }

    /// Rebase period expressed in ticks
    pub const fn rebase_interval_ticks(&self) -> Ticks {
        Ticks::from_micros(self.rebase_interval_us)
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ClockConfig {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "ClockConfig {{ rebase_interval_us: {} }}", self.rebase_interval_us);
    }
}

/// Builder for ergonomic clock configuration construction.
#[derive(Debug, Clone, Default)]
pub struct ClockConfigBuilder {
    config: ClockConfig,
}

impl ClockConfigBuilder {
    /// Sets the rebase period in microseconds.
    pub fn rebase_interval_us(mut self, us: u32) -> Self {
        self.config.rebase_interval_us = us;
        self
    }

    /// Sets the rebase period in milliseconds, saturating on overflow.
    pub fn rebase_interval_ms(mut self, ms: u32) -> Self {
        self.config.rebase_interval_us = ms.saturating_mul(1_000);
        self
    }

    /// Builds the clock configuration.
    pub fn build(self) -> ClockConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_ten_seconds() {
        let config = ClockConfig::default();
        assert_eq!(config.rebase_interval_us, 10_000_000);
        assert_eq!(config.rebase_interval_ticks(), Ticks::new(156_250));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_zero_and_oversized_intervals() {
        let zero = ClockConfig::builder().rebase_interval_us(0).build();
        assert_eq!(zero.validate(), Err(HalError::InvalidConfig));

        let huge = ClockConfig::builder().rebase_interval_ms(u32::MAX).build();
        assert_eq!(huge.rebase_interval_us, u32::MAX);
        assert_eq!(huge.validate(), Err(HalError::InvalidConfig));

        let edge = ClockConfig::builder()
            .rebase_interval_us(MAX_REBASE_INTERVAL_US)
            .build();
        assert!(edge.validate().is_ok());
    }
}
