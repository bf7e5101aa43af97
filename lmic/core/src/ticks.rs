//! Tick arithmetic
//!
//! One tick is 64 µs: the hardware microsecond count shifted right by
//! [`TICK_SHIFT`]. Tick values are 32 bits wide and wrap silently, so ordering
//! between two ticks is only meaningful as a signed difference.

use core::fmt;
use core::ops::{Add, Sub};

/// Right shift applied to hardware microseconds to obtain ticks
pub const TICK_SHIFT: u32 = 6;

/// Microseconds per tick
pub const MICROS_PER_TICK: u32 = 1 << TICK_SHIFT;

/// Ticks per second (15 625)
pub const TICKS_PER_SEC: u32 = 1_000_000 / MICROS_PER_TICK;

/// Returned by [`delta_ticks`] when a deadline is beyond the 16-bit horizon
pub const FAR_FUTURE: u16 = 0xFFFF;

/// A deadline whose delta is below this many ticks counts as due
pub const DUE_WINDOW: u16 = 2;

/// A point on the 32-bit tick timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Ticks(u32);

impl Ticks {
    /// Zero tick
    pub const ZERO: Self = Self(0);

    /// Maximum tick value
    pub const MAX: Self = Self(u32::MAX);

    /// Create a tick value from a raw count
    pub const fn new(ticks: u32) -> Self {
        Self(ticks)
    }

    /// Get the raw tick value
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Convert hardware microseconds to ticks, truncating the sub-tick remainder
    pub const fn from_micros(us: u32) -> Self {
        Self(us >> TICK_SHIFT)
    }

    /// Convert milliseconds to ticks (truncating)
    pub const fn from_millis(ms: u32) -> Self {
        Self((ms as u64 * TICKS_PER_SEC as u64 / 1_000) as u32)
    }

    /// Convert seconds to ticks, wrapping past ~76 hours
    pub const fn from_secs(secs: u32) -> Self {
        Self(secs.wrapping_mul(TICKS_PER_SEC))
    }

    /// Microseconds represented by this tick count
    pub const fn as_micros(self) -> u64 {
        (self.0 as u64) << TICK_SHIFT
    }

    /// Advance by `ticks`, wrapping at 2^32
    pub const fn wrapping_add(self, ticks: u32) -> Self {
        Self(self.0.wrapping_add(ticks))
    }

    /// Step back by `ticks`, wrapping at zero
    pub const fn wrapping_sub(self, ticks: u32) -> Self {
        Self(self.0.wrapping_sub(ticks))
    }

    /// Signed distance from `earlier` to `self`.
    ///
    /// Correct across the wrap as long as the two points are less than 2^31
    /// ticks apart.
    pub const fn since(self, earlier: Ticks) -> i32 {
        self.0.wrapping_sub(earlier.0) as i32
    }

    /// True when `self` is at or past `other` on the wrapping timeline
    pub const fn has_reached(self, other: Ticks) -> bool {
        self.since(other) >= 0
    }
}

impl Add<u32> for Ticks {
    type Output = Ticks;

    fn add(self, rhs: u32) -> Ticks {
        self.wrapping_add(rhs)
    }
}

impl Sub<u32> for Ticks {
    type Output = Ticks;

    fn sub(self, rhs: u32) -> Ticks {
        self.wrapping_sub(rhs)
    }
}

impl From<u32> for Ticks {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<Ticks> for u32 {
    fn from(value: Ticks) -> Self {
        value.0
    }
}

impl fmt::Display for Ticks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tick:{}", self.0)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Ticks {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "tick:{}", self.0);
    }
}

/// Saturating distance from `now` to `target`.
///
/// - `0` when the deadline is due or already past
/// - [`FAR_FUTURE`] when the distance does not fit in 16 bits
/// - the exact distance otherwise
pub const fn delta_ticks(target: Ticks, now: Ticks) -> u16 {
    let d = target.since(now);
    if d <= 0 {
        0
    } else if (d >> 16) != 0 {
        FAR_FUTURE
    } else {
        d as u16
    }
}

/// True when `target` is due now or within the next tick
pub const fn is_due(target: Ticks, now: Ticks) -> bool {
    delta_ticks(target, now) < DUE_WINDOW
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_constants() {
        assert_eq!(MICROS_PER_TICK, 64);
        assert_eq!(TICKS_PER_SEC, 15_625);
    }

    #[test]
    fn delta_boundaries() {
        let now = Ticks::new(1_000);
        assert_eq!(delta_ticks(now, now), 0);
        assert_eq!(delta_ticks(now - 1, now), 0);
        assert_eq!(delta_ticks(now + 1, now), 1);
        assert_eq!(delta_ticks(now + 0xFFFF, now), 0xFFFF);
        assert_eq!(delta_ticks(now + 0x1_0000, now), FAR_FUTURE);
        assert_eq!(delta_ticks(now + 70_000, now), FAR_FUTURE);
    }

    #[test]
    fn delta_across_wrap() {
        let now = Ticks::MAX - 10;
        assert_eq!(delta_ticks(now + 100, now), 100);
        assert_eq!(delta_ticks(now - 100, now), 0);
    }

    #[test]
    fn half_range_counts_as_past() {
        let now = Ticks::ZERO;
        // 2^31 ahead reads as i32::MIN, i.e. in the past
        assert_eq!(delta_ticks(Ticks::new(0x8000_0000), now), 0);
        assert_eq!(delta_ticks(Ticks::new(0x7FFF_FFFF), now), FAR_FUTURE);
    }
}
