#![forbid(unsafe_code)]

//! Microsecond-resolution time values.
//!
//! [`Timer`] is the deadline currency of the whole display stack: every
//! scheduled redraw, every pacing interval, and every tie-break compares
//! these values. It is a plain signed microsecond count since the Unix
//! epoch. Only differences and ordering are meaningful; the epoch itself
//! is arbitrary.
//!
//! All arithmetic saturates so that [`Timer::NEVER`] stays a fixed point
//! under addition.

use std::fmt;
use std::ops::{Add, Div, Mul, Sub};
use std::time::{SystemTime, UNIX_EPOCH};

const USEC_PER_MSEC: i64 = 1_000;
const USEC_PER_SEC: i64 = 1_000_000;
const USEC_PER_MIN: i64 = 60 * USEC_PER_SEC;

/// A point in time (or a span between two points) in microseconds.
///
/// Value-typed and immutable; operations return new values. The only
/// environment-touching call is [`Timer::now`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timer(i64);

impl Timer {
    /// The zero point.
    pub const ZERO: Timer = Timer(0);

    /// Largest representable value, used as "never fires".
    pub const NEVER: Timer = Timer(i64::MAX);

    /// Construct from a raw microsecond count.
    #[inline]
    pub const fn from_micros(us: i64) -> Self {
        Timer(us)
    }

    /// Construct from milliseconds.
    #[inline]
    pub const fn from_millis(ms: i64) -> Self {
        Timer(ms.saturating_mul(USEC_PER_MSEC))
    }

    /// Construct from whole seconds.
    #[inline]
    pub const fn from_seconds(s: i64) -> Self {
        Timer(s.saturating_mul(USEC_PER_SEC))
    }

    /// Construct from whole minutes.
    #[inline]
    pub const fn from_minutes(m: i64) -> Self {
        Timer(m.saturating_mul(USEC_PER_MIN))
    }

    /// Capture the wall clock.
    ///
    /// Clocks set before the Unix epoch degrade to [`Timer::ZERO`] rather
    /// than failing; callers never see an error from time capture.
    pub fn now() -> Self {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(d) => Timer(i64::try_from(d.as_micros()).unwrap_or(i64::MAX)),
            Err(_) => Timer::ZERO,
        }
    }

    /// Raw microsecond count.
    #[inline]
    pub const fn as_micros(self) -> i64 {
        self.0
    }

    /// Whole milliseconds, truncated toward negative infinity.
    #[inline]
    pub const fn as_millis(self) -> i64 {
        self.0.div_euclid(USEC_PER_MSEC)
    }

    /// Whole seconds, truncated toward negative infinity.
    #[inline]
    pub const fn as_secs(self) -> i64 {
        self.0.div_euclid(USEC_PER_SEC)
    }

    /// Truncate down to a whole-second boundary.
    #[inline]
    pub const fn floor_secs(self) -> Timer {
        Timer(self.0.div_euclid(USEC_PER_SEC) * USEC_PER_SEC)
    }

    /// Round up to a whole-second boundary.
    ///
    /// A value already on a boundary is returned unchanged.
    #[inline]
    pub const fn ceil_secs(self) -> Timer {
        let floor = self.floor_secs();
        if floor.0 == self.0 {
            self
        } else {
            Timer(floor.0.saturating_add(USEC_PER_SEC))
        }
    }

    /// Whether this is the [`Timer::NEVER`] sentinel.
    #[inline]
    pub const fn is_never(self) -> bool {
        self.0 == i64::MAX
    }

    /// Saturating difference, clamped at zero.
    ///
    /// Handy for "time remaining until deadline" where the deadline may
    /// already have passed.
    #[inline]
    pub const fn saturating_since(self, earlier: Timer) -> Timer {
        let d = self.0.saturating_sub(earlier.0);
        if d < 0 { Timer::ZERO } else { Timer(d) }
    }
}

impl Add for Timer {
    type Output = Timer;

    #[inline]
    fn add(self, rhs: Timer) -> Timer {
        Timer(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Timer {
    type Output = Timer;

    #[inline]
    fn sub(self, rhs: Timer) -> Timer {
        Timer(self.0.saturating_sub(rhs.0))
    }
}

impl Mul<i64> for Timer {
    type Output = Timer;

    #[inline]
    fn mul(self, rhs: i64) -> Timer {
        Timer(self.0.saturating_mul(rhs))
    }
}

impl Div<i64> for Timer {
    type Output = Timer;

    #[inline]
    fn div(self, rhs: i64) -> Timer {
        Timer(self.0 / rhs)
    }
}

impl fmt::Debug for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_never() {
            write!(f, "Timer(NEVER)")
        } else {
            write!(f, "Timer({}us)", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Timer;

    #[test]
    fn constructors_agree() {
        assert_eq!(Timer::from_millis(1), Timer::from_micros(1_000));
        assert_eq!(Timer::from_seconds(2), Timer::from_millis(2_000));
        assert_eq!(Timer::from_minutes(1), Timer::from_seconds(60));
    }

    #[test]
    fn ordering_is_total() {
        let a = Timer::from_micros(10);
        let b = Timer::from_micros(20);
        assert!(a < b);
        assert!(b < Timer::NEVER);
        assert_eq!(a.max(b), b);
    }

    #[test]
    fn arithmetic_round_trips() {
        let t = Timer::from_seconds(3) + Timer::from_millis(500);
        assert_eq!(t.as_micros(), 3_500_000);
        assert_eq!((t - Timer::from_millis(500)).as_secs(), 3);
        assert_eq!((Timer::from_seconds(1) * 3).as_secs(), 3);
        assert_eq!((Timer::from_seconds(3) / 3).as_secs(), 1);
    }

    #[test]
    fn never_saturates() {
        assert_eq!(Timer::NEVER + Timer::from_seconds(1), Timer::NEVER);
        assert!((Timer::NEVER - Timer::from_micros(1)) < Timer::NEVER);
    }

    #[test]
    fn floor_and_ceil_seconds() {
        let t = Timer::from_micros(2_400_000);
        assert_eq!(t.floor_secs(), Timer::from_seconds(2));
        assert_eq!(t.ceil_secs(), Timer::from_seconds(3));

        let exact = Timer::from_seconds(5);
        assert_eq!(exact.floor_secs(), exact);
        assert_eq!(exact.ceil_secs(), exact);
    }

    #[test]
    fn saturating_since_clamps() {
        let early = Timer::from_seconds(1);
        let late = Timer::from_seconds(2);
        assert_eq!(late.saturating_since(early), Timer::from_seconds(1));
        assert_eq!(early.saturating_since(late), Timer::ZERO);
    }
}
