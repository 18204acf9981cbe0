use core::time::Duration;

use crate::platform;

/// Microseconds since boot.
pub type Timestamp = u64;

/// Read the monotonic microsecond timer.
#[inline]
pub fn now_us() -> Timestamp {
    platform::get().now_us()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Instant {
    us: Timestamp,
}

impl Instant {
    pub fn now() -> Self {
        Self { us: now_us() }
    }

    pub const fn from_micros(us: Timestamp) -> Self {
        Self { us }
    }

    pub const fn as_micros(&self) -> Timestamp {
        self.us
    }

    /// Time from `earlier` to `self`, zero if `earlier` is actually later.
    pub fn duration_since(&self, earlier: Self) -> Duration {
        Duration::from_micros(self.us.saturating_sub(earlier.us))
    }

    pub fn elapsed(&self) -> Duration {
        Self::now().duration_since(*self)
    }

    pub fn checked_add(&self, d: Duration) -> Option<Self> {
        let us = u64::try_from(d.as_micros()).ok()?;
        Some(Self { us: self.us.checked_add(us)? })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_saturates() {
        let a = Instant::from_micros(1_000);
        let b = Instant::from_micros(3_500);
        assert_eq!(b.duration_since(a), Duration::from_micros(2_500));
        assert_eq!(a.duration_since(b), Duration::ZERO);
    }

    #[test]
    fn checked_add_overflows_to_none() {
        let a = Instant::from_micros(u64::MAX - 1);
        assert_eq!(a.checked_add(Duration::from_micros(1)), Some(Instant::from_micros(u64::MAX)));
        assert_eq!(a.checked_add(Duration::from_micros(2)), None);
    }

    #[test]
    fn now_never_goes_backwards() {
        crate::testing::headless();
        let mut last = now_us();
        for _ in 0..1_000 {
            let t = now_us();
            assert!(t >= last);
            last = t;
        }
    }
}
