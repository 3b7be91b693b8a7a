//! Time source for non-blocking step scheduling.

use core::time::Duration;

/// Something which records the elapsed real time.
///
/// The driver only ever compares two readings, so any monotonic reference
/// point works (device startup, a hardware timer, the unix epoch).
pub trait SystemClock {
    /// Time passed since the clock's reference point.
    fn elapsed(&self) -> Duration;

    /// Elapsed time in whole microseconds.
    #[inline]
    fn now_us(&self) -> u64 {
        self.elapsed().as_micros() as u64
    }
}

impl<F> SystemClock for F
where
    F: Fn() -> Duration,
{
    fn elapsed(&self) -> Duration {
        self()
    }
}

/// A monotonically non-decreasing clock backed by the operating system.
#[cfg(feature = "std")]
#[derive(Debug, Clone, PartialEq)]
pub struct OperatingSystemClock {
    created_at: std::time::Instant,
}

#[cfg(feature = "std")]
impl OperatingSystemClock {
    /// Start a clock at the current instant.
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(feature = "std")]
impl Default for OperatingSystemClock {
    fn default() -> Self {
        Self {
            created_at: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl SystemClock for OperatingSystemClock {
    fn elapsed(&self) -> Duration {
        self.created_at.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    #[test]
    fn test_closure_clock() {
        let ticks = Cell::new(0u64);
        let clock = || {
            ticks.set(ticks.get() + 250);
            Duration::from_micros(ticks.get())
        };

        assert_eq!(clock.now_us(), 250);
        assert_eq!(clock.now_us(), 500);
    }

    #[test]
    fn test_os_clock_is_monotonic() {
        let clock = OperatingSystemClock::new();
        let a = clock.now_us();
        let b = clock.now_us();
        assert!(b >= a);
    }
}
