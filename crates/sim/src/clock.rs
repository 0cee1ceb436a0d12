//! Universal-time sources used to reconcile tick lengths.

use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic simulation time in seconds.
pub trait UniversalClock: Send + Sync {
    fn universal_time(&self) -> f64;
}

impl<F> UniversalClock for F
where
    F: Fn() -> f64 + Send + Sync,
{
    fn universal_time(&self) -> f64 {
        self()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedClock(pub f64);

impl UniversalClock for FixedClock {
    fn universal_time(&self) -> f64 {
        self.0
    }
}

/// Clock advanced explicitly by the driver, e.g. a replay loop or a test.
#[derive(Debug, Default)]
pub struct ManualClock {
    bits: AtomicU64,
}

impl ManualClock {
    pub fn new(start: f64) -> Self {
        Self {
            bits: AtomicU64::new(start.to_bits()),
        }
    }

    pub fn now(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Relaxed))
    }

    pub fn set(&self, time: f64) {
        self.bits.store(time.to_bits(), Ordering::Relaxed);
    }

    pub fn advance(&self, seconds: f64) {
        self.set(self.now() + seconds);
    }
}

impl UniversalClock for ManualClock {
    fn universal_time(&self) -> f64 {
        self.now()
    }
}

/// Wall-clock UTC seconds since the Unix epoch.
#[derive(Debug, Clone, Copy, Default)]
pub struct WallClock;

impl UniversalClock for WallClock {
    fn universal_time(&self) -> f64 {
        chrono::Utc::now().timestamp_micros() as f64 / 1.0e6
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_accumulates() {
        let clock = ManualClock::new(10.0);
        clock.advance(0.5);
        clock.advance(0.25);
        assert_eq!(clock.universal_time(), 10.75);
        clock.set(3.0);
        assert_eq!(clock.now(), 3.0);
    }

    #[test]
    fn closures_and_fixed_clocks_report_time() {
        let closure = || 42.0;
        assert_eq!(closure.universal_time(), 42.0);
        assert_eq!(FixedClock(7.5).universal_time(), 7.5);
    }

    #[test]
    fn wall_clock_is_past_2020() {
        assert!(WallClock.universal_time() > 1_577_836_800.0);
    }
}
