//! Wall-clock access behind a trait so time-gated policies stay testable.

use std::sync::Mutex;

use chrono::{DateTime, Duration, Local, Timelike, Utc};

/// Source of "now" for policies and cache staleness checks.
///
/// Production code uses [`SystemClock`]; tests inject a [`FixedClock`] to pin
/// the local hour or advance time by hand instead of depending on the real
/// wall clock.
pub trait Clock: Send + Sync {
    /// Current instant in UTC.
    fn now(&self) -> DateTime<Utc>;

    /// Current local wall-clock hour (0..=23).
    fn local_hour(&self) -> u32;
}

/// The system wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn local_hour(&self) -> u32 {
        Local::now().hour()
    }
}

/// Manually controlled clock.
///
/// Test support: time only moves when [`FixedClock::advance`] is called, and
/// the reported local hour is whatever the test sets.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
    hour: Mutex<u32>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>, local_hour: u32) -> Self {
        Self {
            now: Mutex::new(now),
            hour: Mutex::new(local_hour),
        }
    }

    /// Clock frozen at the real current instant, reporting the given hour.
    pub fn at_hour(local_hour: u32) -> Self {
        Self::new(Utc::now(), local_hour)
    }

    pub fn advance(&self, delta: Duration) {
        let mut now = match self.now.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *now += delta;
    }

    pub fn set_hour(&self, local_hour: u32) {
        let mut hour = match self.hour.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *hour = local_hour;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        match self.now.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    fn local_hour(&self) -> u32 {
        match self.hour.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}
