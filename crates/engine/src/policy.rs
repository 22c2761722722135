//! Time-gated availability policy.

use tradegate_core::Clock;

/// Simulated nightly maintenance window for the details view.
///
/// While the local wall-clock hour equals the configured hour, the joined
/// details query is refused with a business failure instead of running.
/// The hour comes from configuration; the time comes from an injected
/// [`Clock`], so tests pin it instead of waiting for 15:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaintenanceWindow {
    hour: u32,
}

impl MaintenanceWindow {
    pub fn at_hour(hour: u32) -> Self {
        Self { hour }
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    /// True while the clock sits inside the window.
    pub fn denies(&self, clock: &dyn Clock) -> bool {
        clock.local_hour() == self.hour
    }
}
