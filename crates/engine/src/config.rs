//! Engine tunables.

use std::time::Duration;

/// Knobs for a [`crate::ProductEngine`].
///
/// Values arrive from the embedding application (environment, flags); the
/// engine itself never reads the environment. Defaults: maintenance at
/// 15:00, ten-minute cache staleness window, five-second mutation gate
/// wait, two-second slow-operation threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Local wall-clock hour during which the details view is refused.
    pub maintenance_hour: u32,

    /// How long a cached query result stays servable.
    pub cache_ttl: chrono::Duration,

    /// Longest a mutation waits for the gate before timing out.
    pub gate_wait: Duration,

    /// Operations slower than this are logged as slow.
    pub slow_op_threshold: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            maintenance_hour: 15,
            cache_ttl: chrono::Duration::seconds(600),
            gate_wait: Duration::from_secs(5),
            slow_op_threshold: Duration::from_secs(2),
        }
    }
}
