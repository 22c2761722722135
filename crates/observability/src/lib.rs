//! Tracing/logging setup shared by every binary.

/// Tracing configuration (filter, format).
pub mod tracing;

/// Initialize process-wide observability.
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}
