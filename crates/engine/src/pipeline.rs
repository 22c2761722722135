//! Named-stage operation pipeline.
//!
//! Every engine operation runs as an ordered chain of named stages
//! (`validate`, `authorize`, `rule-check`, `execute`, ...), each a plain
//! closure threaded through [`Pipeline::stage`] with `?` at the call site.
//! One tracing span covers the whole operation, each stage logs its own
//! outcome and duration, and dropping the pipeline emits a warning when the
//! operation overran the configured slow threshold. What runs, and in which
//! order, is spelled out where the operation is written; there is no
//! implicit interception.

use std::time::{Duration, Instant};

/// Timing and logging context for one operation run.
pub struct Pipeline {
    operation: &'static str,
    started: Instant,
    slow_after: Duration,
    span: tracing::Span,
}

impl Pipeline {
    pub fn start(operation: &'static str, slow_after: Duration) -> Self {
        let span = tracing::info_span!("operation", name = operation);
        Self {
            operation,
            started: Instant::now(),
            slow_after,
            span,
        }
    }

    /// Run one named stage. The stage's error is returned untouched;
    /// callers chain stages with `?`.
    pub fn stage<T, E: std::fmt::Display>(
        &self,
        name: &'static str,
        body: impl FnOnce() -> Result<T, E>,
    ) -> Result<T, E> {
        let _guard = self.span.enter();
        let stage_started = Instant::now();
        match body() {
            Ok(value) => {
                tracing::debug!(
                    stage = name,
                    elapsed_ms = stage_started.elapsed().as_millis() as u64,
                    "stage complete"
                );
                Ok(value)
            }
            Err(err) => {
                tracing::debug!(stage = name, outcome = %err, "stage rejected");
                Err(err)
            }
        }
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        let elapsed = self.started.elapsed();
        if elapsed > self.slow_after {
            tracing::warn!(
                operation = self.operation,
                elapsed_ms = elapsed.as_millis() as u64,
                threshold_ms = self.slow_after.as_millis() as u64,
                "operation exceeded slow threshold"
            );
        } else {
            tracing::trace!(
                operation = self.operation,
                elapsed_ms = elapsed.as_millis() as u64,
                "operation finished"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pipeline() -> Pipeline {
        Pipeline::start("test_operation", Duration::from_secs(2))
    }

    #[test]
    fn stages_thread_values_through() {
        let run = pipeline();
        let out: Result<u32, &str> = (|| {
            let a = run.stage("first", || Ok::<_, &str>(20))?;
            let b = run.stage("second", || Ok::<_, &str>(a + 2))?;
            Ok(b * 2)
        })();
        assert_eq!(out, Ok(44));
    }

    #[test]
    fn a_rejecting_stage_stops_the_chain() {
        let run = pipeline();
        let mut later_ran = false;
        let out: Result<(), &str> = (|| {
            run.stage("first", || Err("rejected"))?;
            later_ran = true;
            run.stage("second", || Ok(()))
        })();
        assert_eq!(out, Err("rejected"));
        assert!(!later_ran);
    }
}
