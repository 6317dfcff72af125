//! Scheduler configuration.

use std::time::Duration;

use crate::error::{Error, Result};

/// Tunables consumed by [`Scheduler::start`](crate::scheduler::Scheduler::start).
///
/// All values are fixed at startup; there is no mutation surface while the
/// scheduler is running. The defaults mirror the service this crate grew out
/// of: batches of four, a 50 ms collection window.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Upper bound on the number of tasks collected into one batch.
    pub max_batch_size: usize,

    /// How long a collection cycle waits for more tasks before executing
    /// whatever it has.
    pub max_wait: Duration,

    /// Upper bound on blocking-pool threads used for engine invocations.
    ///
    /// Batches execute strictly sequentially today, so this is effectively a
    /// ceiling of one in-flight invocation; engines that can take more than
    /// one job at a time would raise it.
    pub executor_threads: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_batch_size: 4,
            max_wait: Duration::from_millis(50),
            executor_threads: 1,
        }
    }
}

impl SchedulerConfig {
    /// Checks the invariants the scheduler relies on.
    pub fn validate(&self) -> Result<()> {
        if self.max_batch_size == 0 {
            return Err(Error::InvalidRequest(
                "max_batch_size must be positive".into(),
            ));
        }
        if self.executor_threads == 0 {
            return Err(Error::InvalidRequest(
                "executor_threads must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Capacity of the bounded intake queue.
    ///
    /// A few batches worth of headroom so submission only feels backpressure
    /// under sustained overload.
    pub(crate) fn intake_capacity(&self) -> usize {
        self.max_batch_size * 4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SchedulerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_batch_size, 4);
        assert_eq!(config.max_wait, Duration::from_millis(50));
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        let config = SchedulerConfig {
            max_batch_size: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidRequest(_))));
    }

    #[test]
    fn zero_executor_threads_is_rejected() {
        let config = SchedulerConfig {
            executor_threads: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidRequest(_))));
    }
}
