//! Retry schedule with additive jitter.

use herald_core::PublishConfig;
use rand::Rng;
use std::time::Duration;

/// When to retry a throttled call.
///
/// Retry `n` waits `schedule[n] + U(0, max_jitter)`. Once the schedule runs
/// out the last error is returned.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct BackoffPolicy {
    /// Base wait before each retry, in order
    schedule: Vec<Duration>,
    /// Upper bound of the random extra wait
    max_jitter: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::from_config(&PublishConfig::default())
    }
}

impl BackoffPolicy {
    /// Create a policy from an explicit schedule.
    pub fn new(schedule: Vec<Duration>, max_jitter: Duration) -> Self {
        Self {
            schedule,
            max_jitter,
        }
    }

    /// Create a policy from the `[publish]` configuration section.
    pub fn from_config(config: &PublishConfig) -> Self {
        Self::new(config.backoff_schedule(), config.max_jitter())
    }

    /// A policy that never retries.
    pub fn none() -> Self {
        Self::new(Vec::new(), Duration::ZERO)
    }

    /// Number of retries after the first attempt.
    pub fn max_retries(&self) -> usize {
        self.schedule.len()
    }

    /// Longest total time a fully exhausted schedule can wait.
    pub fn max_total_wait(&self) -> Duration {
        self.schedule
            .iter()
            .map(|delay| *delay + self.max_jitter)
            .sum()
    }

    /// Jittered waits, one per retry.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + use<> {
        let max_jitter_ms = u64::try_from(self.max_jitter.as_millis()).unwrap_or(u64::MAX);
        self.schedule
            .clone()
            .into_iter()
            .map(move |base| base + jitter(max_jitter_ms))
    }
}

fn jitter(max_ms: u64) -> Duration {
    if max_ms == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(rand::thread_rng().gen_range(0..=max_ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delays_stay_within_jitter_bounds() {
        let policy = BackoffPolicy::default();
        let base = policy.schedule().clone();

        for _ in 0..50 {
            let delays: Vec<Duration> = policy.delays().collect();
            assert_eq!(delays.len(), 4);
            for (delay, base) in delays.iter().zip(&base) {
                assert!(*delay >= *base);
                assert!(*delay <= *base + Duration::from_millis(5_000));
            }
        }
    }

    #[test]
    fn default_schedule_escalates() {
        let policy = BackoffPolicy::default();
        let secs: Vec<u64> = policy.schedule().iter().map(|d| d.as_secs()).collect();
        assert_eq!(secs, vec![30, 60, 120, 240]);
        assert_eq!(policy.max_retries(), 4);
        assert_eq!(policy.max_total_wait(), Duration::from_secs(470));
    }

    #[test]
    fn zero_jitter_is_exact() {
        let policy = BackoffPolicy::new(vec![Duration::from_secs(1)], Duration::ZERO);
        let delays: Vec<Duration> = policy.delays().collect();
        assert_eq!(delays, vec![Duration::from_secs(1)]);
        assert_eq!(BackoffPolicy::none().delays().count(), 0);
    }
}
