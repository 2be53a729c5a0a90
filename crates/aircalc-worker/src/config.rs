//! Worker configuration from environment.

use std::env;
use std::time::Duration;

const DEFAULT_QUEUE_CAPACITY: usize = 8;
const DEFAULT_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Bound on queued requests (and on undelivered responses)
    pub queue_capacity: usize,
    /// How long a caller waits for the reply to its latest request
    pub request_timeout: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            request_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

impl WorkerConfig {
    /// Read `AIRCALC_WORKER_QUEUE` and `AIRCALC_WORKER_TIMEOUT_MS`.
    /// Unset, unparsable or zero values keep the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            queue_capacity: lookup("AIRCALC_WORKER_QUEUE")
                .and_then(|s| s.trim().parse().ok())
                .filter(|capacity: &usize| *capacity > 0)
                .unwrap_or(DEFAULT_QUEUE_CAPACITY),
            request_timeout: lookup("AIRCALC_WORKER_TIMEOUT_MS")
                .and_then(|s| s.trim().parse().ok())
                .filter(|ms: &u64| *ms > 0)
                .map(Duration::from_millis)
                .unwrap_or(Duration::from_millis(DEFAULT_TIMEOUT_MS)),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key: &str| {
            vars.iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| value.to_string())
        }
    }

    #[test]
    fn unset_vars_use_defaults() {
        let config = WorkerConfig::from_lookup(lookup(&[]));
        assert_eq!(config.queue_capacity, 8);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn reads_valid_values() {
        let config = WorkerConfig::from_lookup(lookup(&[
            ("AIRCALC_WORKER_QUEUE", "32"),
            ("AIRCALC_WORKER_TIMEOUT_MS", " 750 "),
        ]));
        assert_eq!(config.queue_capacity, 32);
        assert_eq!(config.request_timeout, Duration::from_millis(750));
    }

    #[test]
    fn unparsable_values_use_defaults() {
        let config = WorkerConfig::from_lookup(lookup(&[
            ("AIRCALC_WORKER_QUEUE", "lots"),
            ("AIRCALC_WORKER_TIMEOUT_MS", "-1"),
        ]));
        assert_eq!(config.queue_capacity, 8);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn zero_values_use_defaults() {
        let config = WorkerConfig::from_lookup(lookup(&[
            ("AIRCALC_WORKER_QUEUE", "0"),
            ("AIRCALC_WORKER_TIMEOUT_MS", "0"),
        ]));
        assert_eq!(config.queue_capacity, 8);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }
}
