//! Module for rate limiting.
//!
//! Tracks submission timestamps per client identifier and enforces a
//! sliding-window cap: at most [`MAX_REQUESTS_PER_WINDOW`] accepted
//! submissions within any trailing [`WINDOW_DURATION`].

use std::collections::HashMap;
use std::time::{Duration, SystemTime};

/// Sliding window length.
pub const WINDOW_DURATION: Duration = Duration::from_secs(15 * 60);

/// Maximum accepted submissions per client within one window.
pub const MAX_REQUESTS_PER_WINDOW: usize = 3;

/// A rate limiter tracking submission timestamps per client identifier.
#[derive(Debug)]
pub struct SubmissionRateLimiter {
    window: Duration,
    max_requests: usize,
    client_timestamps: HashMap<String, Vec<SystemTime>>,
}

impl Default for SubmissionRateLimiter {
    fn default() -> Self {
        Self::new(WINDOW_DURATION, MAX_REQUESTS_PER_WINDOW)
    }
}

impl SubmissionRateLimiter {
    pub fn new(window: Duration, max_requests: usize) -> Self {
        Self {
            window,
            max_requests,
            client_timestamps: HashMap::new(),
        }
    }

    /// Returns whether `client_id` is under quota, recording this attempt
    /// as consumed quota if so. Denies without recording otherwise.
    pub fn check_and_record(&mut self, client_id: &str) -> bool {
        self.check_and_record_at(client_id, SystemTime::now())
    }

    /// Same as [`Self::check_and_record`] with an explicit clock,
    /// so tests can age entries deterministically.
    pub(crate) fn check_and_record_at(&mut self, client_id: &str, now: SystemTime) -> bool {
        let window = self.window;

        // Evict identifiers whose entire history has aged out of the window,
        // so the map does not grow unboundedly across distinct clients.
        self.client_timestamps.retain(|_, timestamps| {
            timestamps
                .last()
                .map(|t| in_window(*t, now, window))
                .unwrap_or(false)
        });

        let timestamps = self
            .client_timestamps
            .entry(client_id.to_string())
            .or_default();
        timestamps.retain(|t| in_window(*t, now, window));
        if timestamps.len() >= self.max_requests {
            false
        } else {
            timestamps.push(now);
            true
        }
    }
}

/// A timestamp is live if it is strictly within the trailing window.
/// Timestamps in the future (clock skew) count as live.
fn in_window(t: SystemTime, now: SystemTime, window: Duration) -> bool {
    now.duration_since(t).map(|age| age < window).unwrap_or(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECOND: Duration = Duration::from_secs(1);

    #[test]
    fn test_first_request_is_allowed() {
        let mut limiter = SubmissionRateLimiter::default();
        assert!(limiter.check_and_record("203.0.113.7"));
    }

    #[test]
    fn test_fourth_request_within_window_is_denied() {
        let mut limiter = SubmissionRateLimiter::default();
        let start = SystemTime::now();
        for i in 0..3 {
            assert!(limiter.check_and_record_at("203.0.113.7", start + i * SECOND));
        }
        // 4th within 10 minutes of the 1st
        assert!(!limiter.check_and_record_at("203.0.113.7", start + 600 * SECOND));
    }

    #[test]
    fn test_allowed_again_after_window_elapses() {
        let mut limiter = SubmissionRateLimiter::default();
        let start = SystemTime::now();
        for _ in 0..3 {
            assert!(limiter.check_and_record_at("203.0.113.7", start));
        }
        assert!(!limiter.check_and_record_at("203.0.113.7", start + 60 * SECOND));
        // 15 minutes and 1 second after the earliest submission
        assert!(limiter.check_and_record_at("203.0.113.7", start + WINDOW_DURATION + SECOND));
    }

    #[test]
    fn test_clients_are_isolated() {
        let mut limiter = SubmissionRateLimiter::default();
        let start = SystemTime::now();
        for _ in 0..3 {
            assert!(limiter.check_and_record_at("203.0.113.7", start));
        }
        assert!(!limiter.check_and_record_at("203.0.113.7", start + SECOND));
        assert!(limiter.check_and_record_at("198.51.100.23", start + SECOND));
        assert!(limiter.check_and_record_at("unknown", start + SECOND));
    }

    #[test]
    fn test_denied_attempt_consumes_no_quota() {
        let mut limiter = SubmissionRateLimiter::default();
        let start = SystemTime::now();
        for _ in 0..3 {
            assert!(limiter.check_and_record_at("203.0.113.7", start));
        }
        // Hammering while denied must not extend the lockout.
        for i in 1..100 {
            assert!(!limiter.check_and_record_at("203.0.113.7", start + i * SECOND));
        }
        assert!(limiter.check_and_record_at("203.0.113.7", start + WINDOW_DURATION + SECOND));
    }

    #[test]
    fn test_expired_identifiers_are_evicted() {
        let mut limiter = SubmissionRateLimiter::default();
        let start = SystemTime::now();
        for i in 0..1000 {
            assert!(limiter.check_and_record_at(&format!("client-{i}"), start));
        }
        assert_eq!(limiter.client_timestamps.len(), 1000);
        limiter.check_and_record_at("203.0.113.7", start + WINDOW_DURATION + SECOND);
        assert_eq!(limiter.client_timestamps.len(), 1);
    }

    #[test]
    fn test_custom_window_and_quota() {
        let mut limiter = SubmissionRateLimiter::new(Duration::from_secs(10), 1);
        let start = SystemTime::now();
        assert!(limiter.check_and_record_at("203.0.113.7", start));
        assert!(!limiter.check_and_record_at("203.0.113.7", start + 9 * SECOND));
        assert!(limiter.check_and_record_at("203.0.113.7", start + 10 * SECOND));
    }
}
