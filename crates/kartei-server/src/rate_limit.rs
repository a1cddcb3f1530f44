//! Per-learner fixed-window rate limiting.
//!
//! The limiter is an ordinary value held in [`AppState`](crate::AppState);
//! each server instance and each test owns its own counters.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use kartei_core::config::RateLimitConfig;
use tokio::sync::Mutex;

use crate::error::{ApiError, ApiResult};

#[derive(Debug, Clone, Copy)]
struct Entry {
    window_start: Instant,
    hits: u64,
}

#[derive(Debug)]
struct LimiterState {
    entries: HashMap<String, Entry>,
    last_cleanup: Instant,
}

/// Outcome of a single limiter check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitCheck {
    pub allowed: bool,
    pub limit: u64,
    pub remaining: u64,
    pub reset_after_secs: u64,
}

/// Fixed-window request counter keyed by learner.
#[derive(Debug)]
pub struct RateLimiter {
    window: Duration,
    max_requests: u64,
    state: Mutex<LimiterState>,
}

impl RateLimiter {
    pub fn new(window: Duration, max_requests: u64) -> Self {
        Self {
            window: window.max(Duration::from_secs(1)),
            max_requests,
            state: Mutex::new(LimiterState {
                entries: HashMap::new(),
                last_cleanup: Instant::now(),
            }),
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(Duration::from_secs(config.window_secs), config.max_requests)
    }

    /// Count one request for `key` and reject it once the window is spent.
    pub async fn acquire(&self, key: &str) -> ApiResult<RateLimitCheck> {
        let check = self.check_at(key, Instant::now()).await;
        if check.allowed {
            Ok(check)
        } else {
            Err(ApiError::rate_limit(check.reset_after_secs))
        }
    }

    pub(crate) async fn check_at(&self, key: &str, now: Instant) -> RateLimitCheck {
        let mut state = self.state.lock().await;

        if now.saturating_duration_since(state.last_cleanup) >= self.window {
            let window = self.window;
            state
                .entries
                .retain(|_, entry| now.saturating_duration_since(entry.window_start) < window);
            state.last_cleanup = now;
        }

        let entry = state.entries.entry(key.to_string()).or_insert(Entry {
            window_start: now,
            hits: 0,
        });

        if now.saturating_duration_since(entry.window_start) >= self.window {
            entry.window_start = now;
            entry.hits = 0;
        }

        entry.hits = entry.hits.saturating_add(1);
        let allowed = entry.hits <= self.max_requests;
        let reset_after = self
            .window
            .saturating_sub(now.saturating_duration_since(entry.window_start));
        let reset_after_secs = (reset_after.as_millis() as u64 + 999) / 1000;

        RateLimitCheck {
            allowed,
            limit: self.max_requests,
            remaining: self.max_requests.saturating_sub(entry.hits),
            reset_after_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_limit_within_window() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 2);
        let start = Instant::now();

        assert!(limiter.check_at("u1", start).await.allowed);
        let second = limiter.check_at("u1", start).await;
        assert!(second.allowed);
        assert_eq!(second.remaining, 0);

        let third = limiter.check_at("u1", start + Duration::from_secs(10)).await;
        assert!(!third.allowed);
        assert_eq!(third.reset_after_secs, 50);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 1);
        let start = Instant::now();

        assert!(limiter.check_at("u1", start).await.allowed);
        assert!(limiter.check_at("u2", start).await.allowed);
        assert!(!limiter.check_at("u1", start).await.allowed);
    }

    #[tokio::test]
    async fn test_window_resets() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 1);
        let start = Instant::now();

        assert!(limiter.check_at("u1", start).await.allowed);
        assert!(!limiter.check_at("u1", start).await.allowed);
        assert!(
            limiter
                .check_at("u1", start + Duration::from_secs(60))
                .await
                .allowed
        );
    }

    #[tokio::test]
    async fn test_acquire_maps_to_rate_limit_error() {
        let limiter = RateLimiter::new(Duration::from_secs(30), 0);
        let err = limiter.acquire("u1").await.unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(err.code, "RATE_LIMIT");
        assert_eq!(err.retry_after, Some(30));
    }
}
