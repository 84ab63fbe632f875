//! Fixed-window rate limiting for protecting system capacity.
//!
//! Requests are grouped per client key into non-overlapping, clock-aligned
//! windows of fixed duration. Each request increments the active window's
//! count; past the configured ceiling the request is rejected with HTTP 429
//! before it reaches any route handler, so no downstream side effects occur.
//!
//! Window state lives in an explicit keyed store (client key -> window); the
//! map's per-entry locking makes increment-and-check atomic with respect to
//! concurrent requests from the same client. Expired windows are swept
//! periodically by a background task.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use dashmap::DashMap;
use tokio_util::sync::CancellationToken;

use crate::AppState;
use crate::config::RateLimitConfig;
use crate::errors::{Error, Result};

/// Per-client request counter for the active window.
#[derive(Debug)]
struct RateWindow {
    window_start: u64,
    count: u32,
}

/// Fixed-window request counter, shared across all routes.
#[derive(Debug)]
pub struct RateLimiter {
    windows: DashMap<String, RateWindow>,
    window: Duration,
    max_requests: u32,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            windows: DashMap::new(),
            // A zero window would make every request its own window; clamp up
            window: config.window.max(Duration::from_secs(1)),
            max_requests: config.max_requests,
        }
    }

    /// Window duration, for scheduling sweeps.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Count one request for `client_key` at `now_secs` (seconds since epoch).
    ///
    /// Fails with `RateLimited` once the ceiling for the active window is
    /// reached; the count never exceeds the ceiling. The entry guard holds the
    /// map shard for the duration of the update, so concurrent requests from
    /// the same client neither double-count nor lose updates.
    pub fn check(&self, client_key: &str, now_secs: u64) -> Result<()> {
        let window_start = self.aligned(now_secs);

        let mut entry = self
            .windows
            .entry(client_key.to_string())
            .or_insert(RateWindow { window_start, count: 0 });

        if entry.window_start != window_start {
            // The clock crossed into a new window; the old count no longer applies
            entry.window_start = window_start;
            entry.count = 0;
        }

        if entry.count >= self.max_requests {
            return Err(Error::RateLimited);
        }

        entry.count += 1;
        Ok(())
    }

    /// Drop windows that are no longer active at `now_secs`.
    pub fn sweep(&self, now_secs: u64) {
        let window_start = self.aligned(now_secs);
        self.windows.retain(|_, w| w.window_start == window_start);
    }

    /// Number of tracked clients; used by the sweeper's trace output.
    pub fn tracked_clients(&self) -> usize {
        self.windows.len()
    }

    fn aligned(&self, now_secs: u64) -> u64 {
        let w = self.window.as_secs();
        now_secs - now_secs % w
    }
}

/// Middleware applying the shared limiter to every request that passes through it.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response> {
    let key = client_key(&request);
    state.limiter.check(&key, unix_now())?;
    Ok(next.run(request).await)
}

/// Identify the client: first `X-Forwarded-For` hop when a proxy is in front,
/// otherwise the socket peer address.
fn client_key(request: &Request) -> String {
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|addr| addr.trim().to_string())
        .filter(|addr| !addr.is_empty())
        .or_else(|| {
            request
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|info| info.0.ip().to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}

pub(crate) fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Periodically drop expired windows until `shutdown` is cancelled.
pub fn spawn_window_sweeper(limiter: Arc<RateLimiter>, shutdown: CancellationToken) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let period = limiter.window();
        loop {
            tokio::select! {
                _ = tokio::time::sleep(period) => {
                    limiter.sweep(unix_now());
                    tracing::trace!(tracked_clients = limiter.tracked_clients(), "Swept expired rate windows");
                }
                _ = shutdown.cancelled() => return,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(window_secs: u64, max_requests: u32) -> RateLimiter {
        RateLimiter::new(&RateLimitConfig {
            window: Duration::from_secs(window_secs),
            max_requests,
        })
    }

    #[test]
    fn test_allows_up_to_ceiling() {
        let limiter = limiter(60, 3);
        for _ in 0..3 {
            limiter.check("10.0.0.1", 120).unwrap();
        }
        let result = limiter.check("10.0.0.1", 120);
        assert!(matches!(result.unwrap_err(), Error::RateLimited));
    }

    #[test]
    fn test_count_resets_on_window_rollover() {
        let limiter = limiter(60, 2);
        limiter.check("10.0.0.1", 100).unwrap();
        limiter.check("10.0.0.1", 110).unwrap();
        assert!(limiter.check("10.0.0.1", 119).is_err());

        // 120 starts the next clock-aligned window
        limiter.check("10.0.0.1", 120).unwrap();
        limiter.check("10.0.0.1", 121).unwrap();
        assert!(limiter.check("10.0.0.1", 122).is_err());
    }

    #[test]
    fn test_clients_are_counted_independently() {
        let limiter = limiter(60, 1);
        limiter.check("10.0.0.1", 100).unwrap();
        assert!(limiter.check("10.0.0.1", 101).is_err());

        // A different client still has budget in the same window
        limiter.check("10.0.0.2", 101).unwrap();
    }

    #[test]
    fn test_sweep_drops_only_expired_windows() {
        let limiter = limiter(60, 5);
        limiter.check("old-client", 100).unwrap();
        limiter.check("live-client", 130).unwrap();

        limiter.sweep(130);
        assert_eq!(limiter.tracked_clients(), 2);

        limiter.sweep(200);
        assert_eq!(limiter.tracked_clients(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_requests_count_exactly_once_each() {
        let limiter = Arc::new(limiter(60, 1000));

        let mut handles = Vec::new();
        for _ in 0..40 {
            let limiter = limiter.clone();
            handles.push(tokio::spawn(async move {
                for _ in 0..10 {
                    limiter.check("shared-client", 120).unwrap();
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // 400 requests counted; the next 600 still fit, the 1001st does not
        for _ in 0..600 {
            limiter.check("shared-client", 120).unwrap();
        }
        assert!(limiter.check("shared-client", 120).is_err());
    }
}
