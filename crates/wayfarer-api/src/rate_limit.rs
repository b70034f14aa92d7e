//! Fixed-window rate limiter middleware.
//!
//! Counts requests in the current wall-clock second with atomics and rejects
//! anything past the configured cap with a 429 JSON error.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::extract::{Extension, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::error::ApiError;

/// Shared state for the rate limiter.
///
/// The window second and the count within it live in one word (window in
/// the high 32 bits, count in the low 32 bits) so a window switch and the
/// increments that race with it are a single atomic update.
#[derive(Clone, Debug)]
pub struct RateLimiter {
    /// Maximum requests allowed per second.
    max_per_sec: u32,
    state: Arc<AtomicU64>,
}

const COUNT_BITS: u32 = 32;
const COUNT_MASK: u64 = (1 << COUNT_BITS) - 1;

impl RateLimiter {
    /// Create a new rate limiter allowing `max_per_sec` requests per second.
    pub fn new(max_per_sec: u64) -> Self {
        Self {
            max_per_sec: u32::try_from(max_per_sec).unwrap_or(u32::MAX),
            state: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Try to acquire a permit. Returns true if the request is allowed.
    pub fn try_acquire(&self) -> bool {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        self.try_acquire_at(now)
    }

    fn try_acquire_at(&self, now: u64) -> bool {
        let window = now & COUNT_MASK;
        let max = u64::from(self.max_per_sec);
        let mut allowed = false;

        // A rejected request leaves the word untouched, so the count never
        // runs past the cap.
        let _ = self
            .state
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |packed| {
                let count = if packed >> COUNT_BITS == window {
                    packed & COUNT_MASK
                } else {
                    0
                };
                allowed = count < max;
                allowed.then_some((window << COUNT_BITS) | (count + 1))
            });

        allowed
    }
}

/// Axum middleware that enforces the rate limit.
pub async fn rate_limit_middleware(
    Extension(limiter): Extension<RateLimiter>,
    req: Request,
    next: Next,
) -> Response {
    if limiter.try_acquire() {
        next.run(req).await
    } else {
        tracing::debug!(path = %req.uri().path(), "Request rejected by rate limiter");
        ApiError::TooManyRequests.into_response()
    }
}
