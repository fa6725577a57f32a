use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{AcquireError, OwnedSemaphorePermit, Semaphore};

pub const MAX_CONCURRENCY: usize = 64;

pub(crate) const CONCURRENCY_ENV: &str = "IMPACT_MAX_CONCURRENCY";

/// Concurrent oracle calls when nothing is configured
#[must_use]
pub fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get() * 2)
        .unwrap_or(4)
        .clamp(1, 16)
}

/// Parse a concurrency knob; blank or invalid input falls back to `default_value`.
#[must_use]
pub fn parse_concurrency(raw: Option<&str>, default_value: usize) -> usize {
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default_value)
        .clamp(1, MAX_CONCURRENCY)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConcurrencySnapshot {
    pub limit: usize,
    pub in_flight: usize,
    pub waiters: usize,
    /// Highest `in_flight` observed since creation
    pub peak: usize,
}

#[derive(Debug)]
struct LimiterState {
    limit: usize,
    semaphore: Arc<Semaphore>,
    in_flight: AtomicUsize,
    waiters: AtomicUsize,
    peak: AtomicUsize,
}

/// Bounds the number of oracle calls in flight for one pipeline.
///
/// Cloning shares the bound.
#[derive(Debug, Clone)]
pub struct ConcurrencyLimiter {
    state: Arc<LimiterState>,
}

impl ConcurrencyLimiter {
    #[must_use]
    pub fn new(limit: usize) -> Self {
        let limit = limit.clamp(1, MAX_CONCURRENCY);
        Self {
            state: Arc::new(LimiterState {
                limit,
                semaphore: Arc::new(Semaphore::new(limit)),
                in_flight: AtomicUsize::new(0),
                waiters: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            }),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> ConcurrencySnapshot {
        ConcurrencySnapshot {
            limit: self.state.limit,
            in_flight: self.state.in_flight.load(Ordering::Relaxed),
            waiters: self.state.waiters.load(Ordering::Relaxed),
            peak: self.state.peak.load(Ordering::Relaxed),
        }
    }

    /// Wait for a free slot. Fails only if the semaphore was closed.
    pub async fn acquire(&self) -> Result<ConcurrencyPermit, AcquireError> {
        let waiter = WaiterGuard::new(&self.state);
        let permit = Arc::clone(&self.state.semaphore).acquire_owned().await?;
        drop(waiter);

        let now = self.state.in_flight.fetch_add(1, Ordering::Relaxed) + 1;
        self.state.peak.fetch_max(now, Ordering::Relaxed);
        Ok(ConcurrencyPermit {
            _permit: permit,
            state: Arc::clone(&self.state),
        })
    }
}

pub struct ConcurrencyPermit {
    _permit: OwnedSemaphorePermit,
    state: Arc<LimiterState>,
}

impl Drop for ConcurrencyPermit {
    fn drop(&mut self) {
        self.state.in_flight.fetch_sub(1, Ordering::Relaxed);
    }
}

struct WaiterGuard<'a> {
    state: &'a LimiterState,
}

impl<'a> WaiterGuard<'a> {
    fn new(state: &'a LimiterState) -> Self {
        state.waiters.fetch_add(1, Ordering::Relaxed);
        Self { state }
    }
}

impl Drop for WaiterGuard<'_> {
    fn drop(&mut self) {
        self.state.waiters.fetch_sub(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_concurrency_defaults_and_clamps() {
        assert_eq!(parse_concurrency(None, 4), 4);
        assert_eq!(parse_concurrency(Some(""), 4), 4);
        assert_eq!(parse_concurrency(Some("   "), 4), 4);
        assert_eq!(parse_concurrency(Some("2"), 4), 2);
        assert_eq!(parse_concurrency(Some("0"), 4), 1);
        assert_eq!(parse_concurrency(Some("999"), 4), MAX_CONCURRENCY);
        assert_eq!(parse_concurrency(Some("abc"), 4), 4);
        assert_eq!(parse_concurrency(Some(" 5 "), 4), 5);
    }

    #[test]
    fn default_is_within_bounds() {
        let value = default_concurrency();
        assert!((1..=MAX_CONCURRENCY).contains(&value));
    }

    #[tokio::test]
    async fn permits_are_counted_and_released() {
        let limiter = ConcurrencyLimiter::new(2);

        let a = limiter.acquire().await.unwrap();
        let b = limiter.acquire().await.unwrap();
        assert_eq!(limiter.snapshot().in_flight, 2);

        drop(a);
        assert_eq!(limiter.snapshot().in_flight, 1);
        drop(b);

        let snapshot = limiter.snapshot();
        assert_eq!(snapshot.in_flight, 0);
        assert_eq!(snapshot.waiters, 0);
        assert_eq!(snapshot.peak, 2);
        assert_eq!(snapshot.limit, 2);
    }

    #[tokio::test]
    async fn third_caller_waits_for_a_slot() {
        let limiter = ConcurrencyLimiter::new(1);
        let held = limiter.acquire().await.unwrap();

        let waiting = {
            let limiter = limiter.clone();
            tokio::spawn(async move { limiter.acquire().await.map(|_| ()) })
        };
        tokio::task::yield_now().await;
        assert!(!waiting.is_finished());

        drop(held);
        waiting.await.unwrap().unwrap();
        assert_eq!(limiter.snapshot().peak, 1);
    }

    #[test]
    fn zero_limit_is_raised_to_one() {
        assert_eq!(ConcurrencyLimiter::new(0).snapshot().limit, 1);
    }
}
