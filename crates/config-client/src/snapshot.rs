use std::time::{Duration, Instant};

/// A cached value plus the instant it was fetched, so callers can decide
/// whether it is still fresh without re-fetching on every read.
#[derive(Clone)]
pub struct Snapshot<T> {
    pub value: T,
    fetched_at: Instant,
}

impl<T> Snapshot<T> {
    pub fn new(value: T) -> Self {
        Snapshot {
            value,
            fetched_at: Instant::now(),
        }
    }

    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() <= ttl
    }
}
