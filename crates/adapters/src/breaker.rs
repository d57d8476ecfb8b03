//! Per-adapter circuit breaker: a rolling failure counter plus a cooldown
//! `Instant`, guarded by `parking_lot::Mutex`. Simplified from the richer
//! provider-health/rate-limit tracking shown in the pack's circuit-breaker
//! reference down to exactly what spec §4.4 requires: K consecutive
//! failures within a window opens the breaker for a cooldown period.

use std::time::{Duration, Instant};

use parking_lot::Mutex;

use qo_domain::trace::TraceEvent;

struct BreakerState {
    consecutive_failures: u32,
    window_start: Instant,
    opened_until: Option<Instant>,
}

pub struct CircuitBreaker {
    name: String,
    threshold: u32,
    window: Duration,
    cooldown: Duration,
    state: Mutex<BreakerState>,
}

impl CircuitBreaker {
    pub fn new(name: impl Into<String>, threshold: u32, window: Duration, cooldown: Duration) -> Self {
        CircuitBreaker {
            name: name.into(),
            threshold,
            window,
            cooldown,
            state: Mutex::new(BreakerState {
                consecutive_failures: 0,
                window_start: Instant::now(),
                opened_until: None,
            }),
        }
    }

    /// Whether calls should currently be skipped.
    pub fn is_open(&self) -> bool {
        let mut state = self.state.lock();
        if let Some(until) = state.opened_until {
            if Instant::now() < until {
                return true;
            }
            // Cooldown elapsed: close the breaker and reset.
            state.opened_until = None;
            state.consecutive_failures = 0;
            TraceEvent::CircuitBreakerClosed {
                provider: self.name.clone(),
            }
            .emit();
        }
        false
    }

    pub fn record_success(&self) {
        let mut state = self.state.lock();
        state.consecutive_failures = 0;
        state.window_start = Instant::now();
    }

    pub fn record_failure(&self) {
        let mut state = self.state.lock();
        let now = Instant::now();
        if now.duration_since(state.window_start) > self.window {
            state.consecutive_failures = 0;
            state.window_start = now;
        }
        state.consecutive_failures += 1;
        if state.consecutive_failures >= self.threshold && state.opened_until.is_none() {
            state.opened_until = Some(now + self.cooldown);
            TraceEvent::CircuitBreakerOpened {
                provider: self.name.clone(),
                cooldown_ms: self.cooldown.as_millis() as u64,
            }
            .emit();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opens_after_threshold_consecutive_failures() {
        let b = CircuitBreaker::new("test", 3, Duration::from_secs(60), Duration::from_millis(50));
        assert!(!b.is_open());
        b.record_failure();
        b.record_failure();
        assert!(!b.is_open());
        b.record_failure();
        assert!(b.is_open());
    }

    #[test]
    fn success_resets_failure_count() {
        let b = CircuitBreaker::new("test", 3, Duration::from_secs(60), Duration::from_millis(50));
        b.record_failure();
        b.record_failure();
        b.record_success();
        b.record_failure();
        b.record_failure();
        assert!(!b.is_open());
    }

    #[tokio::test]
    async fn closes_after_cooldown_elapses() {
        let b = CircuitBreaker::new("test", 1, Duration::from_secs(60), Duration::from_millis(20));
        b.record_failure();
        assert!(b.is_open());
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(!b.is_open());
    }
}
