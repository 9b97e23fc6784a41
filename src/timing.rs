//! Rate limiting for high-frequency input such as scroll events.
//!
//! Both gates take the current time in milliseconds from the caller
//! (`performance.now()` in the browser, a fake clock in tests), so they hold
//! no timers themselves.

/// Leading-edge throttle: the first call passes, calls within `limit_ms` of
/// the last accepted one are dropped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Throttle {
    limit_ms: f64,
    last_accepted: Option<f64>,
}

impl Throttle {
    pub fn new(limit_ms: f64) -> Self {
        Self {
            limit_ms,
            last_accepted: None,
        }
    }

    /// Returns `true` if the call at `now_ms` should run.
    pub fn try_acquire(&mut self, now_ms: f64) -> bool {
        match self.last_accepted {
            Some(last) if now_ms - last < self.limit_ms => false,
            _ => {
                self.last_accepted = Some(now_ms);
                true
            }
        }
    }

    pub fn reset(&mut self) {
        self.last_accepted = None;
    }
}

/// Trailing-edge debounce: fires once, `wait_ms` after the latest trigger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Debounce {
    wait_ms: f64,
    deadline: Option<f64>,
}

impl Debounce {
    pub fn new(wait_ms: f64) -> Self {
        Self {
            wait_ms,
            deadline: None,
        }
    }

    /// Record a call at `now_ms`, pushing the deadline back.
    pub fn trigger(&mut self, now_ms: f64) {
        self.deadline = Some(now_ms + self.wait_ms);
    }

    /// Returns `true` exactly once when the deadline has passed.
    pub fn poll(&mut self, now_ms: f64) -> bool {
        match self.deadline {
            Some(deadline) if now_ms >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Milliseconds until the pending call fires, if any.
    pub fn remaining(&self, now_ms: f64) -> Option<f64> {
        self.deadline.map(|d| (d - now_ms).max(0.0))
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}
