//! Scroll handling for `GridView`.
//!
//! Scroll events arrive far faster than the grid needs to re-render. The
//! first event in each throttle window is written to the store right away;
//! later ones are held and the last held position is written once scrolling
//! has been quiet for the settle delay.

use crate::store::GridStore;
use crate::timing::{Debounce, Throttle};

/// Minimum time (ms) between scroll positions written to the store.
const SCROLL_THROTTLE_MS: f64 = 16.0;

/// Delay (ms) after scroll stops before the held position is applied.
const SCROLL_SETTLE_DELAY_MS: f64 = 100.0;

#[derive(Debug)]
pub(crate) struct ScrollTracker {
    throttle: Throttle,
    settle: Debounce,
    pending: Option<f64>,
}

impl Default for ScrollTracker {
    fn default() -> Self {
        Self {
            throttle: Throttle::new(SCROLL_THROTTLE_MS),
            settle: Debounce::new(SCROLL_SETTLE_DELAY_MS),
            pending: None,
        }
    }
}

impl ScrollTracker {
    /// Returns `true` if `scroll_top` was written to the store.
    pub(crate) fn on_scroll(&mut self, store: &GridStore, scroll_top: f64, now_ms: f64) -> bool {
        let scroll_top = scroll_top.max(0.0);
        if self.throttle.try_acquire(now_ms) {
            self.pending = None;
            self.settle.cancel();
            store.set_scroll_top(scroll_top);
            return true;
        }
        self.pending = Some(scroll_top);
        self.settle.trigger(now_ms);
        false
    }

    /// Write the held position if scrolling has settled.
    pub(crate) fn flush(&mut self, store: &GridStore, now_ms: f64) -> bool {
        if !self.settle.poll(now_ms) {
            return false;
        }
        let Some(scroll_top) = self.pending.take() else {
            return false;
        };
        self.throttle.reset();
        store.set_scroll_top(scroll_top);
        true
    }
}
