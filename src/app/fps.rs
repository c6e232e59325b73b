//! Sliding-window frame rate measurement.

use std::collections::VecDeque;
use std::time::Instant;

/// Frame rate over the last `window` redraws.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    ticks: VecDeque<Instant>,
    window: usize,
}

impl FpsCounter {
    /// A counter keeping at most `window` timestamps (at least one).
    #[must_use]
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            ticks: VecDeque::with_capacity(window),
            window,
        }
    }

    /// Records a frame now and returns the current rate.
    pub fn tick(&mut self) -> f64 {
        self.tick_at(Instant::now())
    }

    /// Records a frame at `now` and returns `(n - 1) / (now - oldest)`.
    ///
    /// Returns `0.0` until two distinct timestamps are in the window.
    pub fn tick_at(&mut self, now: Instant) -> f64 {
        if self.ticks.len() == self.window {
            self.ticks.pop_front();
        }
        self.ticks.push_back(now);
        self.rate()
    }

    /// Rate for the timestamps currently in the window, without recording.
    #[must_use]
    pub fn rate(&self) -> f64 {
        let (Some(first), Some(last)) = (self.ticks.front(), self.ticks.back()) else {
            return 0.0;
        };
        let elapsed = last.saturating_duration_since(*first).as_secs_f64();
        if elapsed <= 0.0 {
            return 0.0;
        }
        (self.ticks.len() - 1) as f64 / elapsed
    }
}
