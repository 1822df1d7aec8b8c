//! Bounded polling timer with a monotonic deadline.
//!
//! The timer never sleeps and never schedules anything: the caller drives it
//! from whatever event loop it has and passes `now` in, which keeps it
//! testable without a clock.

use std::time::{Duration, Instant};

/// How long a clone waits for its pane to appear.
pub const CLONE_TIMEOUT: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTick {
    /// Still inside the window; poll again.
    Continue,
    /// The window has passed. The timer is stopped.
    Expired,
    /// The timer was cancelled or already expired.
    Stopped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollTimer {
    started: Instant,
    timeout: Duration,
    ticks: u32,
    running: bool,
}

impl PollTimer {
    pub fn start(now: Instant, timeout: Duration) -> Self {
        Self {
            started: now,
            timeout,
            ticks: 0,
            running: true,
        }
    }

    /// Record one poll. Expires once strictly more than `timeout` has elapsed.
    pub fn tick(&mut self, now: Instant) -> TimerTick {
        if !self.running {
            return TimerTick::Stopped;
        }
        self.ticks += 1;
        if self.elapsed(now) > self.timeout {
            self.running = false;
            TimerTick::Expired
        } else {
            TimerTick::Continue
        }
    }

    pub fn cancel(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn started(&self) -> Instant {
        self.started
    }

    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started)
    }
}
