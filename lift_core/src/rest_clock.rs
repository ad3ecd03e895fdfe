//! Countdown used between sets.
//!
//! The clock does not read time itself. The host calls [`RestClock::tick`]
//! once per elapsed second (see [`crate::ticker`]) and reacts to the
//! returned [`ClockEvent`]. Expiry is reported exactly once per
//! [`RestClock::start`].

use crate::RestClockState;

/// Result of advancing or skipping the clock
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockEvent {
    /// Nothing happened (inactive, paused, or already expired)
    Idle,
    /// Still counting down
    Running { remaining: u32 },
    /// Reached zero on this call
    Expired,
}

#[derive(Clone, Debug, Default)]
pub struct RestClock {
    state: RestClockState,
    expired: bool,
}

impl RestClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> RestClockState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// Start a new countdown, replacing any current one.
    ///
    /// `start(0)` leaves the clock inactive.
    pub fn start(&mut self, seconds: u32) {
        self.state = RestClockState {
            is_running: seconds > 0,
            time_remaining: seconds,
            total_time: seconds,
        };
        self.expired = false;
        tracing::debug!("Rest clock started: {}s", seconds);
    }

    pub fn pause(&mut self) {
        if self.is_active() && !self.expired {
            self.state.is_running = false;
        }
    }

    pub fn resume(&mut self) {
        if self.is_active() && !self.expired {
            self.state.is_running = true;
        }
    }

    /// Extend remaining and total time by the same amount
    pub fn add_time(&mut self, seconds: u32) {
        if !self.is_active() || self.expired {
            return;
        }
        self.state.time_remaining = self.state.time_remaining.saturating_add(seconds);
        self.state.total_time = self.state.total_time.saturating_add(seconds);
        tracing::debug!(
            "Rest clock extended by {}s ({}s remaining)",
            seconds,
            self.state.time_remaining
        );
    }

    /// Force the countdown to zero and report expiry
    pub fn skip(&mut self) -> ClockEvent {
        if !self.is_active() {
            return ClockEvent::Idle;
        }
        self.state.time_remaining = 0;
        self.fire()
    }

    /// Advance by one second
    pub fn tick(&mut self) -> ClockEvent {
        if !self.is_active() || !self.state.is_running || self.expired {
            return ClockEvent::Idle;
        }

        if self.state.time_remaining == 0 {
            tracing::warn!("Rest clock ticked at zero without expiring; firing expiry now");
            return self.fire();
        }

        self.state.time_remaining -= 1;
        if self.state.time_remaining == 0 {
            self.fire()
        } else {
            ClockEvent::Running {
                remaining: self.state.time_remaining,
            }
        }
    }

    /// Return to the inactive state
    pub fn clear(&mut self) {
        self.state = RestClockState::default();
        self.expired = false;
    }

    fn fire(&mut self) -> ClockEvent {
        self.state.is_running = false;
        if self.expired {
            return ClockEvent::Idle;
        }
        self.expired = true;
        tracing::debug!("Rest clock expired");
        ClockEvent::Expired
    }
}
