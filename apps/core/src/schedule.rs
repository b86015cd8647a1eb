//! Cancellable timed tasks polled with a caller-supplied clock.
//!
//! Timestamps are `Duration`s since an arbitrary epoch chosen by the frontend.

use std::time::Duration;

/// Delays a value until it stops changing for `delay`. Holds at most one
/// pending value; scheduling a new one replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Debounce<T> {
    delay: Duration,
    pending: Option<(T, Duration)>,
}

impl<T> Debounce<T> {
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn schedule(&mut self, value: T, now: Duration) {
        self.pending = Some((value, now + self.delay));
    }

    /// Takes the pending value once its deadline has passed.
    pub fn poll(&mut self, now: Duration) -> Option<T> {
        if self.deadline().is_some_and(|deadline| deadline <= now) {
            self.cancel()
        } else {
            None
        }
    }

    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HoverState {
    #[default]
    Closed,
    Open,
    /// Pointer left; closes at `deadline` unless it comes back.
    Closing { deadline: Duration },
}

/// Hover preview of one marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoverPopup {
    grace: Duration,
    state: HoverState,
}

impl HoverPopup {
    pub const fn new(grace: Duration) -> Self {
        Self {
            grace,
            state: HoverState::Closed,
        }
    }

    pub const fn state(&self) -> HoverState {
        self.state
    }

    pub const fn is_open(&self) -> bool {
        !matches!(self.state, HoverState::Closed)
    }

    pub fn pointer_enter_marker(&mut self) {
        self.state = HoverState::Open;
    }

    /// Entering the popup only keeps an already open popup alive.
    pub fn pointer_enter_popup(&mut self) {
        if self.is_open() {
            self.state = HoverState::Open;
        }
    }

    pub fn pointer_leave(&mut self, now: Duration) {
        if self.state == HoverState::Open {
            self.state = HoverState::Closing {
                deadline: now + self.grace,
            };
        }
    }

    /// Returns true when the popup closed on this poll.
    pub fn poll(&mut self, now: Duration) -> bool {
        match self.state {
            HoverState::Closing { deadline } if deadline <= now => {
                self.state = HoverState::Closed;
                true
            }
            _ => false,
        }
    }

    pub fn close(&mut self) {
        self.state = HoverState::Closed;
    }
}
