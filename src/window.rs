//! Timestamp-driven tumbling window over the event stream.
//!
//! Elapsed time is measured on the time of day only. When the stream crosses
//! midnight the delta goes negative and the window stays open until the
//! clock catches up again.

use chrono::{Duration, NaiveTime};

/// Where an event falls relative to the current window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    /// The event belongs to the open window and should be ingested.
    InWindow,
    /// The event closed the previous window (started at `started`) and opened
    /// a new one at its own timestamp. It is not ingested.
    Closed { started: NaiveTime },
}

#[derive(Debug, Clone)]
pub struct WindowManager {
    length: Duration,
    start: Option<NaiveTime>,
}

impl WindowManager {
    pub const DEFAULT_MINUTES: i64 = 5;

    pub fn new(length: Duration) -> Self {
        Self {
            length,
            start: None,
        }
    }

    /// Start of the current window, once the first event has been seen.
    pub fn start(&self) -> Option<NaiveTime> {
        self.start
    }

    /// Whole minutes from `t0` to `t`, rounded toward negative infinity.
    pub fn elapsed_minutes(t0: NaiveTime, t: NaiveTime) -> i64 {
        (t - t0).num_seconds().div_euclid(60)
    }

    /// Classify the next event and advance the window state.
    pub fn observe(&mut self, t: NaiveTime) -> WindowEvent {
        let Some(t0) = self.start else {
            self.start = Some(t);
            return WindowEvent::InWindow;
        };

        if Self::elapsed_minutes(t0, t) < self.length.num_minutes() {
            WindowEvent::InWindow
        } else {
            self.start = Some(t);
            WindowEvent::Closed { started: t0 }
        }
    }
}

impl Default for WindowManager {
    fn default() -> Self {
        Self::new(Duration::minutes(Self::DEFAULT_MINUTES))
    }
}
