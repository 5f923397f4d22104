use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::Session;
use crate::timer::{TimerMode, TimerSnapshot};

/// Every state change of the session timer produces an Event.
/// The CLI renders them; the countdown task forwards them over a channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: TimerMode,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        mode: TimerMode,
        time_left: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        mode: TimerMode,
        time_left: u64,
        at: DateTime<Utc>,
    },
    /// One second elapsed on an active countdown.
    Ticked {
        mode: TimerMode,
        time_left: u64,
        at: DateTime<Utc>,
    },
    /// The countdown ran to zero and a full-length session was logged.
    SessionEnded {
        session: Session,
        next_mode: TimerMode,
        at: DateTime<Utc>,
    },
    /// The user aborted the interval. `session` is absent when no time elapsed.
    TimerStopped {
        mode: TimerMode,
        session: Option<Session>,
        next_mode: TimerMode,
        at: DateTime<Utc>,
    },
    StateSnapshot(TimerSnapshot),
}

impl Event {
    /// The session this event logged, if any.
    pub fn session(&self) -> Option<&Session> {
        match self {
            Event::SessionEnded { session, .. } => Some(session),
            Event::TimerStopped { session, .. } => session.as_ref(),
            _ => None,
        }
    }

    /// Whether the timer is back in Idle after this event.
    pub fn ends_interval(&self) -> bool {
        matches!(self, Event::SessionEnded { .. } | Event::TimerStopped { .. })
    }
}
