//! Session timer state machine.
//!
//! The timer is tick-driven and owns no threads. The caller invokes `tick()`
//! once per elapsed second while the countdown is active, usually through a
//! [`CountdownHandle`](super::CountdownHandle).
//!
//! ## State Transitions
//!
//! ```text
//! Idle --start--> Learn | Break --(complete | stop)--> Idle
//! ```
//!
//! `next_mode` advances Learn -> Break -> Learn each time an interval ends,
//! whether it ran to zero or was stopped.
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = SessionTimer::restore(MemoryStore::default(), NullNotifier);
//! timer.start_or_pause();
//! // Once per second:
//! timer.tick(); // Returns Some(Event::SessionEnded) when the countdown hits zero
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::mode::TimerMode;
use crate::error::TimerError;
use crate::events::Event;
use crate::notify::Notifier;
use crate::session::{Session, SessionKind};
use crate::storage::settings::{self, BREAK_DURATION_KEY, LEARN_DURATION_KEY};
use crate::storage::SettingsStore;

pub const DEFAULT_LEARN_MINUTES: u32 = 25;
pub const DEFAULT_BREAK_MINUTES: u32 = 5;

/// Read-only view of the timer for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub mode: TimerMode,
    pub next_mode: TimerMode,
    pub is_active: bool,
    pub time_left: u64,
    pub learn_duration: u32,
    pub break_duration: u32,
    pub label: String,
    pub note: String,
    pub at: DateTime<Utc>,
}

impl TimerSnapshot {
    /// The running mode, or the one about to run when idle.
    pub fn display_mode(&self) -> TimerMode {
        if self.mode == TimerMode::Idle {
            self.next_mode
        } else {
            self.mode
        }
    }

    /// Label and note are editable only while idle ahead of a learn interval.
    pub fn accepts_learn_details(&self) -> bool {
        self.mode == TimerMode::Idle && self.next_mode == TimerMode::Learn
    }
}

/// Core session timer.
///
/// Durations are configured in minutes and counted down in seconds. Every
/// finished or aborted interval with elapsed time is appended to the session
/// log, which is written back to the settings store after each append.
pub struct SessionTimer {
    mode: TimerMode,
    next_mode: TimerMode,
    is_active: bool,
    /// Seconds remaining in the current (or upcoming) interval.
    time_left: u64,
    learn_duration: u32,
    break_duration: u32,
    current_label: String,
    current_note: String,
    sessions: Vec<Session>,
    store: Box<dyn SettingsStore>,
    notifier: Box<dyn Notifier>,
}

impl SessionTimer {
    /// Build the timer from persisted settings.
    ///
    /// Missing or malformed durations fall back to 25/5 minutes and a bad
    /// session list to an empty log. Starts idle with a learn interval next.
    pub fn restore(
        store: impl SettingsStore + 'static,
        notifier: impl Notifier + 'static,
    ) -> Self {
        let learn_duration =
            settings::load_duration(&store, LEARN_DURATION_KEY, DEFAULT_LEARN_MINUTES);
        let break_duration =
            settings::load_duration(&store, BREAK_DURATION_KEY, DEFAULT_BREAK_MINUTES);
        let sessions = settings::load_sessions(&store);
        debug!(
            learn_duration,
            break_duration,
            sessions = sessions.len(),
            "restored session timer"
        );

        Self {
            mode: TimerMode::Idle,
            next_mode: TimerMode::Learn,
            is_active: false,
            time_left: minutes_to_secs(learn_duration),
            learn_duration,
            break_duration,
            current_label: String::new(),
            current_note: String::new(),
            sessions,
            store: Box::new(store),
            notifier: Box::new(notifier),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn next_mode(&self) -> TimerMode {
        self.next_mode
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn time_left(&self) -> u64 {
        self.time_left
    }

    pub fn learn_duration(&self) -> u32 {
        self.learn_duration
    }

    pub fn break_duration(&self) -> u32 {
        self.break_duration
    }

    pub fn label(&self) -> &str {
        &self.current_label
    }

    pub fn note(&self) -> &str {
        &self.current_note
    }

    /// The session log, oldest first.
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    /// Configured length of `mode` in seconds. Zero for Idle.
    pub fn configured_secs(&self, mode: TimerMode) -> u64 {
        match mode {
            TimerMode::Idle => 0,
            TimerMode::Learn => minutes_to_secs(self.learn_duration),
            TimerMode::Break => minutes_to_secs(self.break_duration),
        }
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            mode: self.mode,
            next_mode: self.next_mode,
            is_active: self.is_active,
            time_left: self.time_left,
            learn_duration: self.learn_duration,
            break_duration: self.break_duration,
            label: self.current_label.clone(),
            note: self.current_note.clone(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start the next interval from Idle, otherwise toggle pause.
    pub fn start_or_pause(&mut self) -> Event {
        let at = Utc::now();
        if self.mode == TimerMode::Idle {
            self.mode = self.next_mode;
            self.time_left = self.configured_secs(self.mode);
            self.is_active = true;
            debug!(mode = %self.mode, time_left = self.time_left, "interval started");
            return Event::TimerStarted {
                mode: self.mode,
                duration_secs: self.time_left,
                at,
            };
        }

        self.is_active = !self.is_active;
        if self.is_active {
            debug!(mode = %self.mode, time_left = self.time_left, "interval resumed");
            Event::TimerResumed {
                mode: self.mode,
                time_left: self.time_left,
                at,
            }
        } else {
            debug!(mode = %self.mode, time_left = self.time_left, "interval paused");
            Event::TimerPaused {
                mode: self.mode,
                time_left: self.time_left,
                at,
            }
        }
    }

    /// Call once per elapsed second. Returns `Some(Event::SessionEnded)` when
    /// this tick brought the countdown to zero.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.is_active {
            return None;
        }
        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left == 0 {
            return self.complete();
        }
        None
    }

    /// The interval ran to zero: log a full-length session, advance
    /// `next_mode`, return to Idle and fire the notifier.
    ///
    /// Returns `None` when idle.
    pub fn complete(&mut self) -> Option<Event> {
        let mode = self.mode;
        let kind = SessionKind::for_mode(mode, &self.current_label, &self.current_note)?;
        let session = Session::new(kind, self.configured_secs(mode));
        self.record(session.clone());

        self.advance_from(mode);
        self.mode = TimerMode::Idle;
        self.is_active = false;
        debug!(mode = %mode, next_mode = %self.next_mode, "interval completed");

        if let Err(e) = self.notifier.notify() {
            warn!(error = %e, "session-end notification failed");
        }

        Some(Event::SessionEnded {
            session,
            next_mode: self.next_mode,
            at: Utc::now(),
        })
    }

    /// Abort the running or paused interval. Logs a partial session when any
    /// time elapsed. Returns `None` when already idle.
    pub fn stop(&mut self) -> Option<Event> {
        let mode = self.mode;
        if mode == TimerMode::Idle {
            self.is_active = false;
            return None;
        }

        let elapsed = self.configured_secs(mode).saturating_sub(self.time_left);
        let session = if elapsed > 0 {
            SessionKind::for_mode(mode, &self.current_label, &self.current_note)
                .map(|kind| Session::new(kind, elapsed))
        } else {
            None
        };
        if let Some(session) = &session {
            self.record(session.clone());
        }

        self.is_active = false;
        self.mode = TimerMode::Idle;
        self.advance_from(mode);
        debug!(mode = %mode, elapsed, next_mode = %self.next_mode, "interval stopped");

        Some(Event::TimerStopped {
            mode,
            session,
            next_mode: self.next_mode,
            at: Utc::now(),
        })
    }

    /// Set the learn length in minutes, clamped to at least 1, and persist it.
    ///
    /// # Errors
    /// Returns [`TimerError::Busy`] while the countdown is ticking.
    pub fn set_learn_duration(&mut self, minutes: i64) -> Result<u32, TimerError> {
        self.set_duration(TimerMode::Learn, minutes)
    }

    /// Set the break length in minutes, clamped to at least 1, and persist it.
    ///
    /// # Errors
    /// Returns [`TimerError::Busy`] while the countdown is ticking.
    pub fn set_break_duration(&mut self, minutes: i64) -> Result<u32, TimerError> {
        self.set_duration(TimerMode::Break, minutes)
    }

    /// Returns whether the label was taken. Ignored unless idle before a learn interval.
    pub fn set_label(&mut self, text: impl Into<String>) -> bool {
        if !self.accepts_learn_details() {
            return false;
        }
        self.current_label = text.into();
        true
    }

    /// Returns whether the note was taken. Ignored unless idle before a learn interval.
    pub fn set_note(&mut self, text: impl Into<String>) -> bool {
        if !self.accepts_learn_details() {
            return false;
        }
        self.current_note = text.into();
        true
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn accepts_learn_details(&self) -> bool {
        self.mode == TimerMode::Idle && self.next_mode == TimerMode::Learn
    }

    fn set_duration(&mut self, mode: TimerMode, minutes: i64) -> Result<u32, TimerError> {
        if self.is_active {
            return Err(TimerError::Busy { mode });
        }
        let minutes = clamp_minutes(minutes);
        let key = match mode {
            TimerMode::Learn => {
                self.learn_duration = minutes;
                LEARN_DURATION_KEY
            }
            TimerMode::Break => {
                self.break_duration = minutes;
                BREAK_DURATION_KEY
            }
            TimerMode::Idle => return Ok(minutes),
        };
        settings::save_duration(self.store.as_ref(), key, minutes);

        if self.mode == TimerMode::Idle && self.next_mode == mode {
            self.time_left = minutes_to_secs(minutes);
        }
        debug!(mode = %mode, minutes, "duration changed");
        Ok(minutes)
    }

    fn record(&mut self, session: Session) {
        self.sessions.push(session);
        settings::save_sessions(self.store.as_ref(), &self.sessions);
    }

    /// Queue the interval that follows `mode` at its full length.
    fn advance_from(&mut self, mode: TimerMode) {
        match mode {
            TimerMode::Learn => {
                self.next_mode = TimerMode::Break;
                self.time_left = minutes_to_secs(self.break_duration);
            }
            TimerMode::Break => {
                self.next_mode = TimerMode::Learn;
                self.time_left = minutes_to_secs(self.learn_duration);
                self.current_label.clear();
                self.current_note.clear();
            }
            TimerMode::Idle => {}
        }
    }
}

impl fmt::Debug for SessionTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionTimer")
            .field("mode", &self.mode)
            .field("next_mode", &self.next_mode)
            .field("is_active", &self.is_active)
            .field("time_left", &self.time_left)
            .field("learn_duration", &self.learn_duration)
            .field("break_duration", &self.break_duration)
            .field("sessions", &self.sessions.len())
            .finish_non_exhaustive()
    }
}

fn clamp_minutes(minutes: i64) -> u32 {
    minutes.clamp(1, i64::from(u32::MAX)) as u32
}

fn minutes_to_secs(minutes: u32) -> u64 {
    u64::from(minutes) * 60
}
