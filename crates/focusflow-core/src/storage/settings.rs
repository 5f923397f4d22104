//! Key layout and parsing for the persisted timer settings.
//!
//! | Key             | Value                         |
//! |-----------------|-------------------------------|
//! | `learnDuration` | integer minutes as a string   |
//! | `breakDuration` | integer minutes as a string   |
//! | `sessions`      | JSON array of session records |
//!
//! Anything missing or malformed falls back to a default with a warning.

use tracing::warn;

use super::SettingsStore;
use crate::session::Session;

pub const LEARN_DURATION_KEY: &str = "learnDuration";
pub const BREAK_DURATION_KEY: &str = "breakDuration";
pub const SESSIONS_KEY: &str = "sessions";

/// Read a duration in minutes. Non-integers and values below 1 yield `default`.
pub fn load_duration<S: SettingsStore + ?Sized>(store: &S, key: &str, default: u32) -> u32 {
    let Some(raw) = store.get(key) else {
        return default;
    };
    match raw.trim().parse::<u32>() {
        Ok(minutes) if minutes >= 1 => minutes,
        _ => {
            warn!(key, value = %raw, default, "invalid stored duration, using default");
            default
        }
    }
}

pub fn save_duration<S: SettingsStore + ?Sized>(store: &S, key: &str, minutes: u32) {
    store.set(key, &minutes.to_string());
}

/// Read the session log. A list that does not parse is replaced by an empty one.
pub fn load_sessions<S: SettingsStore + ?Sized>(store: &S) -> Vec<Session> {
    let Some(raw) = store.get(SESSIONS_KEY) else {
        return Vec::new();
    };
    match serde_json::from_str(&raw) {
        Ok(sessions) => sessions,
        Err(e) => {
            warn!(error = %e, "stored session list is malformed, starting empty");
            Vec::new()
        }
    }
}

pub fn save_sessions<S: SettingsStore + ?Sized>(store: &S, sessions: &[Session]) {
    match serde_json::to_string(sessions) {
        Ok(json) => store.set(SESSIONS_KEY, &json),
        Err(e) => warn!(error = %e, "failed to encode session list"),
    }
}
