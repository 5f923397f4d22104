pub mod config;
pub mod log;
pub mod session;
pub mod settings;
pub mod status;

use focusflow_core::{Database, Notifier, NullNotifier, SessionTimer};

/// Restore the timer from the on-disk store.
pub fn open_timer(
    notifier: impl Notifier + 'static,
) -> Result<SessionTimer, Box<dyn std::error::Error>> {
    let db = Database::open()?;
    Ok(SessionTimer::restore(db, notifier))
}

/// Restore the timer for a one-shot command that never completes an interval.
pub fn open_quiet_timer() -> Result<SessionTimer, Box<dyn std::error::Error>> {
    open_timer(NullNotifier)
}
