//! Session-end notification sinks.
//!
//! A [`Notifier`] fires when an interval runs to zero. It must return
//! promptly; the timer logs any error and carries on with the transition.

use std::io::{self, Write};
use std::process::{Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};

use crate::error::NotifyError;
use crate::storage::config::NotificationsConfig;

pub trait Notifier: Send {
    /// Signal that a session ended.
    fn notify(&self) -> Result<(), NotifyError>;
}

/// Discards notifications.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Rings the terminal bell on stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct BellNotifier;

impl Notifier for BellNotifier {
    fn notify(&self) -> Result<(), NotifyError> {
        let mut stderr = std::io::stderr().lock();
        stderr.write_all(b"\x07")?;
        stderr.flush()?;
        Ok(())
    }
}

/// Spawns a user-configured command and does not wait for it.
///
/// The command line is split on whitespace; no shell is involved.
#[derive(Debug, Clone)]
pub struct CommandNotifier {
    command: String,
}

impl CommandNotifier {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl CommandNotifier {
    /// Spawn the command and hand the child to a thread that reaps it.
    fn launch(&self) -> Result<JoinHandle<io::Result<ExitStatus>>, NotifyError> {
        let mut parts = self.command.split_whitespace();
        let program = parts.next().ok_or(NotifyError::EmptyCommand)?;
        let mut child = Command::new(program)
            .args(parts)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| NotifyError::Spawn {
                command: self.command.clone(),
                source,
            })?;
        let command = self.command.clone();
        Ok(thread::spawn(move || {
            let status = child.wait();
            match &status {
                Ok(status) if !status.success() => {
                    warn!(%command, %status, "notification command exited with failure")
                }
                Ok(_) => debug!(%command, "notification command finished"),
                Err(e) => warn!(%command, error = %e, "failed to wait on notification command"),
            }
            status
        }))
    }
}

impl Notifier for CommandNotifier {
    fn notify(&self) -> Result<(), NotifyError> {
        self.launch().map(drop)
    }
}

/// Fans a notification out to several sinks. Every sink is tried; the first
/// error is returned.
#[derive(Default)]
pub struct MultiNotifier {
    sinks: Vec<Box<dyn Notifier>>,
}

impl MultiNotifier {
    pub fn push(&mut self, sink: impl Notifier + 'static) {
        self.sinks.push(Box::new(sink));
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl Notifier for MultiNotifier {
    fn notify(&self) -> Result<(), NotifyError> {
        let mut first_err = None;
        for sink in &self.sinks {
            if let Err(e) = sink.notify() {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}

/// Build the notifier described by the `[notifications]` config section.
pub fn from_config(config: &NotificationsConfig) -> MultiNotifier {
    let mut notifier = MultiNotifier::default();
    if !config.enabled {
        return notifier;
    }
    if config.bell {
        notifier.push(BellNotifier);
    }
    if let Some(command) = config.command.as_deref().filter(|c| !c.trim().is_empty()) {
        notifier.push(CommandNotifier::new(command));
    }
    notifier
}
