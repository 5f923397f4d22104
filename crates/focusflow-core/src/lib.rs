//! # FocusFlow Core Library
//!
//! This library provides the business logic for the FocusFlow learn/break
//! interval timer. The `focusflow` CLI is a thin presentation layer over it.
//!
//! ## Architecture
//!
//! - **Session Timer**: A tick-driven state machine cycling Idle -> Learn/Break
//!   -> Idle. The caller is responsible for invoking `tick()` once per second,
//!   usually through a [`CountdownHandle`].
//! - **Storage**: A string key-value [`SettingsStore`] holding durations and
//!   the session log, with SQLite and in-memory backends, plus a TOML
//!   [`Config`].
//! - **Notifications**: A [`Notifier`] fired when a session runs to zero.
//!
//! ## Key Components
//!
//! - [`SessionTimer`]: Core timer state machine
//! - [`Session`]: Immutable record of one finished or aborted interval
//! - [`Database`]: SQLite-backed settings store
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod notify;
pub mod session;
pub mod stats;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, DatabaseError, NotifyError, TimerError};
pub use events::Event;
pub use notify::{BellNotifier, CommandNotifier, MultiNotifier, Notifier, NullNotifier};
pub use session::{Session, SessionKind};
pub use stats::ProgressSummary;
pub use storage::{Config, Database, MemoryStore, SettingsStore};
pub use timer::{CountdownHandle, SessionTimer, SharedTimer, TimerMode, TimerSnapshot};
