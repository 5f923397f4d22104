mod countdown;
mod engine;
mod mode;

pub use countdown::{CountdownHandle, SharedTimer};
pub use engine::{SessionTimer, TimerSnapshot, DEFAULT_BREAK_MINUTES, DEFAULT_LEARN_MINUTES};
pub use mode::TimerMode;
