use std::fmt;

use serde::{Deserialize, Serialize};

/// The interval type currently running, or `Idle` when nothing is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerMode {
    Idle,
    Learn,
    Break,
}

impl TimerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerMode::Idle => "idle",
            TimerMode::Learn => "learn",
            TimerMode::Break => "break",
        }
    }

    /// The interval that follows this one. Idle has no successor.
    pub fn following(&self) -> Option<TimerMode> {
        match self {
            TimerMode::Idle => None,
            TimerMode::Learn => Some(TimerMode::Break),
            TimerMode::Break => Some(TimerMode::Learn),
        }
    }
}

impl fmt::Display for TimerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modes_alternate() {
        assert_eq!(TimerMode::Learn.following(), Some(TimerMode::Break));
        assert_eq!(TimerMode::Break.following(), Some(TimerMode::Learn));
        assert_eq!(TimerMode::Idle.following(), None);
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&TimerMode::Break).unwrap(), "\"break\"");
    }
}
