//! Session records.
//!
//! A [`Session`] is written once, when an interval runs to zero or is
//! stopped by hand, and never changes afterwards. Only learn sessions carry
//! a label and note, so those live on the [`SessionKind::Learn`] variant.
//!
//! On disk a session is a flat JSON object:
//!
//! ```text
//! {"id":"…","type":"learn","label":"Rust","note":"traits","duration":1500,"completedAt":"2026-10-15T09:30:00Z"}
//! {"id":"…","type":"break","duration":300,"completedAt":"2026-10-15T09:35:00Z"}
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::timer::TimerMode;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SessionKind {
    Learn {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        note: Option<String>,
    },
    Break,
}

impl SessionKind {
    /// Build the kind for a session that ran in `mode`.
    ///
    /// Returns `None` for [`TimerMode::Idle`], which never produces a record.
    /// Label and note are dropped for breaks; blank text is stored as absent.
    pub fn for_mode(mode: TimerMode, label: &str, note: &str) -> Option<Self> {
        match mode {
            TimerMode::Idle => None,
            TimerMode::Learn => Some(SessionKind::Learn {
                label: non_blank(label),
                note: non_blank(note),
            }),
            TimerMode::Break => Some(SessionKind::Break),
        }
    }

    pub fn mode(&self) -> TimerMode {
        match self {
            SessionKind::Learn { .. } => TimerMode::Learn,
            SessionKind::Break => TimerMode::Break,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    #[serde(flatten)]
    pub kind: SessionKind,
    /// Seconds actually spent in the interval.
    pub duration: u64,
    pub completed_at: DateTime<Utc>,
}

impl Session {
    /// Create a record completed now.
    pub fn new(kind: SessionKind, duration: u64) -> Self {
        Self::completed_at(kind, duration, Utc::now())
    }

    pub fn completed_at(kind: SessionKind, duration: u64, at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            duration,
            completed_at: at,
        }
    }

    pub fn mode(&self) -> TimerMode {
        self.kind.mode()
    }

    pub fn is_learn(&self) -> bool {
        matches!(self.kind, SessionKind::Learn { .. })
    }

    pub fn label(&self) -> Option<&str> {
        match &self.kind {
            SessionKind::Learn { label, .. } => label.as_deref(),
            SessionKind::Break => None,
        }
    }

    pub fn note(&self) -> Option<&str> {
        match &self.kind {
            SessionKind::Learn { note, .. } => note.as_deref(),
            SessionKind::Break => None,
        }
    }

    /// Heading shown in the session log.
    pub fn title(&self) -> &str {
        match &self.kind {
            SessionKind::Learn { label, .. } => label
                .as_deref()
                .filter(|l| !l.is_empty())
                .unwrap_or("Learn Session"),
            SessionKind::Break => "Break",
        }
    }
}

fn non_blank(text: &str) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
