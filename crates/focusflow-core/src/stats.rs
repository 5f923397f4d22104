//! Daily views over the session log and display formatting.
//!
//! "Today" is the local calendar date of each session's `completed_at`.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::session::Session;

/// Totals for one local calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSummary {
    pub day: NaiveDate,
    pub learn_secs: u64,
    pub learn_sessions: u64,
    pub break_sessions: u64,
}

impl ProgressSummary {
    pub fn for_day(sessions: &[Session], day: NaiveDate) -> Self {
        let mut summary = Self {
            day,
            learn_secs: 0,
            learn_sessions: 0,
            break_sessions: 0,
        };
        for session in sessions.iter().filter(|s| local_day(s.completed_at) == day) {
            if session.is_learn() {
                summary.learn_secs += session.duration;
                summary.learn_sessions += 1;
            } else {
                summary.break_sessions += 1;
            }
        }
        summary
    }

    pub fn today(sessions: &[Session]) -> Self {
        Self::for_day(sessions, Local::now().date_naive())
    }

    /// Total learn time, e.g. `"1h 5m"`.
    pub fn learn_time(&self) -> String {
        format_total_time(self.learn_secs)
    }
}

/// Sessions completed on `day`, newest first.
pub fn sessions_on(sessions: &[Session], day: NaiveDate) -> Vec<&Session> {
    sessions
        .iter()
        .rev()
        .filter(|s| local_day(s.completed_at) == day)
        .collect()
}

pub fn today_sessions(sessions: &[Session]) -> Vec<&Session> {
    sessions_on(sessions, Local::now().date_naive())
}

fn local_day(at: DateTime<Utc>) -> NaiveDate {
    at.with_timezone(&Local).date_naive()
}

/// `"{h}h {m}m"`, leaving out hours when zero. `"0m"` for nothing.
pub fn format_total_time(secs: u64) -> String {
    if secs == 0 {
        return "0m".to_string();
    }
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let mut parts = Vec::with_capacity(2);
    if hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if minutes > 0 || hours == 0 {
        parts.push(format!("{minutes}m"));
    }
    parts.join(" ")
}

/// Countdown face, `MM:SS`. Minutes grow past two digits when needed.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Whole minutes for the session log, e.g. `"24 min"`.
pub fn format_minutes(secs: u64) -> String {
    format!("{} min", secs / 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionKind;
    use chrono::TimeZone;

    fn at_local(day: u32, hour: u32) -> DateTime<Utc> {
        Local
            .with_ymd_and_hms(2026, 10, day, hour, 0, 0)
            .earliest()
            .unwrap()
            .with_timezone(&Utc)
    }

    fn learn(secs: u64, at: DateTime<Utc>) -> Session {
        Session::completed_at(
            SessionKind::Learn {
                label: None,
                note: None,
            },
            secs,
            at,
        )
    }

    #[test]
    fn total_time_formatting() {
        assert_eq!(format_total_time(0), "0m");
        assert_eq!(format_total_time(59), "0m");
        assert_eq!(format_total_time(25 * 60), "25m");
        assert_eq!(format_total_time(3600), "1h");
        assert_eq!(format_total_time(3900), "1h 5m");
    }

    #[test]
    fn clock_formatting() {
        assert_eq!(format_clock(1500), "25:00");
        assert_eq!(format_clock(61), "01:01");
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(120 * 60), "120:00");
    }

    #[test]
    fn minutes_round_down() {
        assert_eq!(format_minutes(59), "0 min");
        assert_eq!(format_minutes(1500), "25 min");
    }

    #[test]
    fn summary_counts_only_learn_time_of_that_day() {
        let day = NaiveDate::from_ymd_opt(2026, 10, 15).unwrap();
        let sessions = vec![
            learn(1500, at_local(14, 12)),
            learn(1500, at_local(15, 9)),
            Session::completed_at(SessionKind::Break, 300, at_local(15, 10)),
            learn(600, at_local(15, 11)),
        ];

        let summary = ProgressSummary::for_day(&sessions, day);
        assert_eq!(summary.learn_secs, 2100);
        assert_eq!(summary.learn_sessions, 2);
        assert_eq!(summary.break_sessions, 1);
        assert_eq!(summary.learn_time(), "35m");
    }

    #[test]
    fn day_log_is_newest_first() {
        let day = NaiveDate::from_ymd_opt(2026, 10, 15).unwrap();
        let sessions = vec![
            learn(60, at_local(15, 9)),
            learn(120, at_local(14, 9)),
            learn(180, at_local(15, 10)),
        ];
        let log: Vec<u64> = sessions_on(&sessions, day).iter().map(|s| s.duration).collect();
        assert_eq!(log, vec![180, 60]);
    }
}
