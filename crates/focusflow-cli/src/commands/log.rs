use chrono::Local;
use clap::Args;
use focusflow_core::stats::{self, ProgressSummary};
use focusflow_core::Session;

use super::open_quiet_timer;

#[derive(Args)]
pub struct LogArgs {
    /// Show every session instead of today's
    #[arg(long)]
    pub all: bool,
    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: LogArgs) -> Result<(), Box<dyn std::error::Error>> {
    let timer = open_quiet_timer()?;
    let sessions: Vec<&Session> = if args.all {
        timer.sessions().iter().rev().collect()
    } else {
        stats::today_sessions(timer.sessions())
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&sessions)?);
        return Ok(());
    }

    if sessions.is_empty() {
        println!("Complete your first session to see it here.");
        return Ok(());
    }

    println!("{}", if args.all { "Session Log" } else { "Today's Log" });
    for session in sessions {
        println!("{}", render_line(session, args.all));
        if let Some(note) = session.note().filter(|n| !n.is_empty()) {
            println!("        {note}");
        }
    }
    Ok(())
}

pub fn summary(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let timer = open_quiet_timer()?;
    let summary = ProgressSummary::today(timer.sessions());
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Total Learn Time Today: {}", summary.learn_time());
    }
    Ok(())
}

fn render_line(session: &Session, with_date: bool) -> String {
    let local = session.completed_at.with_timezone(&Local);
    let when = if with_date {
        local.format("%Y-%m-%d %H:%M").to_string()
    } else {
        local.format("%H:%M").to_string()
    };
    format!(
        "  {when}  {:<32} {:>8}",
        session.title(),
        stats::format_minutes(session.duration)
    )
}
