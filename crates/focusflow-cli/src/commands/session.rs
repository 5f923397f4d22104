//! Interactive session loop.
//!
//! Owns the one [`SessionTimer`] for the process, turns stdin lines into
//! intents, and keeps a countdown armed only while the timer is active.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use focusflow_core::notify;
use focusflow_core::stats::{format_clock, format_minutes};
use focusflow_core::{Config, CountdownHandle, Event, SharedTimer, TimerMode, TimerSnapshot};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, Mutex};
use tracing::debug;

use super::open_timer;

#[derive(Args)]
pub struct RunArgs {
    /// Start the next interval right away
    #[arg(long)]
    pub start: bool,
    /// Label for the upcoming learn session
    #[arg(long)]
    pub label: Option<String>,
    /// Note for the upcoming learn session
    #[arg(long)]
    pub note: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
enum Intent {
    StartOrPause,
    Stop,
    Label(String),
    Note(String),
    LearnMinutes(i64),
    BreakMinutes(i64),
    Status,
    Help,
    Quit,
    Unknown(String),
}

enum Flow {
    Continue,
    Exit,
}

const HELP: &str = "commands: [enter]/p start-pause | s stop | l <text> label | n <text> note | \
learn <min> | break <min> | ? status | h help | q quit";

fn parse_intent(line: &str) -> Intent {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    match word {
        "" | "p" | "pause" | "start" => Intent::StartOrPause,
        "s" | "stop" => Intent::Stop,
        "l" | "label" => Intent::Label(rest.to_string()),
        "n" | "note" => Intent::Note(rest.to_string()),
        "learn" | "break" => match rest.parse::<i64>() {
            Ok(minutes) if word == "learn" => Intent::LearnMinutes(minutes),
            Ok(minutes) => Intent::BreakMinutes(minutes),
            Err(_) => Intent::Unknown(line.to_string()),
        },
        "?" | "status" => Intent::Status,
        "h" | "help" => Intent::Help,
        "q" | "quit" | "exit" => Intent::Quit,
        _ => Intent::Unknown(line.to_string()),
    }
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let timer = open_timer(notify::from_config(&config.notifications))?;
    let period = config.tick_interval();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(drive(Arc::new(Mutex::new(timer)), period, args));
    // A pending stdin read would otherwise hold up shutdown.
    runtime.shutdown_background();
    result
}

async fn drive(
    timer: SharedTimer,
    period: Duration,
    args: RunArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut countdown: Option<CountdownHandle> = None;

    {
        let mut guard = timer.lock().await;
        if let Some(label) = args.label {
            guard.set_label(label);
        }
        if let Some(note) = args.note {
            guard.set_note(note);
        }
        print_status(&guard.snapshot());
    }
    println!("{HELP}");

    if args.start {
        apply(Intent::StartOrPause, &timer, &tx, period, &mut countdown).await;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let flow = tokio::select! {
            line = lines.next_line() => {
                let intent = match line? {
                    Some(line) => parse_intent(&line),
                    None => Intent::Quit,
                };
                apply(intent, &timer, &tx, period, &mut countdown).await
            }
            Some(event) = rx.recv() => {
                render(&event);
                if event.ends_interval() && countdown.as_ref().is_some_and(|c| c.is_finished()) {
                    countdown = None;
                }
                Flow::Continue
            }
            _ = tokio::signal::ctrl_c() => {
                apply(Intent::Quit, &timer, &tx, period, &mut countdown).await
            }
        };
        if let Flow::Exit = flow {
            break;
        }
    }

    debug!("session loop finished");
    Ok(())
}

async fn apply(
    intent: Intent,
    timer: &SharedTimer,
    tx: &mpsc::UnboundedSender<Event>,
    period: Duration,
    countdown: &mut Option<CountdownHandle>,
) -> Flow {
    let mut guard = timer.lock().await;
    match intent {
        Intent::StartOrPause => {
            let event = guard.start_or_pause();
            let active = guard.is_active();
            drop(guard);
            *countdown = if active {
                Some(CountdownHandle::arm(timer.clone(), period, tx.clone()))
            } else {
                None
            };
            render(&event);
        }
        Intent::Stop => {
            *countdown = None;
            match guard.stop() {
                Some(event) => render(&event),
                None => println!("nothing is running"),
            }
        }
        Intent::Label(text) => {
            if !guard.set_label(text) {
                println!("labels can only be set before a learn session");
            }
        }
        Intent::Note(text) => {
            if !guard.set_note(text) {
                println!("notes can only be set before a learn session");
            }
        }
        Intent::LearnMinutes(minutes) => match guard.set_learn_duration(minutes) {
            Ok(minutes) => println!("learn: {minutes} min"),
            Err(e) => println!("{e}"),
        },
        Intent::BreakMinutes(minutes) => match guard.set_break_duration(minutes) {
            Ok(minutes) => println!("break: {minutes} min"),
            Err(e) => println!("{e}"),
        },
        Intent::Status => print_status(&guard.snapshot()),
        Intent::Help => println!("{HELP}"),
        Intent::Quit => {
            *countdown = None;
            if let Some(event) = guard.stop() {
                render(&event);
            }
            return Flow::Exit;
        }
        Intent::Unknown(line) => println!("unknown command: {line} (h for help)"),
    }
    Flow::Continue
}

fn status_line(snapshot: &TimerSnapshot) -> String {
    let mode = snapshot.display_mode();
    let state = match (snapshot.mode, snapshot.is_active) {
        (TimerMode::Idle, _) => format!("ready to {mode}"),
        (_, true) => mode.to_string(),
        (_, false) => format!("{mode} (paused)"),
    };
    format!(
        "{}  {}  [learn {} min / break {} min]",
        format_clock(snapshot.time_left),
        state.to_uppercase(),
        snapshot.learn_duration,
        snapshot.break_duration
    )
}

fn print_status(snapshot: &TimerSnapshot) {
    println!("{}", status_line(snapshot));
    if snapshot.accepts_learn_details() {
        if !snapshot.label.is_empty() {
            println!("label: {}", snapshot.label);
        }
        if !snapshot.note.is_empty() {
            println!("note: {}", snapshot.note);
        }
    }
}

fn render(event: &Event) {
    match event {
        Event::Ticked {
            mode, time_left, ..
        } => {
            print!("\r{}  {}   ", format_clock(*time_left), mode.as_str().to_uppercase());
            let _ = std::io::stdout().flush();
        }
        Event::TimerStarted {
            mode,
            duration_secs,
            ..
        } => println!("started {mode} ({})", format_clock(*duration_secs)),
        Event::TimerPaused {
            mode, time_left, ..
        } => println!("\npaused {mode} at {}", format_clock(*time_left)),
        Event::TimerResumed {
            mode, time_left, ..
        } => println!("resumed {mode} at {}", format_clock(*time_left)),
        Event::SessionEnded {
            session, next_mode, ..
        } => println!(
            "\n{} complete ({}). Ready to {next_mode}.",
            session.title(),
            format_minutes(session.duration)
        ),
        Event::TimerStopped {
            mode,
            session,
            next_mode,
            ..
        } => match session {
            Some(session) => println!(
                "\nstopped {mode}, logged {} ({}). Ready to {next_mode}.",
                session.title(),
                format_minutes(session.duration)
            ),
            None => println!("\nstopped {mode}, nothing logged. Ready to {next_mode}."),
        },
        Event::StateSnapshot(snapshot) => print_status(snapshot),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_enter_as_start_pause() {
        assert_eq!(parse_intent(""), Intent::StartOrPause);
        assert_eq!(parse_intent("  p "), Intent::StartOrPause);
    }

    #[test]
    fn parses_label_with_spaces() {
        assert_eq!(
            parse_intent("l React hooks deep dive"),
            Intent::Label("React hooks deep dive".into())
        );
        assert_eq!(parse_intent("note"), Intent::Note(String::new()));
    }

    #[test]
    fn parses_durations() {
        assert_eq!(parse_intent("learn 45"), Intent::LearnMinutes(45));
        assert_eq!(parse_intent("break -2"), Intent::BreakMinutes(-2));
        assert_eq!(
            parse_intent("break soon"),
            Intent::Unknown("break soon".into())
        );
    }

    fn snapshot(mode: TimerMode, next_mode: TimerMode, is_active: bool) -> TimerSnapshot {
        TimerSnapshot {
            mode,
            next_mode,
            is_active,
            time_left: 300,
            learn_duration: 25,
            break_duration: 5,
            label: String::new(),
            note: String::new(),
            at: chrono::Utc::now(),
        }
    }

    #[test]
    fn status_line_names_pending_mode_when_idle() {
        let line = status_line(&snapshot(TimerMode::Idle, TimerMode::Break, false));
        assert_eq!(line, "05:00  READY TO BREAK  [learn 25 min / break 5 min]");
    }

    #[test]
    fn status_line_marks_paused_interval() {
        let line = status_line(&snapshot(TimerMode::Learn, TimerMode::Learn, false));
        assert!(line.contains("LEARN (PAUSED)"), "{line}");
        let line = status_line(&snapshot(TimerMode::Break, TimerMode::Break, true));
        assert!(line.contains("  BREAK  "), "{line}");
    }

    #[test]
    fn parses_quit_and_unknown() {
        assert_eq!(parse_intent("q"), Intent::Quit);
        assert_eq!(parse_intent("dance"), Intent::Unknown("dance".into()));
    }
}
