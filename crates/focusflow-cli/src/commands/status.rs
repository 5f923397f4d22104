use super::open_quiet_timer;
use focusflow_core::Event;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let timer = open_quiet_timer()?;
    let snapshot = Event::StateSnapshot(timer.snapshot());
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
