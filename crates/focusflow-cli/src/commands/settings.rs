use clap::Subcommand;

use super::open_quiet_timer;

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Show learn and break durations
    Show,
    /// Set the learn duration in minutes (values below 1 become 1)
    Learn {
        #[arg(allow_negative_numbers = true)]
        minutes: i64,
    },
    /// Set the break duration in minutes (values below 1 become 1)
    Break {
        #[arg(allow_negative_numbers = true)]
        minutes: i64,
    },
}

pub fn run(action: SettingsAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut timer = open_quiet_timer()?;

    match action {
        SettingsAction::Show => {}
        SettingsAction::Learn { minutes } => {
            timer.set_learn_duration(minutes)?;
        }
        SettingsAction::Break { minutes } => {
            timer.set_break_duration(minutes)?;
        }
    }

    println!("learn: {} min", timer.learn_duration());
    println!("break: {} min", timer.break_duration());
    Ok(())
}
