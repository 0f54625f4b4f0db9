//! Profile commands.
//!
//! Direct edits to the profile document. XP itself is only ever changed by
//! the session loop.

use clap::Subcommand;
use serde_json::json;
use xptrack_core::Config;

use super::open_session;

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Show the profile with derived stats
    Show,
    /// Change the display name
    Rename {
        name: String,
    },
    /// Change the hour the day-start window opens at (0-23)
    StartHour {
        hour: u32,
    },
    /// Add (or with a negative value, remove) love XP
    Love {
        #[arg(allow_negative_numbers = true)]
        delta: i64,
    },
}

pub fn run(action: ProfileAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let mut session = open_session(&config)?;

    let profile = match action {
        ProfileAction::Show => {
            let output = json!({
                "profile": session.profile(),
                "stats": session.stats(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(());
        }
        ProfileAction::Rename { name } => {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err("name must not be empty".into());
            }
            session.update_profile(|p| p.username = name)?
        }
        ProfileAction::StartHour { hour } => {
            if hour > 23 {
                return Err(format!("start hour must be between 0 and 23, got {hour}").into());
            }
            session.update_profile(|p| p.start_hour = hour)?
        }
        ProfileAction::Love { delta } => session.update_profile(|p| {
            p.add_love_xp(delta);
        })?,
    };
    println!("{}", serde_json::to_string_pretty(profile)?);
    Ok(())
}
