use serde_json::json;
use xptrack_core::{Config, LevelEta};

use super::open_session;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let session = open_session(&config)?;
    let profile = session.profile();
    let stats = session.stats();

    let eta = match stats.eta {
        LevelEta::Days { days } => format!("{days:.1} days"),
        LevelEta::NegativeTrend => "Negative XP trend".to_string(),
    };
    let output = json!({
        "username": profile.username,
        "level": stats.level.level,
        "xp": profile.xp,
        "xp_into_level": stats.level.xp_into_level,
        "xp_for_next": stats.level.xp_for_next,
        "xp_bar": stats.xp_bar.to_string(),
        "love_xp": profile.love_xp,
        "love_bar": stats.love_bar.to_string(),
        "earned_today": profile.earned_xp_display,
        "lost_today": profile.lost_xp_display,
        "average_daily_xp": stats.average_daily_xp,
        "next_level_in": eta,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
