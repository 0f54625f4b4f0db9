//! XP and level arithmetic.
//!
//! Everything here is a pure function of its inputs. The profile never stores
//! a level independently; it calls [`level_for`] after every XP mutation.

mod bar;
mod level;

pub use bar::{progress_bar, ProgressBar, BAR_WIDTH};
pub use level::{
    average_daily_xp, days_to_next_level, level_for, xp_for_level, LevelEta, LevelInfo,
    HISTORY_WINDOW,
};
