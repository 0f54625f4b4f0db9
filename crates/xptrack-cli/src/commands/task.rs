//! Scheduled task commands.

use chrono::Local;
use clap::Subcommand;
use serde::Serialize;
use xptrack_core::{Config, ScheduledTask};

use super::{now, open_session};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Schedule a catalog task at one or more hours today
    Add {
        /// Catalog entry number, as shown by `catalog list` (1-based)
        template: usize,
        /// Start hours, space or comma separated (e.g. 9,14)
        #[arg(required = true, num_args = 1.., value_delimiter = ',')]
        hours: Vec<u32>,
    },
    /// List today's schedule
    List,
}

#[derive(Serialize)]
struct TaskRow<'a> {
    #[serde(flatten)]
    task: &'a ScheduledTask,
    end: chrono::NaiveDateTime,
    glyph: &'static str,
    current: bool,
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let mut session = open_session(&config)?;

    match action {
        TaskAction::Add { template, hours } => {
            let index = template
                .checked_sub(1)
                .ok_or("catalog entries are numbered from 1")?;
            let outcomes = session.request_add(index, &hours, Local::now().date_naive())?;
            println!("{}", serde_json::to_string_pretty(&outcomes)?);
        }
        TaskAction::List => {
            let now = now();
            let rows: Vec<_> = session
                .schedule()
                .tasks()
                .iter()
                .map(|task| TaskRow {
                    task,
                    end: task.end(),
                    glyph: task.status.glyph(),
                    current: !task.is_terminal() && task.contains(now),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
    }
    Ok(())
}
