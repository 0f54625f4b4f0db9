use clap::{Args, ValueEnum};
use uuid::Uuid;
use xptrack_core::Config;

use super::{now, open_session};

#[derive(Clone, Copy, ValueEnum)]
pub enum Answer {
    Yes,
    No,
}

#[derive(Args)]
pub struct TickArgs {
    /// Confirm that the task with this ID was completed
    #[arg(long = "yes", value_name = "ID")]
    completed: Vec<Uuid>,
    /// Report that the task with this ID was not completed
    #[arg(long = "no", value_name = "ID")]
    failed: Vec<Uuid>,
    /// Answer the day-start question
    #[arg(long, value_enum)]
    start_day: Option<Answer>,
}

pub fn run(args: TickArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let mut session = open_session(&config)?;

    for id in args.completed {
        session.answer_task(id, true)?;
    }
    for id in args.failed {
        session.answer_task(id, false)?;
    }
    if let Some(answer) = args.start_day {
        session.answer_day_start(matches!(answer, Answer::Yes));
    }

    let output = session.tick(now())?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
