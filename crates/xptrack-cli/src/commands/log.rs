use clap::Subcommand;
use xptrack_core::{FileOutcomeLog, JsonFileStore, OutcomeLog};

#[derive(Subcommand)]
pub enum LogAction {
    /// Print the outcome log
    Show {
        /// Only the last N lines
        #[arg(long)]
        tail: Option<usize>,
    },
}

pub fn run(action: LogAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = JsonFileStore::open()?;
    let log = FileOutcomeLog::new(store.log_path());

    match action {
        LogAction::Show { tail } => {
            let content = log.read_all()?;
            match tail {
                Some(n) => {
                    let lines: Vec<&str> = content.lines().collect();
                    for line in &lines[lines.len().saturating_sub(n)..] {
                        println!("{line}");
                    }
                }
                None => print!("{content}"),
            }
        }
    }
    Ok(())
}
