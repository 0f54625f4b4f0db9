//! Interactive session loop.
//!
//! Ticks on the configured interval and reads answers from stdin between
//! ticks. Stops on `q` or Ctrl-C.

use std::time::Duration;

use chrono::Local;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;
use xptrack_core::{Config, Event, Prompt, SlotOutcome, TickOutput};

use super::{now, open_session, FileSession};

const HELP: &str = "commands: y | n (answer the first question), add <N> <H>[,<H>...], q";

#[derive(PartialEq)]
enum Flow {
    Continue,
    Quit,
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(session_loop(config))
}

async fn session_loop(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_session(&config)?;
    let mut interval = tokio::time::interval(Duration::from_secs(config.session.tick_interval_secs));
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let mut screen = Screen::default();

    println!("{HELP}");
    loop {
        tokio::select! {
            _ = interval.tick() => {
                let output = session.tick(now())?;
                screen.render(&output);
            }
            line = lines.next_line(), if stdin_open => {
                match line? {
                    Some(line) => {
                        if handle_line(&mut session, &mut screen, line.trim()) == Flow::Quit {
                            break;
                        }
                        interval.reset_immediately();
                    }
                    None => stdin_open = false,
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    tracing::debug!("session loop stopped");
    Ok(())
}

fn handle_line(session: &mut FileSession, screen: &mut Screen, line: &str) -> Flow {
    let mut words = line.split_whitespace();
    match words.next() {
        None => {}
        Some("q" | "quit") => return Flow::Quit,
        Some(answer @ ("y" | "yes" | "n" | "no")) => {
            let yes = answer.starts_with('y');
            match screen.pending.first().cloned() {
                Some(Prompt::DayStart { .. }) => session.answer_day_start(yes),
                Some(Prompt::ConfirmTask { task_id, .. }) => {
                    if let Err(e) = session.answer_task(task_id, yes) {
                        eprintln!("error: {e}");
                    }
                }
                None => println!("nothing to answer"),
            }
            if !screen.pending.is_empty() {
                screen.pending.remove(0);
            }
        }
        Some("add") => match parse_add(words.collect::<Vec<_>>().join(" ").as_str()) {
            Some((index, hours)) => {
                match session.request_add(index, &hours, Local::now().date_naive()) {
                    Ok(outcomes) => outcomes.iter().for_each(|o| println!("{}", describe_slot(o))),
                    Err(e) => eprintln!("error: {e}"),
                }
            }
            None => println!("usage: add <N> <H>[,<H>...]"),
        },
        Some(_) => println!("{HELP}"),
    }
    Flow::Continue
}

/// `"<N> <H>[,<H>...]"` with a 1-based catalog number.
fn parse_add(args: &str) -> Option<(usize, Vec<u32>)> {
    let (number, hours) = args.trim().split_once(char::is_whitespace)?;
    let index = number.parse::<usize>().ok()?.checked_sub(1)?;
    let hours = hours
        .split([',', ' '])
        .filter(|h| !h.is_empty())
        .map(str::parse)
        .collect::<Result<Vec<u32>, _>>()
        .ok()?;
    (!hours.is_empty()).then_some((index, hours))
}

fn describe_slot(outcome: &SlotOutcome) -> String {
    match outcome {
        SlotOutcome::Accepted { hour, task } => format!("{hour:02}:00 scheduled {}", task.name),
        SlotOutcome::Conflict { hour, conflict } => format!("{hour:02}:00 rejected: {conflict}"),
        SlotOutcome::InvalidHour { hour } => format!("{hour}: not an hour of the day"),
    }
}

fn describe_event(event: &Event) -> String {
    match event {
        Event::DecayApplied {
            elapsed_days,
            xp_before,
            xp_after,
            ..
        } => format!("{elapsed_days} day(s) away: XP {xp_before} -> {xp_after}"),
        Event::DayStarted { .. } => "day started, scheduling open".to_string(),
        Event::DayDeclined { .. } => "day not started, scheduling closed".to_string(),
        Event::SchedulingWindowMissed { xp_lost, .. } => {
            format!("day-start window missed: -{xp_lost} XP, scheduling closed")
        }
        Event::TaskStarted { task_name, .. } => format!("started {task_name}"),
        Event::TaskCompleted {
            task_name,
            xp_gained,
            ..
        } => format!("✅ {task_name} (+{xp_gained} XP)"),
        Event::TaskFailed {
            task_name, xp_lost, ..
        } => format!("❌ {task_name} (-{xp_lost} XP)"),
        Event::LevelChanged { from, to, .. } => format!("level {from} -> {to}"),
    }
}

fn describe_prompt(prompt: &Prompt) -> String {
    match prompt {
        Prompt::DayStart { start_hour, .. } => {
            format!("Start your day? Window closes at {:02}:00 [y/n]", start_hour + 1)
        }
        Prompt::ConfirmTask { task_name, .. } => format!("Did you complete '{task_name}'? [y/n]"),
    }
}

/// Prints only what changed since the previous tick.
#[derive(Default)]
struct Screen {
    status: String,
    asked: Vec<Prompt>,
    pending: Vec<Prompt>,
}

impl Screen {
    fn render(&mut self, output: &TickOutput) {
        for event in &output.events {
            println!("{}", describe_event(event));
        }

        let status = status_line(output);
        if status != self.status {
            println!("{status}");
            self.status = status;
        }

        if output.prompts != self.asked {
            for prompt in &output.prompts {
                println!("{}", describe_prompt(prompt));
            }
            self.asked = output.prompts.clone();
        }
        self.pending = output.prompts.clone();
    }
}

fn status_line(output: &TickOutput) -> String {
    let stats = &output.stats;
    let current = output
        .current
        .as_ref()
        .map_or_else(|| "-".to_string(), |t| t.name.clone());
    let next = output.next.as_ref().map_or_else(
        || "-".to_string(),
        |t| format!("{} at {}", t.name, t.start.format("%H:%M")),
    );
    format!(
        "{} Lv {} {} {}/{} XP | love {} {} | now: {} | next: {}",
        output.profile.username,
        stats.level.level,
        stats.xp_bar,
        stats.level.xp_into_level,
        stats.level.xp_for_next,
        stats.love_bar,
        output.profile.love_xp,
        current,
        next
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_add_accepts_commas_and_spaces() {
        assert_eq!(parse_add("2 9,14"), Some((1, vec![9, 14])));
        assert_eq!(parse_add("1 9 10"), Some((0, vec![9, 10])));
    }

    #[test]
    fn parse_add_rejects_bad_input() {
        assert_eq!(parse_add("0 9"), None);
        assert_eq!(parse_add("1"), None);
        assert_eq!(parse_add("1 nine"), None);
        assert_eq!(parse_add("x 9"), None);
    }
}
