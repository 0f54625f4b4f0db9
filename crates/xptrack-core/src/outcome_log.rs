//! Append-only, human-readable log of task outcomes.
//!
//! Each non-empty batch of transitions becomes a dated section:
//!
//! ```text
//!
//! === 2026-06-15 ===
//! 2026-06-15 10:01 - ✅ Study (+100 XP)
//! 2026-06-15 10:01 - ❌ Run (-37 XP)
//! ```

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::error::Result;
use crate::scheduler::{Outcome, Transition};

/// Destination for outcome records. Implementations must only ever append.
pub trait OutcomeLog {
    /// Append one section for `transitions`. Empty batches write nothing.
    fn append(&mut self, transitions: &[Transition], date: NaiveDate) -> Result<()>;

    /// Everything written so far, for display.
    fn read_all(&self) -> Result<String>;
}

/// One log line for a transition.
pub fn format_line(transition: &Transition) -> String {
    let glyph = match transition.outcome {
        Outcome::Completed => "✅",
        Outcome::Failed => "❌",
    };
    format!(
        "{} - {} {} ({:+} XP)",
        transition.at.format("%Y-%m-%d %H:%M"),
        glyph,
        transition.task_name,
        transition.delta
    )
}

/// Header plus lines for a batch, or `None` for an empty batch.
pub fn format_section(transitions: &[Transition], date: NaiveDate) -> Option<String> {
    if transitions.is_empty() {
        return None;
    }
    let mut section = format!("\n=== {} ===\n", date.format("%Y-%m-%d"));
    for transition in transitions {
        section.push_str(&format_line(transition));
        section.push('\n');
    }
    Some(section)
}

/// Text file opened in append mode for every batch.
#[derive(Debug, Clone)]
pub struct FileOutcomeLog {
    path: PathBuf,
}

impl FileOutcomeLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutcomeLog for FileOutcomeLog {
    fn append(&mut self, transitions: &[Transition], date: NaiveDate) -> Result<()> {
        let Some(section) = format_section(transitions, date) else {
            return Ok(());
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(section.as_bytes())?;
        tracing::debug!(path = %self.path.display(), entries = transitions.len(), "outcome log appended");
        Ok(())
    }

    fn read_all(&self) -> Result<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory log for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryOutcomeLog {
    content: String,
}

impl MemoryOutcomeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

impl OutcomeLog for MemoryOutcomeLog {
    fn append(&mut self, transitions: &[Transition], date: NaiveDate) -> Result<()> {
        if let Some(section) = format_section(transitions, date) {
            self.content.push_str(&section);
        }
        Ok(())
    }

    fn read_all(&self) -> Result<String> {
        Ok(self.content.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 15).unwrap()
    }

    fn transition(name: &str, delta: i64, outcome: Outcome) -> Transition {
        Transition {
            at: date().and_hms_opt(10, 1, 0).unwrap(),
            task_id: Uuid::new_v4(),
            task_name: name.to_string(),
            delta,
            outcome,
        }
    }

    #[test]
    fn lines_carry_signed_delta() {
        assert_eq!(
            format_line(&transition("Study", 100, Outcome::Completed)),
            "2026-06-15 10:01 - ✅ Study (+100 XP)"
        );
        assert_eq!(
            format_line(&transition("Run", -37, Outcome::Failed)),
            "2026-06-15 10:01 - ❌ Run (-37 XP)"
        );
    }

    #[test]
    fn empty_batch_writes_no_header() {
        let mut log = MemoryOutcomeLog::new();
        log.append(&[], date()).unwrap();
        assert!(log.content().is_empty());
    }

    #[test]
    fn file_log_only_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("xp_log.txt");
        std::fs::write(&path, "earlier content\n").unwrap();

        let mut log = FileOutcomeLog::new(&path);
        log.append(&[transition("Study", 100, Outcome::Completed)], date())
            .unwrap();
        log.append(&[], date()).unwrap();
        log.append(&[transition("Run", -37, Outcome::Failed)], date())
            .unwrap();

        let content = log.read_all().unwrap();
        assert!(content.starts_with("earlier content\n"));
        assert_eq!(content.matches("=== 2026-06-15 ===").count(), 2);
        assert!(content.ends_with("❌ Run (-37 XP)\n"));
    }

    #[test]
    fn missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let log = FileOutcomeLog::new(dir.path().join("absent.txt"));
        assert_eq!(log.read_all().unwrap(), "");
    }
}
