//! Terminal output log

use crate::data::Category;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tokio::sync::mpsc::UnboundedSender;

/// One line or block of terminal output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub category: Category,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl TranscriptEntry {
    pub fn new(category: Category, text: impl Into<String>) -> Self {
        Self {
            category,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(Category::Info, text)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(Category::Success, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(Category::Error, text)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(Category::Warning, text)
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Category::System, text)
    }
}

/// Append-only output, trimmed from the front past `max_entries`
#[derive(Debug, Clone)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
    max_entries: usize,
}

impl Transcript {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_entries: max_entries.max(1),
        }
    }

    pub fn push(&mut self, entry: TranscriptEntry) {
        self.entries.push(entry);
        if self.entries.len() > self.max_entries {
            let excess = self.entries.len() - self.max_entries;
            self.entries.drain(..excess);
        }
    }

    pub fn extend(&mut self, entries: impl IntoIterator<Item = TranscriptEntry>) {
        for entry in entries {
            self.push(entry);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Lines a handler prints while it works.
///
/// They are kept for the final transcript and, when a live channel is
/// attached, forwarded as they happen so the UI can show them before the
/// command finishes.
#[derive(Debug, Default)]
pub struct Progress {
    lines: Mutex<Vec<TranscriptEntry>>,
    live: Option<UnboundedSender<TranscriptEntry>>,
}

impl Progress {
    pub fn new(live: Option<UnboundedSender<TranscriptEntry>>) -> Self {
        Self {
            lines: Mutex::new(Vec::new()),
            live,
        }
    }

    pub fn emit(&self, entry: TranscriptEntry) {
        if let Some(live) = &self.live {
            // Receiver gone means nobody is watching; the line is still kept
            let _ = live.send(entry.clone());
        }
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(entry);
    }

    pub fn into_lines(self) -> Vec<TranscriptEntry> {
        self.lines
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_insertion_order_and_trims_oldest() {
        let mut transcript = Transcript::new(3);
        for i in 0..5 {
            transcript.push(TranscriptEntry::info(format!("line {}", i)));
        }
        let texts: Vec<_> = transcript.entries().iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["line 2", "line 3", "line 4"]);
    }

    #[test]
    fn clear_empties_everything() {
        let mut transcript = Transcript::new(10);
        transcript.push(TranscriptEntry::system("$ ls"));
        transcript.clear();
        assert!(transcript.is_empty());
    }

    #[test]
    fn progress_forwards_and_keeps_lines() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let progress = Progress::new(Some(tx));
        progress.emit(TranscriptEntry::info("Scanning..."));

        assert_eq!(rx.try_recv().unwrap().text, "Scanning...");
        let lines = progress.into_lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].category, Category::Info);
    }
}
