//! Command history and up/down recall

/// Submitted lines in chronological order plus a recall cursor.
///
/// The cursor counts back from the newest line: 0 is the last submission,
/// 1 the one before. No cursor means the player isn't browsing.
#[derive(Debug, Clone, Default)]
pub struct CommandHistory {
    lines: Vec<String>,
    cursor: Option<usize>,
}

impl CommandHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a submission; always stops browsing
    pub fn push(&mut self, line: &str) {
        self.lines.push(line.to_string());
        self.cursor = None;
    }

    /// Step to an older line. `None` leaves the input buffer as it is.
    pub fn previous(&mut self) -> Option<&str> {
        if self.lines.is_empty() {
            return None;
        }
        let next = match self.cursor {
            None => 0,
            Some(i) => (i + 1).min(self.lines.len() - 1),
        };
        self.cursor = Some(next);
        self.line_at(next)
    }

    /// Step to a newer line. `None` means back to idle: clear the buffer.
    pub fn next(&mut self) -> Option<&str> {
        match self.cursor {
            Some(i) if i > 0 => {
                self.cursor = Some(i - 1);
                self.line_at(i - 1)
            }
            _ => {
                self.cursor = None;
                None
            }
        }
    }

    /// Cursor position, -1 when idle
    pub fn index(&self) -> isize {
        self.cursor.map(|i| i as isize).unwrap_or(-1)
    }

    pub fn is_browsing(&self) -> bool {
        self.cursor.is_some()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    fn line_at(&self, back: usize) -> Option<&str> {
        self.lines
            .len()
            .checked_sub(back + 1)
            .and_then(|i| self.lines.get(i))
            .map(|s| s.as_str())
    }
}
