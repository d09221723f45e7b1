//! Core game logic and session management

pub mod command;
pub mod dispatcher;
pub mod history;
pub mod odds;
pub mod registry;
pub mod result;
pub mod state;
pub mod transcript;

pub use command::{Command, CommandError, CommandKind, COMMAND_TABLE};
pub use dispatcher::{Dispatch, Dispatcher};
pub use history::CommandHistory;
pub use odds::{Dice, FixedDice, Odds, ThreadDice, ToolEdge};
pub use registry::CommandRegistry;
pub use result::CommandResult;
pub use state::{GameEvent, GameState, InstalledProgram, Rules, MAX_DETECTION};
pub use transcript::{Progress, Transcript, TranscriptEntry};

use crate::data::Id;
use crate::GameError;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

/// Detection levels that trigger a warning when crossed
pub const DETECTION_WARNINGS: [u32; 2] = [50, 75];

/// A command accepted by the session and not yet completed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCommand {
    pub line: String,
    pub snapshot: GameState, // State the handlers will read
}

/// One player's terminal session
#[derive(Debug, Clone)]
pub struct Session {
    /// Correlates log lines for this session
    pub id: Id,

    /// Live game state
    pub state: GameState,

    /// Everything printed so far
    pub transcript: Transcript,

    /// Submitted lines and recall cursor
    pub history: CommandHistory,

    pub started_at: DateTime<Utc>,

    rules: Rules,
    busy: bool,
}

impl Session {
    pub fn new(state: GameState, rules: Rules, max_entries: usize) -> Self {
        let mut transcript = Transcript::new(max_entries);
        transcript.push(TranscriptEntry::info(format!(
            "Welcome to Terminal Hacker v{}",
            crate::VERSION
        )));
        transcript.push(TranscriptEntry::info(
            "Type 'help' for a list of available commands.",
        ));

        Self {
            id: Id::new(),
            state,
            transcript,
            history: CommandHistory::new(),
            started_at: Utc::now(),
            rules,
            busy: false,
        }
    }

    /// True while a command is in flight
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Accept a line for processing.
    ///
    /// Blank input is ignored and never recorded. A second command while one
    /// is in flight is rejected rather than queued.
    pub fn begin(&mut self, line: &str) -> Result<Option<PendingCommand>, GameError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        if self.busy {
            return Err(GameError::Busy(line.to_string()));
        }

        self.history.push(line);
        self.busy = true;
        Ok(Some(PendingCommand {
            line: line.to_string(),
            snapshot: self.state.clone(),
        }))
    }

    /// Apply a finished command and release the busy guard.
    ///
    /// Effects are applied all at once; if any of them is invalid the state
    /// stays as it was and the command is reported as failed.
    pub fn complete(&mut self, dispatch: Option<Dispatch>) -> Option<CommandResult> {
        self.busy = false;
        let Dispatch { mut result, mut entries, keyword } = dispatch?;

        if result.clear_transcript {
            self.transcript.clear();
            return Some(result);
        }

        match self.state.apply_all(&result.effects, &self.rules) {
            Ok(next) => {
                debug!(keyword = %keyword, effects = result.effects.len(), "Applied command effects");
                entries.extend(consequences(&self.state, &next));
                self.state = next;
            }
            Err(err) => {
                warn!(keyword = %keyword, error = %err, "Rejected command effects");
                entries.push(TranscriptEntry::error(err.to_string()));
                result.success = false;
                result.effects.clear();
            }
        }

        self.transcript.extend(entries);
        Some(result)
    }

    /// Release the busy guard after the command died without a result
    pub fn abort(&mut self, reason: &str) {
        self.busy = false;
        self.transcript
            .push(TranscriptEntry::error(format!("Command failed: {}", reason)));
    }

    /// Submit and complete a line in one step
    pub async fn submit(
        &mut self,
        dispatcher: &Dispatcher,
        line: &str,
    ) -> Result<Option<CommandResult>, GameError> {
        let Some(pending) = self.begin(line)? else {
            return Ok(None);
        };
        let dispatch = dispatcher
            .dispatch(&pending.snapshot, &pending.line, None)
            .await;
        Ok(self.complete(dispatch))
    }
}

/// Follow-up lines for what a state change crossed
fn consequences(before: &GameState, after: &GameState) -> Vec<TranscriptEntry> {
    let mut entries = Vec::new();

    for level in before.level + 1..=after.level {
        entries.push(TranscriptEntry::success(format!(
            "Level up! You are now level {}.",
            level
        )));
    }

    for threshold in DETECTION_WARNINGS {
        if before.detection_level < threshold && after.detection_level >= threshold {
            entries.push(TranscriptEntry::warning(format!(
                "Detection level at {}%. Consider enabling stealth mode.",
                after.detection_level
            )));
        }
    }
    if !before.is_traced() && after.is_traced() {
        entries.push(TranscriptEntry::warning(
            "TRACE COMPLETE. You have been detected. Connect to another target to shake it.",
        ));
    }

    entries
}
