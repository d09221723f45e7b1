//! Turns one line of input into a finished command

use super::command::{Command, CommandError, CommandKind};
use super::odds::{Dice, ThreadDice};
use super::registry::CommandRegistry;
use super::result::CommandResult;
use super::state::{GameState, Rules};
use super::transcript::{Progress, TranscriptEntry};
use crate::backend::ScanBackend;
use crate::data::Catalog;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};

/// A dispatched command waiting to be applied to the session
#[derive(Debug, Clone)]
pub struct Dispatch {
    pub keyword: String,
    pub result: CommandResult,
    pub entries: Vec<TranscriptEntry>, // Echo, progress, then the result message
}

/// Parses input and runs it through a fresh registry.
///
/// Cheap to clone; the TUI hands a clone to each spawned command.
#[derive(Clone)]
pub struct Dispatcher {
    catalog: Arc<Catalog>,
    rules: Rules,
    backend: Arc<dyn ScanBackend>,
    dice: Arc<dyn Dice>,
    prompt: String,
}

impl Dispatcher {
    pub fn new(catalog: Arc<Catalog>, rules: Rules, backend: Arc<dyn ScanBackend>) -> Self {
        Self {
            catalog,
            rules,
            backend,
            dice: Arc::new(ThreadDice),
            prompt: "$".to_string(),
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Replace the roller used for core-resolved attempts
    pub fn with_dice(mut self, dice: Arc<dyn Dice>) -> Self {
        self.dice = dice;
        self
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Lowercased keyword plus arguments, `None` for blank input
    pub fn tokenize(input: &str) -> Option<(String, Vec<String>)> {
        let mut words = input.split_whitespace();
        let keyword = words.next()?.to_lowercase();
        Some((keyword, words.map(str::to_string).collect()))
    }

    /// Run `input` against `state`. Blank input dispatches nothing.
    ///
    /// Progress lines go to `live` as they are produced and are also part of
    /// the returned entries.
    pub async fn dispatch(
        &self,
        state: &GameState,
        input: &str,
        live: Option<UnboundedSender<TranscriptEntry>>,
    ) -> Option<Dispatch> {
        let (keyword, args) = Self::tokenize(input)?;
        let echo = TranscriptEntry::system(format!("{} {}", self.prompt, input.trim()));
        if let Some(live) = &live {
            let _ = live.send(echo.clone());
        }

        let progress = Progress::new(live);
        let result = match self.run(state, &keyword, &args, &progress).await {
            Ok(result) => result,
            Err(err) => {
                debug!(keyword = %keyword, error = %err, "Command refused");
                CommandResult::failure(err.to_string())
            }
        };
        info!(keyword = %keyword, success = result.success, "Dispatched command");

        let mut entries = vec![echo];
        entries.extend(progress.into_lines());
        if !result.message.is_empty() {
            entries.push(if result.success {
                TranscriptEntry::success(result.message.clone())
            } else {
                TranscriptEntry::error(result.message.clone())
            });
        }

        Some(Dispatch { keyword, result, entries })
    }

    async fn run(
        &self,
        state: &GameState,
        keyword: &str,
        args: &[String],
        progress: &Progress,
    ) -> Result<CommandResult, CommandError> {
        let kind = CommandKind::from_keyword(keyword)
            .ok_or_else(|| CommandError::Unknown(keyword.to_string()))?;
        let command = Command::parse(kind, args)?;
        CommandRegistry::new(
            state,
            &self.rules,
            &self.catalog,
            self.backend.as_ref(),
            self.dice.as_ref(),
            progress,
        )
        .run(&command)
        .await
    }
}
