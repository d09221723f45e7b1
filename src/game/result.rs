//! What a command handler hands back

use super::state::GameEvent;

/// Outcome of one command. Handlers never touch the live state; the
/// session applies `effects` once the command is done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub success: bool,
    pub message: String,
    pub effects: Vec<GameEvent>,
    pub clear_transcript: bool,
}

impl CommandResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            effects: Vec::new(),
            clear_transcript: false,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            effects: Vec::new(),
            clear_transcript: false,
        }
    }

    pub fn cleared() -> Self {
        Self {
            clear_transcript: true,
            ..Self::ok("")
        }
    }

    pub fn with_effect(mut self, event: GameEvent) -> Self {
        self.effects.push(event);
        self
    }

    pub fn with_effects(mut self, events: impl IntoIterator<Item = GameEvent>) -> Self {
        self.effects.extend(events);
        self
    }

    /// Experience the effects grant
    pub fn experience_gained(&self) -> u32 {
        self.effects
            .iter()
            .map(|e| match e {
                GameEvent::GainExperience(xp) => *xp,
                _ => 0,
            })
            .sum()
    }

    /// Net money change of the effects
    pub fn money_delta(&self) -> i64 {
        self.effects
            .iter()
            .map(|e| match e {
                GameEvent::GainMoney(amount) => *amount as i64,
                GameEvent::SpendMoney(amount) => -(*amount as i64),
                _ => 0,
            })
            .sum()
    }

    /// Raw detection increase, before stealth
    pub fn detection_raised(&self) -> u32 {
        self.effects
            .iter()
            .map(|e| match e {
                GameEvent::RaiseDetection(amount) => *amount,
                _ => 0,
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deltas_sum_over_effects() {
        let result = CommandResult::ok("Purchased hydra for $1000.").with_effects([
            GameEvent::SpendMoney(1000),
            GameEvent::GainMoney(200),
            GameEvent::GainExperience(10),
            GameEvent::RaiseDetection(4),
            GameEvent::RaiseDetection(1),
        ]);
        assert_eq!(result.money_delta(), -800);
        assert_eq!(result.experience_gained(), 10);
        assert_eq!(result.detection_raised(), 5);
    }

    #[test]
    fn cleared_has_no_message() {
        let result = CommandResult::cleared();
        assert!(result.success);
        assert!(result.clear_transcript);
        assert!(result.message.is_empty());
    }
}
