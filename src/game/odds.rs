//! Chances and tool bonuses for intrusion attempts
//!
//! The scan capability decides what a scan or password attack turns up.
//! Everything the player brings to the fight (level, stealth, owned tools)
//! is applied here, on the core side.

use super::state::GameState;
use crate::data::{Catalog, Program};
use rand::Rng;

/// Source of uniform draws in `[0, 1)`
pub trait Dice: Send + Sync {
    fn roll(&self) -> f32;
}

/// Draws from the thread-local generator
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadDice;

impl Dice for ThreadDice {
    fn roll(&self) -> f32 {
        rand::thread_rng().gen()
    }
}

/// Always rolls the same value
#[derive(Debug, Clone, Copy)]
pub struct FixedDice(pub f32);

impl Dice for FixedDice {
    fn roll(&self) -> f32 {
        self.0
    }
}

const MIN_CHANCE: f32 = 0.1;
const MAX_CHANCE: f32 = 0.9;
const LEVEL_BONUS: f32 = 0.05;

/// Power of the stock scanner; scan bonuses grow from here
const SCAN_BASELINE: u32 = 80;

/// The strongest owned program providing one command
#[derive(Debug, Clone, Copy)]
pub struct ToolEdge<'a> {
    pub program: &'a Program,
    pub tier: u32,
}

impl<'a> ToolEdge<'a> {
    /// Best owned program whose command list includes `keyword`
    pub fn best(state: &GameState, catalog: &'a Catalog, keyword: &str) -> Option<Self> {
        catalog
            .programs
            .iter()
            .filter(|p| p.provides(keyword))
            .filter_map(|program| {
                let installed = state.inventory.get(&program.name)?;
                Some(ToolEdge { program, tier: installed.tier.max(1) })
            })
            .max_by_key(|edge| edge.power())
    }

    /// Success rate plus 10 per tier above the first
    pub fn power(&self) -> u32 {
        self.program.success_rate as u32 + 10 * self.tier.saturating_sub(1)
    }

    /// Added to the success chance of an attempt using this tool
    pub fn chance_bonus(&self) -> f32 {
        self.power() as f32 / 100.0 * 0.2
    }

    /// Percent shaved off raw scan detection, at most 50
    pub fn quiet_percent(&self) -> u32 {
        self.power().saturating_sub(SCAN_BASELINE).min(50)
    }

    /// Percent added to scan experience
    pub fn experience_percent(&self) -> u32 {
        self.power().saturating_sub(SCAN_BASELINE)
    }

    pub fn soften_detection(&self, raw: u32) -> u32 {
        raw - raw * self.quiet_percent() / 100
    }

    pub fn boost_experience(&self, xp: u32) -> u32 {
        xp.saturating_add((xp as u64 * self.experience_percent() as u64 / 100) as u32)
    }
}

/// Success chance of one attempt, clamped to `[0.1, 0.9]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Odds {
    chance: f32,
}

impl Odds {
    pub fn new(base: f32) -> Self {
        Self { chance: base }
    }

    pub fn level(mut self, level: u32) -> Self {
        self.chance += LEVEL_BONUS * level as f32;
        self
    }

    /// `shift` only applies while stealth is on
    pub fn stealth(mut self, enabled: bool, shift: f32) -> Self {
        if enabled {
            self.chance += shift;
        }
        self
    }

    pub fn tool(mut self, edge: Option<ToolEdge<'_>>) -> Self {
        if let Some(edge) = edge {
            self.chance += edge.chance_bonus();
        }
        self
    }

    pub fn chance(&self) -> f32 {
        self.chance.clamp(MIN_CHANCE, MAX_CHANCE)
    }

    pub fn percent(&self) -> u32 {
        (self.chance() * 100.0).round() as u32
    }

    pub fn succeeds(&self, dice: &dyn Dice) -> bool {
        dice.roll() < self.chance()
    }
}

/// An intrusion resolved entirely in the core; needs an owned program providing `verb`
#[derive(Debug, Clone, Copy)]
pub struct Intrusion {
    pub verb: &'static str,
    pub progress: &'static str,
    pub success_text: &'static str,
    pub failure_text: &'static str,
    pub base_chance: f32,
    pub stealth_shift: f32,
    pub detection: u32,
    pub success_xp: u32,
    pub success_money: u64,
    pub failure_xp: u32,
}

pub const FIREWALL_BYPASS: Intrusion = Intrusion {
    verb: "bypass",
    progress: "Probing firewall on",
    success_text: "Firewall successfully bypassed! Internal network access established.",
    failure_text: "Failed to bypass firewall. Access denied.",
    base_chance: 0.6,
    stealth_shift: 0.1,
    detection: 20,
    success_xp: 150,
    success_money: 750,
    failure_xp: 30,
};

pub const DATABASE_DECRYPT: Intrusion = Intrusion {
    verb: "decrypt",
    progress: "Decrypting database on",
    success_text: "Database successfully decrypted! Sensitive data access granted.",
    failure_text: "Failed to decrypt database. Encryption remains intact.",
    base_chance: 0.5,
    stealth_shift: -0.1,
    detection: 25,
    success_xp: 200,
    success_money: 1000,
    failure_xp: 40,
};

/// A failed password attack gets a second pass from an owned cracker
pub const BRUTEFORCE_RETRY_BASE: f32 = 0.2;
pub const BRUTEFORCE_RETRY_STEALTH_SHIFT: f32 = -0.1;

impl Intrusion {
    pub fn odds(&self, state: &GameState, edge: Option<ToolEdge<'_>>) -> Odds {
        Odds::new(self.base_chance)
            .level(state.level)
            .stealth(state.stealth_mode, self.stealth_shift)
            .tool(edge)
    }
}
