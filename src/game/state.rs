//! Player progress and the transitions that change it
//!
//! `GameState` is a plain value. Every change goes through a `GameEvent`
//! applied with `GameState::apply`, which returns the next state.

use crate::data::Catalog;
use crate::GameError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Detection meter ceiling
pub const MAX_DETECTION: u32 = 100;

/// Tunable game rules, loaded from the `[game]` config section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub starting_money: u64,
    pub experience_unit: u32,           // XP per level step: threshold = level * unit
    pub upgrade_cost_multiplier: f64,
    pub connect_detection: u32,
    pub failed_attempt_detection: u32,  // Penalty when the capability itself fails
    pub bruteforce_requires_connection: bool,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            starting_money: 1000,
            experience_unit: 1000,
            upgrade_cost_multiplier: 1.5,
            connect_detection: 2,
            failed_attempt_detection: 5,
            bruteforce_requires_connection: true,
        }
    }
}

impl Rules {
    /// Cost of the upgrade after one costing `cost`
    pub fn next_upgrade_cost(&self, cost: u64) -> u64 {
        (cost as f64 * self.upgrade_cost_multiplier).floor() as u64
    }
}

/// An owned program and how far it has been upgraded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledProgram {
    pub tier: u32,
    pub upgrade_cost: u64,
}

/// The player's progress snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub level: u32,
    pub experience: u32,
    pub money: u64,
    pub detection_level: u32,           // 0-100
    pub stealth_mode: bool,
    pub current_target: Option<String>, // Target ip
    pub inventory: BTreeMap<String, InstalledProgram>,
    pub discovered_vulnerabilities: Vec<String>,
    pub compromised: BTreeSet<String>,  // Target ips already breached
}

/// A single named change to the game state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    GainExperience(u32),
    GainMoney(u64),
    SpendMoney(u64),
    RaiseDetection(u32),
    Connect(String),
    SetStealth(bool),
    Discover(Vec<String>),
    Install { program: String, upgrade_cost: u64 },
    Upgrade { program: String, next_cost: u64 },
    Compromise(String),
}

impl GameState {
    /// A fresh session: level 1, no detection, free programs installed
    pub fn new(rules: &Rules, catalog: &Catalog) -> Self {
        let inventory = catalog
            .programs
            .iter()
            .filter(|p| p.price == 0)
            .map(|p| {
                (
                    p.name.clone(),
                    InstalledProgram { tier: 1, upgrade_cost: p.upgrade_cost },
                )
            })
            .collect();

        Self {
            level: 1,
            experience: 0,
            money: rules.starting_money,
            detection_level: 0,
            stealth_mode: false,
            current_target: None,
            inventory,
            discovered_vulnerabilities: Vec::new(),
            compromised: BTreeSet::new(),
        }
    }

    /// Experience needed to leave the current level
    pub fn experience_threshold(&self, rules: &Rules) -> u32 {
        self.level.saturating_mul(rules.experience_unit.max(1))
    }

    /// Progress through the current level, 0-100
    pub fn level_progress(&self, rules: &Rules) -> u8 {
        let threshold = self.experience_threshold(rules) as u64;
        ((self.experience as u64 * 100) / threshold).min(100) as u8
    }

    pub fn owns(&self, program: &str) -> bool {
        self.inventory.keys().any(|name| name.eq_ignore_ascii_case(program))
    }

    /// Detection a raw increase of `amount` actually adds, before clamping
    pub fn effective_detection(&self, amount: u32) -> u32 {
        if self.stealth_mode {
            amount / 2
        } else {
            amount
        }
    }

    /// Trace complete, the meter is full
    pub fn is_traced(&self) -> bool {
        self.detection_level >= MAX_DETECTION
    }

    /// Apply one event, producing the next state
    pub fn apply(mut self, event: &GameEvent, rules: &Rules) -> Result<Self, GameError> {
        match event {
            GameEvent::GainExperience(amount) => {
                self.experience = self.experience.saturating_add(*amount);
                self.settle_levels(rules);
            }
            GameEvent::GainMoney(amount) => {
                self.money = self.money.saturating_add(*amount);
            }
            GameEvent::SpendMoney(amount) => {
                self.money = self.money.checked_sub(*amount).ok_or_else(|| {
                    GameError::InvalidTransition(format!(
                        "cannot spend ${} with ${} available",
                        amount, self.money
                    ))
                })?;
            }
            GameEvent::RaiseDetection(amount) => {
                let increase = self.effective_detection(*amount);
                self.detection_level = self
                    .detection_level
                    .saturating_add(increase)
                    .min(MAX_DETECTION);
            }
            GameEvent::Connect(ip) => {
                self.current_target = Some(ip.clone());
                self.detection_level = 0;
                self.discovered_vulnerabilities.clear();
            }
            GameEvent::SetStealth(enabled) => {
                self.stealth_mode = *enabled;
            }
            GameEvent::Discover(vulnerabilities) => {
                for vuln in vulnerabilities {
                    if !self.discovered_vulnerabilities.contains(vuln) {
                        self.discovered_vulnerabilities.push(vuln.clone());
                    }
                }
            }
            GameEvent::Install { program, upgrade_cost } => {
                if self.owns(program) {
                    return Err(GameError::InvalidTransition(format!(
                        "{} is already installed",
                        program
                    )));
                }
                self.inventory.insert(
                    program.clone(),
                    InstalledProgram { tier: 1, upgrade_cost: *upgrade_cost },
                );
            }
            GameEvent::Upgrade { program, next_cost } => {
                let installed = self.inventory.get_mut(program).ok_or_else(|| {
                    GameError::InvalidTransition(format!("{} is not installed", program))
                })?;
                installed.tier += 1;
                installed.upgrade_cost = *next_cost;
            }
            GameEvent::Compromise(ip) => {
                self.compromised.insert(ip.clone());
            }
        }
        Ok(self)
    }

    /// Apply every event or none of them
    pub fn apply_all(&self, events: &[GameEvent], rules: &Rules) -> Result<Self, GameError> {
        events
            .iter()
            .try_fold(self.clone(), |state, event| state.apply(event, rules))
    }

    // Overflow carries over, possibly across several levels
    fn settle_levels(&mut self, rules: &Rules) {
        loop {
            let threshold = self.experience_threshold(rules);
            if self.experience < threshold {
                break;
            }
            self.experience -= threshold;
            self.level += 1;
        }
    }
}
