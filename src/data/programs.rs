//! Programs the player can buy and upgrade

use serde::{Deserialize, Serialize};

/// What kind of tool a program is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgramType {
    Scan,
    Bruteforce,
    Hack,
    Utility,
    Firewall,
    Crypto,
}

impl ProgramType {
    pub fn icon(&self) -> &'static str {
        match self {
            ProgramType::Scan => "[SCN]",
            ProgramType::Bruteforce => "[BRF]",
            ProgramType::Hack => "[HCK]",
            ProgramType::Utility => "[UTL]",
            ProgramType::Firewall => "[FWL]",
            ProgramType::Crypto => "[CRY]",
        }
    }
}

impl std::fmt::Display for ProgramType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProgramType::Scan => write!(f, "scan"),
            ProgramType::Bruteforce => write!(f, "bruteforce"),
            ProgramType::Hack => write!(f, "hack"),
            ProgramType::Utility => write!(f, "utility"),
            ProgramType::Firewall => write!(f, "firewall"),
            ProgramType::Crypto => write!(f, "crypto"),
        }
    }
}

/// A store entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub name: String,
    pub description: String,
    pub price: u64,
    pub level: u32,              // Required player level
    pub program_type: ProgramType,
    pub success_rate: u8,        // 0-100
    pub commands: Vec<String>,
    pub upgrade_cost: u64,       // Cost of the first upgrade
}

impl Program {
    fn new(
        name: &str,
        description: &str,
        price: u64,
        level: u32,
        program_type: ProgramType,
        success_rate: u8,
        commands: &[&str],
        upgrade_cost: u64,
    ) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            price,
            level,
            program_type,
            success_rate: success_rate.min(100),
            commands: commands.iter().map(|c| c.to_string()).collect(),
            upgrade_cost,
        }
    }

    /// Does owning this program help with `keyword`?
    pub fn provides(&self, keyword: &str) -> bool {
        self.commands.iter().any(|c| c == keyword)
    }

    /// Is the program out of reach for a player of this level?
    pub fn is_locked_for(&self, player_level: u32) -> bool {
        self.level > player_level
    }
}

/// The program store
pub fn create_program_catalog() -> Vec<Program> {
    vec![
        Program::new("nmap", "Basic port scanner", 0, 1, ProgramType::Scan, 80, &["scan"], 250),
        Program::new("hydra", "Password cracker", 1000, 2, ProgramType::Bruteforce, 60, &["bruteforce"], 500),
        Program::new("wireshark", "Network analyzer", 2000, 3, ProgramType::Utility, 90, &["scan"], 800),
        Program::new("ghostwall", "Firewall bypass toolkit", 3000, 4, ProgramType::Firewall, 50, &["bypass"], 1200),
        Program::new("cryptbreaker", "Database decryption suite", 4000, 4, ProgramType::Crypto, 45, &["decrypt"], 1500),
        Program::new("metasploit", "Exploit framework", 5000, 5, ProgramType::Hack, 75, &["bruteforce", "bypass", "decrypt"], 2000),
    ]
}
