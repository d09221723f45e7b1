//! Terminal Hacker
//!
//! A terminal hacker simulator where you scan, crack and connect to mock
//! targets, buy better tools, and try to stay under the radar.
//!
//! # Game Mechanics
//!
//! - **Commands**: a small shell (`scan`, `bruteforce`, `connect`, `buy`, ...)
//! - **Detection**: risky commands raise a 0-100 meter, stealth halves the rise
//! - **Progression**: experience levels you up and unlocks programs
//! - **Economy**: cracked targets pay out, programs cost money to buy and upgrade
//!
//! # Architecture
//!
//! - `game` - Interpreter core: state transitions, registry, dispatcher
//! - `backend` - The scan/bruteforce capability and its adapters
//! - `data` - Program and target catalogs, fake files
//! - `config` - TOML configuration
//! - `logging` - tracing subscriber setup
//! - `tui` - Terminal user interface with ratatui

pub mod backend;
pub mod config;
pub mod data;
pub mod game;
pub mod logging;
pub mod tui;

pub use config::Config;
pub use data::*;
pub use game::{GameState, Session};

/// Game version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result type for the game
pub type Result<T> = anyhow::Result<T>;

/// Custom error types
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid state transition: {0}")]
    InvalidTransition(String),

    #[error("Interpreter busy: {0}")]
    Busy(String),
}
