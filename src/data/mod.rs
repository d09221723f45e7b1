//! Data structures for the game world
//!
//! Defines the program store, target catalog, the fake filesystem and the
//! categories transcript lines are tagged with.

pub mod files;
pub mod programs;
pub mod targets;

pub use files::*;
pub use programs::*;
pub use targets::*;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category of a transcript line, drives its colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Info,
    Success,
    Error,
    Warning,
    System,
}

impl Category {
    pub fn symbol(&self) -> &'static str {
        match self {
            Category::Info => " ",
            Category::Success => "+",
            Category::Error => "!",
            Category::Warning => "*",
            Category::System => ">",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Info => write!(f, "INFO"),
            Category::Success => write!(f, "SUCCESS"),
            Category::Error => write!(f, "ERROR"),
            Category::Warning => write!(f, "WARNING"),
            Category::System => write!(f, "SYSTEM"),
        }
    }
}

/// Immutable catalog data shared by every handler
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub programs: Vec<Program>,
    pub targets: Vec<Target>,
}

impl Catalog {
    /// The stock store and target list
    pub fn standard() -> Self {
        Self {
            programs: create_program_catalog(),
            targets: create_target_catalog(),
        }
    }

    pub fn find_target(&self, query: &str) -> Option<&Target> {
        self.targets.iter().find(|t| t.matches(query))
    }

    pub fn find_program(&self, name: &str) -> Option<&Program> {
        self.programs.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }
}

/// A unique identifier wrapper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Id(pub Uuid);

impl Id {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for Id {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
