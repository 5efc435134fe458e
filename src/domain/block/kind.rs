//! Block kinds offered by the flow palette

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Closed set of configurable block kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Conditional,
    Switch,
    Loop,
    Database,
    Cache,
    Function,
}

/// Palette entry describing a block kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaletteEntry {
    pub kind: BlockKind,
    pub label: &'static str,
    pub description: &'static str,
}

impl BlockKind {
    pub const ALL: [BlockKind; 6] = [
        Self::Conditional,
        Self::Switch,
        Self::Loop,
        Self::Database,
        Self::Cache,
        Self::Function,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Conditional => "conditional",
            Self::Switch => "switch",
            Self::Loop => "loop",
            Self::Database => "database",
            Self::Cache => "cache",
            Self::Function => "function",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Conditional => "If Condition",
            Self::Switch => "Switch",
            Self::Loop => "Loop",
            Self::Database => "Database",
            Self::Cache => "Cache",
            Self::Function => "Function",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Conditional => "Conditional logic block",
            Self::Switch => "Multi-way branching block",
            Self::Loop => "Iteration block",
            Self::Database => "Database operations",
            Self::Cache => "Cache operations",
            Self::Function => "Execute a scripted function",
        }
    }

    /// Entries in palette order
    pub fn palette() -> Vec<PaletteEntry> {
        Self::ALL
            .iter()
            .map(|kind| PaletteEntry {
                kind: *kind,
                label: kind.label(),
                description: kind.description(),
            })
            .collect()
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BlockKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "conditional" | "if" => Ok(Self::Conditional),
            "switch" => Ok(Self::Switch),
            "loop" => Ok(Self::Loop),
            "database" => Ok(Self::Database),
            "cache" | "redis" => Ok(Self::Cache),
            "function" | "javascript" => Ok(Self::Function),
            other => Err(DomainError::validation(format!(
                "Unknown block kind '{}'",
                other
            ))),
        }
    }
}
