use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// On-court position (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Position {
    Pg,
    Sg,
    Sf,
    Pf,
    C,
}

impl Position {
    /// All positions, in conventional lineup order
    pub const ALL: [Position; 5] = [
        Position::Pg,
        Position::Sg,
        Position::Sf,
        Position::Pf,
        Position::C,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Pg => "PG",
            Position::Sg => "SG",
            Position::Sf => "SF",
            Position::Pf => "PF",
            Position::C => "C",
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Closed set of tracked per-game statistics.
///
/// Payloads carrying a key outside this set are rejected at the
/// deserialization boundary instead of being carried as loose strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKey {
    Ppg,
    Rpg,
    Apg,
    Spg,
    Bpg,
    FgPct,
    Fg3Pct,
}

/// A player's stat line. Absent keys read as 0.0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatLine(BTreeMap<StatKey, f64>);

impl StatLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a stat, defaulting to 0.0 when absent
    pub fn get(&self, key: StatKey) -> f64 {
        self.0.get(&key).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, key: StatKey, value: f64) {
        self.0.insert(key, value);
    }

    /// Builder-style setter for literals in tests and sample data
    pub fn with(mut self, key: StatKey, value: f64) -> Self {
        self.set(key, value);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StatKey, &f64)> {
        self.0.iter()
    }
}

/// A player under contract with exactly one team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Unique, stable identifier
    pub id: String,
    pub name: String,
    pub position: Position,
    pub age: u8,
    pub height: String,
    pub weight: u32,
    /// Annual salary in USD
    pub salary: Decimal,
    /// Remaining contract length, at least 1
    pub contract_years: u8,
    #[serde(default)]
    pub stats: StatLine,
}

impl Player {
    /// Salary expressed in millions, for the valuation model
    pub fn salary_millions(&self) -> f64 {
        (self.salary / Decimal::from(1_000_000)).to_f64().unwrap_or(0.0)
    }
}
