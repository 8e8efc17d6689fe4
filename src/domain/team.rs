use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::player::{Player, Position};

/// Default 2023-24 NBA salary cap
pub const DEFAULT_SALARY_CAP: Decimal = dec!(123_000_000);
/// Default 2023-24 NBA luxury tax threshold
pub const DEFAULT_LUXURY_TAX: Decimal = dec!(150_000_000);

fn default_salary_cap() -> Decimal {
    DEFAULT_SALARY_CAP
}

fn default_luxury_tax() -> Decimal {
    DEFAULT_LUXURY_TAX
}

/// A future draft pick. Tracked on the roster but never moved by trade
/// execution; trades that list picks are rejected at validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftPick {
    pub year: i32,
    pub round: u8,
    /// Abbreviation of the team the pick originally belonged to
    pub original_team: String,
    #[serde(default)]
    pub protected: bool,
    #[serde(default)]
    pub protection_details: Option<String>,
}

/// A franchise: identity, roster, and cap situation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub name: String,
    /// Unique key used in all cross-references
    pub abbreviation: String,
    pub city: String,
    pub conference: String,
    pub division: String,
    pub roster: Vec<Player>,
    #[serde(default)]
    pub draft_picks: Vec<DraftPick>,
    #[serde(default = "default_salary_cap")]
    pub salary_cap: Decimal,
    #[serde(default = "default_luxury_tax")]
    pub luxury_tax: Decimal,
}

impl Team {
    /// Sum of all roster salaries
    pub fn total_salary(&self) -> Decimal {
        self.roster.iter().map(|p| p.salary).sum()
    }

    pub fn is_over_cap(&self) -> bool {
        self.total_salary() > self.salary_cap
    }

    pub fn is_over_luxury_tax(&self) -> bool {
        self.total_salary() > self.luxury_tax
    }

    /// Remaining cap room, zero when over the cap
    pub fn available_cap_space(&self) -> Decimal {
        if self.is_over_cap() {
            Decimal::ZERO
        } else {
            self.salary_cap - self.total_salary()
        }
    }

    /// Number of rostered players at a position
    pub fn position_count(&self, position: Position) -> usize {
        self.roster.iter().filter(|p| p.position == position).count()
    }

    pub fn player(&self, player_id: &str) -> Option<&Player> {
        self.roster.iter().find(|p| p.id == player_id)
    }

    pub fn has_player(&self, player_id: &str) -> bool {
        self.player(player_id).is_some()
    }

    /// "City Name" display form used in messages and the activity feed
    pub fn full_name(&self) -> String {
        format!("{} {}", self.city, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::player::StatLine;

    fn player(id: &str, position: Position, salary: Decimal) -> Player {
        Player {
            id: id.to_string(),
            name: format!("Player {}", id),
            position,
            age: 26,
            height: "6'6\"".to_string(),
            weight: 210,
            salary,
            contract_years: 2,
            stats: StatLine::new(),
        }
    }

    fn team(roster: Vec<Player>) -> Team {
        Team {
            id: "2".to_string(),
            name: "Celtics".to_string(),
            abbreviation: "BOS".to_string(),
            city: "Boston".to_string(),
            conference: "East".to_string(),
            division: "Atlantic".to_string(),
            roster,
            draft_picks: Vec::new(),
            salary_cap: DEFAULT_SALARY_CAP,
            luxury_tax: DEFAULT_LUXURY_TAX,
        }
    }

    #[test]
    fn test_total_salary_and_cap_space() {
        let t = team(vec![
            player("BOS_1", Position::Pg, dec!(100_000_000)),
            player("BOS_2", Position::Sg, dec!(20_000_000)),
        ]);
        assert_eq!(t.total_salary(), dec!(120_000_000));
        assert!(!t.is_over_cap());
        assert_eq!(t.available_cap_space(), dec!(3_000_000));
    }

    #[test]
    fn test_over_cap_has_no_space() {
        let t = team(vec![player("BOS_1", Position::C, dec!(130_000_000))]);
        assert!(t.is_over_cap());
        assert!(!t.is_over_luxury_tax());
        assert_eq!(t.available_cap_space(), Decimal::ZERO);
    }

    #[test]
    fn test_position_count() {
        let t = team(vec![
            player("BOS_1", Position::Pg, dec!(1)),
            player("BOS_2", Position::Pg, dec!(1)),
            player("BOS_3", Position::C, dec!(1)),
        ]);
        assert_eq!(t.position_count(Position::Pg), 2);
        assert_eq!(t.position_count(Position::C), 1);
        assert_eq!(t.position_count(Position::Sf), 0);
    }
}
