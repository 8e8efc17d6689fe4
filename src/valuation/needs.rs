use std::collections::BTreeMap;

use crate::domain::{Position, Team};

/// Ideal number of rostered players at each position
pub const IDEAL_POSITION_COUNT: usize = 2;

/// Positional fill ratios for one team, computed from the live roster.
///
/// A ratio below 1.0 means the team is short at that position; above 1.0,
/// crowded. Never cached across roster mutations — recompute per use.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionalNeeds {
    ratios: BTreeMap<Position, f64>,
}

impl PositionalNeeds {
    /// Snapshot the given team's current positional fill
    pub fn from_team(team: &Team) -> Self {
        let ratios = Position::ALL
            .iter()
            .map(|&position| {
                let count = team.position_count(position);
                (position, count as f64 / IDEAL_POSITION_COUNT as f64)
            })
            .collect();
        Self { ratios }
    }

    /// Fill ratio at a position: roster count over the ideal count
    pub fn fill_ratio(&self, position: Position) -> f64 {
        self.ratios.get(&position).copied().unwrap_or(0.0)
    }

    /// Positions ordered most-needed first (lowest fill ratio)
    pub fn ranked(&self) -> Vec<(Position, f64)> {
        let mut entries: Vec<(Position, f64)> =
            self.ratios.iter().map(|(&p, &r)| (p, r)).collect();
        entries.sort_by(|a, b| a.1.total_cmp(&b.1));
        entries
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Position, &f64)> {
        self.ratios.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Player, StatLine, Team};
    use rust_decimal_macros::dec;

    fn player(id: &str, position: Position) -> Player {
        Player {
            id: id.to_string(),
            name: id.to_string(),
            position,
            age: 25,
            height: "6'6\"".to_string(),
            weight: 210,
            salary: dec!(1_000_000),
            contract_years: 1,
            stats: StatLine::new(),
        }
    }

    fn team(roster: Vec<Player>) -> Team {
        Team {
            id: "1".to_string(),
            name: "Hawks".to_string(),
            abbreviation: "ATL".to_string(),
            city: "Atlanta".to_string(),
            conference: "East".to_string(),
            division: "Southeast".to_string(),
            roster,
            draft_picks: Vec::new(),
            salary_cap: crate::domain::DEFAULT_SALARY_CAP,
            luxury_tax: crate::domain::DEFAULT_LUXURY_TAX,
        }
    }

    #[test]
    fn test_fill_ratios() {
        let t = team(vec![
            player("1", Position::Pg),
            player("2", Position::Pg),
            player("3", Position::Pg),
            player("4", Position::C),
        ]);
        let needs = PositionalNeeds::from_team(&t);
        assert_eq!(needs.fill_ratio(Position::Pg), 1.5);
        assert_eq!(needs.fill_ratio(Position::C), 0.5);
        assert_eq!(needs.fill_ratio(Position::Sf), 0.0);
    }

    #[test]
    fn test_ranked_orders_most_needed_first() {
        let t = team(vec![
            player("1", Position::Pg),
            player("2", Position::Pg),
            player("3", Position::Sg),
        ]);
        let needs = PositionalNeeds::from_team(&t);
        let ranked = needs.ranked();
        // SF/PF/C are empty (ratio 0), then SG at 0.5, then PG at 1.0
        assert_eq!(ranked[3].0, Position::Sg);
        assert_eq!(ranked[4].0, Position::Pg);
    }
}
