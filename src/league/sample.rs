//! Deterministic sample league: all 30 NBA franchises with generated
//! rosters and draft picks. No randomness, so tests and fresh installs
//! always see the same data.

use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::domain::{
    DraftPick, Player, Position, StatKey, StatLine, Team, DEFAULT_LUXURY_TAX, DEFAULT_SALARY_CAP,
};

use super::state::LeagueState;

/// Roster size for generated teams
const ROSTER_SIZE: usize = 15;

/// Generate a roster for one team. Salaries descend with roster slot and
/// the stat lines cycle, so every team gets the same value distribution.
pub fn sample_players(team_abbr: &str, count: usize) -> Vec<Player> {
    (1..=count)
        .map(|i| {
            let position = Position::ALL[(i - 1) % 5];
            let salary_multiplier = if i <= 5 {
                dec!(1.5)
            } else if i <= 10 {
                dec!(0.8)
            } else {
                dec!(0.5)
            };
            let stats = StatLine::new()
                .with(StatKey::Ppg, (10 + i % 20) as f64)
                .with(StatKey::Rpg, (3 + i % 10) as f64)
                .with(StatKey::Apg, (2 + i % 8) as f64)
                .with(StatKey::Spg, 0.5 + (i % 2) as f64)
                .with(StatKey::Bpg, 0.3 + (i % 3) as f64)
                .with(StatKey::FgPct, 0.4 + (i % 10) as f64 / 100.0)
                .with(StatKey::Fg3Pct, 0.3 + (i % 15) as f64 / 100.0);

            Player {
                id: format!("{}_{}", team_abbr, i),
                name: format!("{} Player {}", team_abbr, i),
                position,
                age: (22 + i % 10) as u8,
                height: format!("{}'{}\"", 6 + i % 3, i % 12),
                weight: (180 + (i * 5) % 70) as u32,
                salary: dec!(1_000_000) * Decimal::from((15 - i) as u32) * salary_multiplier,
                contract_years: (1 + i % 5) as u8,
                stats,
            }
        })
        .collect()
}

/// Five future picks per team: two first-rounders, two seconds, one extra
pub fn sample_draft_picks(team_abbr: &str) -> Vec<DraftPick> {
    let current_year = Utc::now().year();
    let pick = |year: i32, round: u8| DraftPick {
        year,
        round,
        original_team: team_abbr.to_string(),
        protected: false,
        protection_details: None,
    };
    vec![
        pick(current_year + 1, 1),
        pick(current_year + 1, 2),
        pick(current_year + 2, 1),
        pick(current_year + 2, 2),
        pick(current_year + 3, 1),
    ]
}

/// All 30 franchises: (id, name, abbreviation, city, conference, division)
const FRANCHISES: [(&str, &str, &str, &str, &str, &str); 30] = [
    ("1", "Hawks", "ATL", "Atlanta", "East", "Southeast"),
    ("2", "Celtics", "BOS", "Boston", "East", "Atlantic"),
    ("3", "Nets", "BKN", "Brooklyn", "East", "Atlantic"),
    ("4", "Hornets", "CHA", "Charlotte", "East", "Southeast"),
    ("5", "Bulls", "CHI", "Chicago", "East", "Central"),
    ("6", "Cavaliers", "CLE", "Cleveland", "East", "Central"),
    ("7", "Mavericks", "DAL", "Dallas", "West", "Southwest"),
    ("8", "Nuggets", "DEN", "Denver", "West", "Northwest"),
    ("9", "Pistons", "DET", "Detroit", "East", "Central"),
    ("10", "Warriors", "GSW", "Golden State", "West", "Pacific"),
    ("11", "Rockets", "HOU", "Houston", "West", "Southwest"),
    ("12", "Pacers", "IND", "Indiana", "East", "Central"),
    ("13", "Clippers", "LAC", "Los Angeles", "West", "Pacific"),
    ("14", "Lakers", "LAL", "Los Angeles", "West", "Pacific"),
    ("15", "Grizzlies", "MEM", "Memphis", "West", "Southwest"),
    ("16", "Heat", "MIA", "Miami", "East", "Southeast"),
    ("17", "Bucks", "MIL", "Milwaukee", "East", "Central"),
    ("18", "Timberwolves", "MIN", "Minnesota", "West", "Northwest"),
    ("19", "Pelicans", "NOP", "New Orleans", "West", "Southwest"),
    ("20", "Knicks", "NYK", "New York", "East", "Atlantic"),
    ("21", "Thunder", "OKC", "Oklahoma City", "West", "Northwest"),
    ("22", "Magic", "ORL", "Orlando", "East", "Southeast"),
    ("23", "76ers", "PHI", "Philadelphia", "East", "Atlantic"),
    ("24", "Suns", "PHX", "Phoenix", "West", "Pacific"),
    ("25", "Trail Blazers", "POR", "Portland", "West", "Northwest"),
    ("26", "Kings", "SAC", "Sacramento", "West", "Pacific"),
    ("27", "Spurs", "SAS", "San Antonio", "West", "Southwest"),
    ("28", "Raptors", "TOR", "Toronto", "East", "Atlantic"),
    ("29", "Jazz", "UTA", "Utah", "West", "Northwest"),
    ("30", "Wizards", "WAS", "Washington", "East", "Southeast"),
];

/// Build the full 30-team sample league
pub fn sample_league() -> LeagueState {
    let mut league = LeagueState::new();
    for (id, name, abbr, city, conference, division) in FRANCHISES {
        let team = Team {
            id: id.to_string(),
            name: name.to_string(),
            abbreviation: abbr.to_string(),
            city: city.to_string(),
            conference: conference.to_string(),
            division: division.to_string(),
            roster: sample_players(abbr, ROSTER_SIZE),
            draft_picks: sample_draft_picks(abbr),
            salary_cap: DEFAULT_SALARY_CAP,
            luxury_tax: DEFAULT_LUXURY_TAX,
        };
        league.teams.insert(team.abbreviation.clone(), team);
    }
    league
}
