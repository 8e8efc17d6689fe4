use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::team::DraftPick;

/// Lifecycle state of a trade.
///
/// A trade is created `Proposed` and moves to exactly one of the other
/// states. A countered trade spawns a sibling and is never mutated again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeStatus {
    Proposed,
    Accepted,
    Rejected,
    Countered,
}

impl TradeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeStatus::Proposed => "proposed",
            TradeStatus::Accepted => "accepted",
            TradeStatus::Rejected => "rejected",
            TradeStatus::Countered => "countered",
        }
    }

    /// Terminal states cannot transition further
    pub fn is_terminal(&self) -> bool {
        matches!(self, TradeStatus::Accepted | TradeStatus::Rejected)
    }
}

impl std::fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Who proposed a trade: a team's GM agent or the human user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TradeActor {
    User,
    Team(String),
}

impl From<String> for TradeActor {
    fn from(value: String) -> Self {
        if value == "user" {
            TradeActor::User
        } else {
            TradeActor::Team(value)
        }
    }
}

impl From<TradeActor> for String {
    fn from(value: TradeActor) -> Self {
        match value {
            TradeActor::User => "user".to_string(),
            TradeActor::Team(abbr) => abbr,
        }
    }
}

impl std::fmt::Display for TradeActor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeActor::User => write!(f, "user"),
            TradeActor::Team(abbr) => write!(f, "{}", abbr),
        }
    }
}

/// A proposed or completed exchange of players between two teams
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Time-based unique identifier
    pub id: String,
    /// Abbreviation of the proposing side's team
    pub team1: String,
    /// Abbreviation of the receiving side's team
    pub team2: String,
    /// Player ids leaving team1
    #[serde(default)]
    pub team1_players: Vec<String>,
    /// Player ids leaving team2
    #[serde(default)]
    pub team2_players: Vec<String>,
    /// Picks offered by team1 (accepted as input, rejected at validation)
    #[serde(default)]
    pub team1_picks: Vec<DraftPick>,
    /// Picks offered by team2 (accepted as input, rejected at validation)
    #[serde(default)]
    pub team2_picks: Vec<DraftPick>,
    pub status: TradeStatus,
    pub proposed_by: TradeActor,
    /// Creation time, truncated to whole seconds so the id and the
    /// persisted form agree
    pub timestamp: DateTime<Utc>,
    /// Back-reference to the trade this one supersedes
    #[serde(default)]
    pub counter_trade_id: Option<String>,
}

impl Trade {
    /// Create an empty proposed trade between two teams
    pub fn new(team1: &str, team2: &str, proposed_by: TradeActor) -> Self {
        let now = Utc::now();
        let timestamp = now.with_nanosecond(0).unwrap_or(now);
        Self {
            id: generate_trade_id(timestamp),
            team1: team1.to_string(),
            team2: team2.to_string(),
            team1_players: Vec::new(),
            team2_players: Vec::new(),
            team1_picks: Vec::new(),
            team2_picks: Vec::new(),
            status: TradeStatus::Proposed,
            proposed_by,
            timestamp,
            counter_trade_id: None,
        }
    }

    /// Player ids leaving the given side (1-indexed like the team fields)
    pub fn outgoing_for(&self, team_abbr: &str) -> &[String] {
        if self.team1 == team_abbr {
            &self.team1_players
        } else {
            &self.team2_players
        }
    }

    /// Player ids arriving at the given side
    pub fn incoming_for(&self, team_abbr: &str) -> &[String] {
        if self.team1 == team_abbr {
            &self.team2_players
        } else {
            &self.team1_players
        }
    }

    /// The opposite side's abbreviation from the given team's perspective
    pub fn counterparty(&self, team_abbr: &str) -> &str {
        if self.team1 == team_abbr {
            &self.team2
        } else {
            &self.team1
        }
    }

    pub fn involves(&self, team_abbr: &str) -> bool {
        self.team1 == team_abbr || self.team2 == team_abbr
    }

    /// True when both sides list the same player sets (order-insensitive)
    pub fn same_players_as(&self, other: &Trade) -> bool {
        let mut a1 = self.team1_players.clone();
        let mut a2 = self.team2_players.clone();
        let mut b1 = other.team1_players.clone();
        let mut b2 = other.team2_players.clone();
        a1.sort();
        a2.sort();
        b1.sort();
        b2.sort();
        a1 == b1 && a2 == b2
    }
}

/// Time-based id with an entropy suffix; unique even within one second
fn generate_trade_id(timestamp: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "trade_{}_{}",
        timestamp.format("%Y%m%d%H%M%S"),
        &suffix[..8]
    )
}

/// A trade plus the proposing GM's pitch — the unit an agent receives
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeProposal {
    pub trade: Trade,
    pub message: String,
}

/// Outcome of one negotiation round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeResponse {
    pub trade_id: String,
    pub status: TradeStatus,
    pub message: String,
    /// Present only when status is `Countered`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counter_trade: Option<Trade>,
}
