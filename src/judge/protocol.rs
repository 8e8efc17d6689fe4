//! Judge communication protocol definitions.
//!
//! Defines the context object handed to the language-model judge and the
//! structured decision it must return. The judge contract is strict: a
//! response that does not parse into `JudgeDecision` is a typed
//! `JudgeError::Unparsable`, never a guess.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::{Player, Position, StatLine, Trade};
use crate::error::Result;
use crate::league::LeagueState;
use crate::valuation::PositionalNeeds;

/// Compact player view included in the judge prompt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub name: String,
    pub position: Position,
    pub age: u8,
    pub salary_millions: f64,
    pub contract_years: u8,
    pub stats: StatLine,
}

impl From<&Player> for PlayerSummary {
    fn from(player: &Player) -> Self {
        Self {
            name: player.name.clone(),
            position: player.position,
            age: player.age,
            salary_millions: player.salary_millions(),
            contract_years: player.contract_years,
            stats: player.stats.clone(),
        }
    }
}

/// The evaluating team's payroll situation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalarySituation {
    pub total_salary: Decimal,
    pub salary_cap: Decimal,
    pub luxury_tax: Decimal,
    pub over_cap: bool,
    pub over_tax: bool,
}

/// Complete context for one trade decision, from one side's perspective
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeContext {
    pub trade_id: String,
    /// Full name of the evaluating team
    pub our_team: String,
    pub our_abbreviation: String,
    /// Full name of the proposing side
    pub other_team: String,
    /// Players we would send away
    pub outgoing: Vec<PlayerSummary>,
    /// Players we would receive
    pub incoming: Vec<PlayerSummary>,
    /// Positional fill ratios (lower = more needed)
    pub needs: BTreeMap<Position, f64>,
    pub salary: SalarySituation,
    pub timestamp: DateTime<Utc>,
}

impl TradeContext {
    /// Assemble the judge context for a trade from one side's perspective
    pub fn build(league: &LeagueState, trade: &Trade, perspective: &str) -> Result<Self> {
        let our_team = league.require_team(perspective)?;
        let other_team = league.require_team(trade.counterparty(perspective))?;

        let outgoing = trade
            .outgoing_for(perspective)
            .iter()
            .filter_map(|id| our_team.player(id))
            .map(PlayerSummary::from)
            .collect();
        let incoming = trade
            .incoming_for(perspective)
            .iter()
            .filter_map(|id| other_team.player(id))
            .map(PlayerSummary::from)
            .collect();

        let needs = PositionalNeeds::from_team(our_team)
            .iter()
            .map(|(&p, &r)| (p, r))
            .collect();

        Ok(Self {
            trade_id: trade.id.clone(),
            our_team: our_team.full_name(),
            our_abbreviation: our_team.abbreviation.clone(),
            other_team: other_team.full_name(),
            outgoing,
            incoming,
            needs,
            salary: SalarySituation {
                total_salary: our_team.total_salary(),
                salary_cap: our_team.salary_cap,
                luxury_tax: our_team.luxury_tax,
                over_cap: our_team.is_over_cap(),
                over_tax: our_team.is_over_luxury_tax(),
            },
            timestamp: Utc::now(),
        })
    }
}

/// The three answers a judge can give
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JudgeVerdict {
    Accept,
    Reject,
    Counter,
}

/// Structured decision returned by the judge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgeDecision {
    pub decision: JudgeVerdict,
    /// Perceived value for the evaluating side, 1-10
    #[serde(default)]
    pub value_for_us: Option<f64>,
    /// Perceived value for the other side, 1-10
    #[serde(default)]
    pub value_for_them: Option<f64>,
    pub reasoning: String,
    /// What this GM would tell the other GM
    pub message: String,
}
