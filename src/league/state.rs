use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::domain::{Player, Team, Trade, TradeStatus};
use crate::error::{FrontOfficeError, Result};

/// The aggregate root: all teams plus the append-only trade ledger.
///
/// Single shared mutable resource. Roster mutation happens only through
/// `execute_trade`, which preserves the every-player-on-exactly-one-roster
/// invariant. Callers running negotiations concurrently must serialize
/// `execute_trade` behind one writer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeagueState {
    /// Teams keyed by abbreviation
    pub teams: BTreeMap<String, Team>,
    /// Every trade ever created, including superseded and rejected ones
    #[serde(default)]
    pub trades: Vec<Trade>,
}

impl LeagueState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn team(&self, abbreviation: &str) -> Option<&Team> {
        self.teams.get(abbreviation)
    }

    pub fn team_mut(&mut self, abbreviation: &str) -> Option<&mut Team> {
        self.teams.get_mut(abbreviation)
    }

    /// Team lookup that converts absence into an error
    pub fn require_team(&self, abbreviation: &str) -> Result<&Team> {
        self.team(abbreviation)
            .ok_or_else(|| FrontOfficeError::UnknownTeam(abbreviation.to_string()))
    }

    /// Find a player anywhere in the league, with the owning team
    pub fn player_by_id(&self, player_id: &str) -> Option<(&Player, &Team)> {
        self.teams.values().find_map(|team| {
            team.player(player_id).map(|player| (player, team))
        })
    }

    pub fn trade(&self, trade_id: &str) -> Option<&Trade> {
        self.trades.iter().find(|t| t.id == trade_id)
    }

    /// Append a trade to the ledger if its id is not already present
    pub fn record_trade(&mut self, trade: Trade) {
        if self.trade(&trade.id).is_none() {
            debug!(trade_id = %trade.id, "recording trade");
            self.trades.push(trade);
        }
    }

    /// Update the status of a ledger entry
    pub fn set_trade_status(&mut self, trade_id: &str, status: TradeStatus) -> Result<()> {
        let trade = self
            .trades
            .iter_mut()
            .find(|t| t.id == trade_id)
            .ok_or_else(|| FrontOfficeError::TradeNotFound(trade_id.to_string()))?;
        trade.status = status;
        Ok(())
    }

    /// Check a trade against the current league without mutating anything.
    ///
    /// Rejects: identical sides, unknown teams, players missing from the
    /// named roster, and any pick exchange (tracked but not transferable).
    pub fn validate_trade(&self, trade: &Trade) -> Result<()> {
        if trade.team1 == trade.team2 {
            return Err(FrontOfficeError::InvalidTrade(format!(
                "both sides are {}",
                trade.team1
            )));
        }
        if !trade.team1_picks.is_empty() || !trade.team2_picks.is_empty() {
            return Err(FrontOfficeError::PickExchangeUnsupported {
                trade_id: trade.id.clone(),
            });
        }

        let team1 = self.require_team(&trade.team1)?;
        let team2 = self.require_team(&trade.team2)?;

        for player_id in &trade.team1_players {
            if !team1.has_player(player_id) {
                return Err(FrontOfficeError::PlayerNotOnRoster {
                    player_id: player_id.clone(),
                    team: trade.team1.clone(),
                });
            }
        }
        for player_id in &trade.team2_players {
            if !team2.has_player(player_id) {
                return Err(FrontOfficeError::PlayerNotOnRoster {
                    player_id: player_id.clone(),
                    team: trade.team2.clone(),
                });
            }
        }
        Ok(())
    }

    /// Execute a trade: swap the named players between the two rosters.
    ///
    /// All-or-nothing. Any validation failure, or an id that was already
    /// executed, leaves every roster untouched. On success the ledger
    /// entry is marked accepted (and appended first if absent).
    pub fn execute_trade(&mut self, trade: &Trade) -> Result<()> {
        if let Some(existing) = self.trade(&trade.id) {
            if existing.status == TradeStatus::Accepted {
                return Err(FrontOfficeError::AlreadyExecuted {
                    trade_id: trade.id.clone(),
                });
            }
        }
        self.validate_trade(trade)?;

        // Validation passed; the removals below cannot fail.
        let team1 = self.teams.get_mut(&trade.team1).expect("validated above");
        let mut outgoing1 = Vec::with_capacity(trade.team1_players.len());
        team1.roster.retain(|p| {
            if trade.team1_players.contains(&p.id) {
                outgoing1.push(p.clone());
                false
            } else {
                true
            }
        });

        let team2 = self.teams.get_mut(&trade.team2).expect("validated above");
        let mut outgoing2 = Vec::with_capacity(trade.team2_players.len());
        team2.roster.retain(|p| {
            if trade.team2_players.contains(&p.id) {
                outgoing2.push(p.clone());
                false
            } else {
                true
            }
        });
        team2.roster.extend(outgoing1);

        let team1 = self.teams.get_mut(&trade.team1).expect("validated above");
        team1.roster.extend(outgoing2);

        let mut executed = trade.clone();
        executed.status = TradeStatus::Accepted;
        match self.trades.iter_mut().find(|t| t.id == trade.id) {
            Some(entry) => *entry = executed,
            None => self.trades.push(executed),
        }

        info!(
            trade_id = %trade.id,
            team1 = %trade.team1,
            team2 = %trade.team2,
            "trade executed"
        );
        Ok(())
    }
}
