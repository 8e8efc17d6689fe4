//! League cycle orchestrator.
//!
//! Owns the shared league state, one GM agent per team, and the trade
//! routing between them. One `run_cycle` call drives a full round of
//! agent-initiated negotiation. Roster mutation is serialized through
//! this orchestrator's write lock; judge calls never hold it.
//!
//! Per-agent failures inside a cycle are logged and skipped — one
//! misbehaving negotiation never aborts the round. A raised halt flag
//! abandons the cycle after the in-flight trade resolves; a response,
//! once computed, is always applied or discarded as a unit.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::agent::{GmAgent, GmAgentConfig};
use crate::domain::{
    Player, Trade, TradeActor, TradeProposal, TradeResponse, TradeStatus,
};
use crate::error::{FrontOfficeError, Result};
use crate::judge::LanguageModelJudge;
use crate::league::LeagueState;
use crate::persistence::LeagueStore;

/// Minimum outcomes per cycle before the liveness backstop kicks in
const MIN_CYCLE_TRADES: usize = 2;
/// Backstop requires at least this many teams
const MIN_TEAMS_FOR_BACKSTOP: usize = 4;

/// Orchestrator tunables
#[derive(Debug, Clone, Default)]
pub struct OrchestratorConfig {
    pub agent: GmAgentConfig,
    /// Master seed; per-agent seeds derive from it. `None` seeds from
    /// entropy.
    pub seed: Option<u64>,
}

/// One resolved negotiation from a cycle
#[derive(Debug, Clone, Serialize)]
pub struct CycleOutcome {
    pub proposal: TradeProposal,
    pub response: TradeResponse,
}

/// The user's answer to a trade that was proposed to their team
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserDecision {
    Accept,
    Reject,
    Counter,
}

/// Compact team identity for listings
#[derive(Debug, Clone, Serialize)]
pub struct TeamInfo {
    pub id: String,
    pub name: String,
    pub abbreviation: String,
    pub city: String,
    pub conference: String,
    pub division: String,
}

/// Payroll summary attached to a roster view
#[derive(Debug, Clone, Serialize)]
pub struct SalarySummary {
    pub total: Decimal,
    pub cap: Decimal,
    pub luxury_tax: Decimal,
    pub available_space: Decimal,
    pub over_cap: bool,
    pub over_tax: bool,
}

/// Roster view: players sorted by salary, highest first
#[derive(Debug, Clone, Serialize)]
pub struct RosterSummary {
    pub team: TeamInfo,
    pub players: Vec<Player>,
    pub salary_info: SalarySummary,
}

/// One side of an activity feed entry
#[derive(Debug, Clone, Serialize)]
pub struct ActivitySide {
    pub abbr: String,
    pub name: String,
    pub players: Vec<String>,
}

/// Recent-activity feed entry with names resolved
#[derive(Debug, Clone, Serialize)]
pub struct ActivityEntry {
    pub id: String,
    pub timestamp: String,
    pub status: TradeStatus,
    pub team1: ActivitySide,
    pub team2: ActivitySide,
    pub proposed_by: TradeActor,
}

/// Drives the simulated league: agents, routing, and state changes
pub struct LeagueOrchestrator {
    league: Arc<RwLock<LeagueState>>,
    agents: BTreeMap<String, GmAgent>,
    user_team: Option<String>,
    rng: StdRng,
    store: Option<Arc<dyn LeagueStore>>,
    halted: Arc<AtomicBool>,
}

impl LeagueOrchestrator {
    pub fn new(state: LeagueState, config: OrchestratorConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        // BTreeMap order makes the seed derivation reproducible
        let abbreviations: Vec<String> = state.teams.keys().cloned().collect();
        let league = Arc::new(RwLock::new(state));
        let agents = abbreviations
            .into_iter()
            .map(|abbr| {
                let agent = GmAgent::new(&abbr, league.clone(), config.agent.clone(), rng.gen());
                (abbr, agent)
            })
            .collect();

        Self {
            league,
            agents,
            user_team: None,
            rng,
            store: None,
            halted: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Attach a judge shared by every agent
    pub fn with_judge(mut self, judge: Arc<dyn LanguageModelJudge>) -> Self {
        self.agents = self
            .agents
            .into_iter()
            .map(|(abbr, agent)| (abbr, agent.with_judge(judge.clone())))
            .collect();
        self
    }

    /// Attach a snapshot store, saved after every applied outcome
    pub fn with_store(mut self, store: Arc<dyn LeagueStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Shared handle to the league state (read side for API layers)
    pub fn league(&self) -> Arc<RwLock<LeagueState>> {
        self.league.clone()
    }

    /// Handle that abandons an in-progress cycle after the current trade
    /// resolves
    pub fn halt_handle(&self) -> Arc<AtomicBool> {
        self.halted.clone()
    }

    fn is_halted(&self) -> bool {
        self.halted.load(Ordering::SeqCst)
    }

    /// Designate the human-controlled team
    pub fn select_user_team(&mut self, abbreviation: &str) -> Result<()> {
        if !self.agents.contains_key(abbreviation) {
            return Err(FrontOfficeError::UnknownTeam(abbreviation.to_string()));
        }
        info!(team = abbreviation, "user team selected");
        self.user_team = Some(abbreviation.to_string());
        Ok(())
    }

    pub fn user_team(&self) -> Option<&str> {
        self.user_team.as_deref()
    }

    /// Process a trade proposed by the human user.
    ///
    /// Validation failures surface as a rejected response, never as an
    /// error past this boundary.
    pub async fn process_user_trade_proposal(
        &mut self,
        proposal: &TradeProposal,
    ) -> Result<TradeResponse> {
        let user_team = self.user_team.clone().ok_or(FrontOfficeError::NoUserTeam)?;
        let trade = &proposal.trade;
        let target = trade.counterparty(&user_team).to_string();
        self.route_proposal(proposal, &target).await
    }

    /// Process a proposal initiated by one agent toward another
    pub async fn process_agent_trade_proposal(
        &mut self,
        source_team: &str,
        proposal: &TradeProposal,
    ) -> Result<TradeResponse> {
        let target = proposal.trade.counterparty(source_team).to_string();
        self.route_proposal(proposal, &target).await
    }

    /// Record the proposal, let the target agent respond, and apply the
    /// outcome atomically.
    async fn route_proposal(
        &mut self,
        proposal: &TradeProposal,
        target: &str,
    ) -> Result<TradeResponse> {
        let trade = &proposal.trade;

        if !self.agents.contains_key(target) {
            return Ok(TradeResponse {
                trade_id: trade.id.clone(),
                status: TradeStatus::Rejected,
                message: "Invalid target team.".to_string(),
                counter_trade: None,
            });
        }

        // Reject malformed trades up front, without touching any roster
        let validation = {
            let league = self.league.read().await;
            league.validate_trade(trade)
        };
        if let Err(e) = validation {
            debug!(trade_id = %trade.id, error = %e, "trade failed validation");
            return Ok(TradeResponse {
                trade_id: trade.id.clone(),
                status: TradeStatus::Rejected,
                message: format!("Trade could not be processed: {}", e),
                counter_trade: None,
            });
        }

        {
            let mut league = self.league.write().await;
            league.record_trade(trade.clone());
        }

        let agent = self.agents.get_mut(target).expect("checked above");
        let response = agent.respond_to_trade(trade).await?;

        self.apply_response(trade, &response).await?;
        self.save_snapshot().await;
        Ok(response)
    }

    /// Apply a computed response as a unit: execute, counter, or mark
    /// rejected
    async fn apply_response(&mut self, trade: &Trade, response: &TradeResponse) -> Result<()> {
        let mut league = self.league.write().await;
        match response.status {
            TradeStatus::Accepted => {
                league.execute_trade(trade)?;
            }
            TradeStatus::Countered => {
                league.set_trade_status(&trade.id, TradeStatus::Countered)?;
                if let Some(counter) = &response.counter_trade {
                    league.record_trade(counter.clone());
                }
            }
            TradeStatus::Rejected => {
                league.set_trade_status(&trade.id, TradeStatus::Rejected)?;
            }
            TradeStatus::Proposed => {}
        }
        Ok(())
    }

    async fn save_snapshot(&self) {
        if let Some(store) = &self.store {
            let league = self.league.read().await;
            if let Err(e) = store.save(&league) {
                warn!(error = %e, "league snapshot failed");
            }
        }
    }

    /// The user answers a trade that involves their team
    pub async fn respond_to_trade_as_user(
        &mut self,
        trade_id: &str,
        decision: UserDecision,
        counter: Option<Trade>,
    ) -> Result<TradeResponse> {
        let user_team = self.user_team.clone().ok_or(FrontOfficeError::NoUserTeam)?;
        let trade = {
            let league = self.league.read().await;
            league
                .trade(trade_id)
                .cloned()
                .ok_or_else(|| FrontOfficeError::TradeNotFound(trade_id.to_string()))?
        };
        if !trade.involves(&user_team) {
            return Err(FrontOfficeError::InvalidTrade(format!(
                "{} is not a party to trade {}",
                user_team, trade_id
            )));
        }

        let response = match decision {
            UserDecision::Accept => TradeResponse {
                trade_id: trade.id.clone(),
                status: TradeStatus::Accepted,
                message: "Trade accepted.".to_string(),
                counter_trade: None,
            },
            UserDecision::Reject => TradeResponse {
                trade_id: trade.id.clone(),
                status: TradeStatus::Rejected,
                message: "Trade rejected.".to_string(),
                counter_trade: None,
            },
            UserDecision::Counter => {
                // Use the provided counter, or search for one on the
                // user's behalf
                let counter = match counter {
                    Some(c) => Some(c),
                    None => {
                        let agent = self
                            .agents
                            .get_mut(&user_team)
                            .expect("user team always has an agent");
                        agent.create_counter_offer(&trade).await
                    }
                };
                match counter {
                    Some(counter) => TradeResponse {
                        trade_id: trade.id.clone(),
                        status: TradeStatus::Countered,
                        message: "Counter-proposal sent.".to_string(),
                        counter_trade: Some(counter),
                    },
                    None => TradeResponse {
                        trade_id: trade.id.clone(),
                        status: TradeStatus::Rejected,
                        message: "No workable counter-offer found; trade rejected.".to_string(),
                        counter_trade: None,
                    },
                }
            }
        };

        self.apply_response(&trade, &response).await?;
        self.save_snapshot().await;
        Ok(response)
    }

    /// Run one round of league-wide agent negotiation.
    ///
    /// No-op until a user team is selected. Team order is reshuffled
    /// every cycle so no agent has a permanent first-mover advantage,
    /// and the user's team never initiates. When the round produced
    /// fewer than two outcomes and the league is big enough, one extra
    /// proposal between two random agent teams keeps the feed alive.
    pub async fn run_cycle(&mut self) -> Result<Vec<CycleOutcome>> {
        if self.user_team.is_none() {
            debug!("no user team selected, skipping cycle");
            return Ok(Vec::new());
        }

        let mut order: Vec<String> = self.agents.keys().cloned().collect();
        order.shuffle(&mut self.rng);

        let mut outcomes = Vec::new();
        'teams: for abbr in &order {
            if self.is_halted() {
                info!("cycle halted");
                break;
            }
            if Some(abbr.as_str()) == self.user_team.as_deref() {
                continue;
            }

            let agent = self.agents.get_mut(abbr).expect("agent for every team");
            let proposals = match agent.consider_initiating_trades().await {
                Ok(proposals) => proposals,
                Err(e) => {
                    // One bad agent never takes the cycle down
                    warn!(team = %abbr, error = %e, "agent failed to consider trades");
                    continue;
                }
            };

            for proposal in proposals {
                if self.is_halted() {
                    info!("cycle halted");
                    break 'teams;
                }
                match self.process_agent_trade_proposal(abbr, &proposal).await {
                    Ok(response) => {
                        debug!(
                            source = %abbr,
                            trade_id = %proposal.trade.id,
                            status = %response.status,
                            "proposal resolved"
                        );
                        outcomes.push(CycleOutcome { proposal, response });
                    }
                    Err(e) => {
                        warn!(team = %abbr, error = %e, "failed to process proposal");
                    }
                }
            }
        }

        // Liveness backstop: guarantee visible activity in big leagues
        if outcomes.len() < MIN_CYCLE_TRADES
            && self.agents.len() >= MIN_TEAMS_FOR_BACKSTOP
            && !self.is_halted()
        {
            if let Some(outcome) = self.force_backstop_trade().await {
                outcomes.push(outcome);
            }
        }

        info!(outcomes = outcomes.len(), "cycle complete");
        Ok(outcomes)
    }

    /// Force one proposal between two random non-user teams
    async fn force_backstop_trade(&mut self) -> Option<CycleOutcome> {
        let mut candidates: Vec<String> = self
            .agents
            .keys()
            .filter(|abbr| Some(abbr.as_str()) != self.user_team.as_deref())
            .cloned()
            .collect();
        if candidates.len() < 2 {
            return None;
        }
        candidates.shuffle(&mut self.rng);
        let source = candidates[0].clone();
        let target = candidates[1].clone();
        debug!(source = %source, target = %target, "forcing backstop proposal");

        let agent = self.agents.get_mut(&source)?;
        let proposal = match agent.generate_trade_proposal(&target).await {
            Ok(Some(proposal)) => proposal,
            Ok(None) => {
                debug!(source = %source, target = %target, "backstop found no proposal");
                return None;
            }
            Err(e) => {
                warn!(source = %source, error = %e, "backstop proposal failed");
                return None;
            }
        };

        match self.process_agent_trade_proposal(&source, &proposal).await {
            Ok(response) => Some(CycleOutcome { proposal, response }),
            Err(e) => {
                warn!(source = %source, error = %e, "backstop processing failed");
                None
            }
        }
    }

    // ── Query surface consumed by the web layer ────────────────────

    /// All teams, in abbreviation order
    pub async fn list_teams(&self) -> Vec<TeamInfo> {
        let league = self.league.read().await;
        league
            .teams
            .values()
            .map(|team| TeamInfo {
                id: team.id.clone(),
                name: team.name.clone(),
                abbreviation: team.abbreviation.clone(),
                city: team.city.clone(),
                conference: team.conference.clone(),
                division: team.division.clone(),
            })
            .collect()
    }

    /// Roster and payroll view for one team, players sorted by salary
    pub async fn get_team_roster(&self, abbreviation: &str) -> Result<RosterSummary> {
        let league = self.league.read().await;
        let team = league.require_team(abbreviation)?;

        let mut players = team.roster.clone();
        players.sort_by(|a, b| b.salary.cmp(&a.salary));

        Ok(RosterSummary {
            team: TeamInfo {
                id: team.id.clone(),
                name: team.name.clone(),
                abbreviation: team.abbreviation.clone(),
                city: team.city.clone(),
                conference: team.conference.clone(),
                division: team.division.clone(),
            },
            players,
            salary_info: SalarySummary {
                total: team.total_salary(),
                cap: team.salary_cap,
                luxury_tax: team.luxury_tax,
                available_space: team.available_cap_space(),
                over_cap: team.is_over_cap(),
                over_tax: team.is_over_luxury_tax(),
            },
        })
    }

    /// Most recent trades first, bounded, with team and player names
    /// resolved. Trades referencing teams that no longer resolve are
    /// skipped.
    pub async fn get_league_activity(&self, limit: usize) -> Vec<ActivityEntry> {
        let league = self.league.read().await;

        // Reverse first so same-second trades list newest first after
        // the stable sort
        let mut recent: Vec<&Trade> = league.trades.iter().rev().collect();
        recent.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        recent
            .into_iter()
            .filter_map(|trade| {
                let team1 = league.team(&trade.team1)?;
                let team2 = league.team(&trade.team2)?;
                let resolve = |ids: &[String]| {
                    ids.iter()
                        .filter_map(|id| league.player_by_id(id).map(|(p, _)| p.name.clone()))
                        .collect::<Vec<String>>()
                };
                Some(ActivityEntry {
                    id: trade.id.clone(),
                    timestamp: trade.timestamp.to_rfc3339(),
                    status: trade.status,
                    team1: ActivitySide {
                        abbr: trade.team1.clone(),
                        name: team1.full_name(),
                        players: resolve(&trade.team1_players),
                    },
                    team2: ActivitySide {
                        abbr: trade.team2.clone(),
                        name: team2.full_name(),
                        players: resolve(&trade.team2_players),
                    },
                    proposed_by: trade.proposed_by.clone(),
                })
            })
            .take(limit)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Position, StatKey, StatLine};
    use crate::persistence::JsonFileStore;
    use rust_decimal_macros::dec;

    fn player(id: &str, position: Position, ppg: f64) -> Player {
        Player {
            id: id.to_string(),
            name: format!("Player {}", id),
            position,
            age: 26,
            height: "6'8\"".to_string(),
            weight: 220,
            salary: dec!(8_000_000),
            contract_years: 2,
            stats: StatLine::new().with(StatKey::Ppg, ppg),
        }
    }

    fn mini_league(team_count: usize) -> LeagueState {
        let mut league = LeagueState::new();
        for t in 0..team_count {
            let abbr = format!("T{:02}", t);
            let mut roster = Vec::new();
            for (i, position) in Position::ALL.iter().cycle().take(10).enumerate() {
                roster.push(player(&format!("{}_{}", abbr, i + 1), *position, 15.0));
            }
            league.teams.insert(
                abbr.clone(),
                crate::domain::Team {
                    id: abbr.clone(),
                    name: abbr.clone(),
                    abbreviation: abbr.clone(),
                    city: abbr.clone(),
                    conference: "East".to_string(),
                    division: "Atlantic".to_string(),
                    roster,
                    draft_picks: Vec::new(),
                    salary_cap: crate::domain::DEFAULT_SALARY_CAP,
                    luxury_tax: crate::domain::DEFAULT_LUXURY_TAX,
                },
            );
        }
        league
    }

    fn orchestrator(team_count: usize, seed: u64) -> LeagueOrchestrator {
        let config = OrchestratorConfig {
            agent: GmAgentConfig {
                cooldown_secs: 0,
                judge_timeout: std::time::Duration::from_millis(100),
            },
            seed: Some(seed),
        };
        LeagueOrchestrator::new(mini_league(team_count), config)
    }

    #[tokio::test]
    async fn test_cycle_is_noop_without_user_team() {
        let mut orch = orchestrator(6, 11);
        let outcomes = orch.run_cycle().await.unwrap();
        assert!(outcomes.is_empty());
    }

    #[tokio::test]
    async fn test_cycle_produces_activity_with_backstop() {
        let mut orch = orchestrator(6, 11);
        orch.select_user_team("T00").unwrap();
        let outcomes = orch.run_cycle().await.unwrap();
        // Agents may skip on their random gate, but the backstop fires
        // whenever fewer than two outcomes landed naturally.
        assert!(!outcomes.is_empty());
    }

    #[tokio::test]
    async fn test_user_team_never_initiates() {
        let mut orch = orchestrator(6, 42);
        orch.select_user_team("T02").unwrap();
        for _ in 0..5 {
            let outcomes = orch.run_cycle().await.unwrap();
            for outcome in &outcomes {
                assert_ne!(outcome.proposal.trade.team1, "T02");
                assert_ne!(
                    outcome.proposal.trade.proposed_by,
                    TradeActor::Team("T02".to_string())
                );
            }
        }
    }

    #[tokio::test]
    async fn test_roster_invariant_survives_cycles() {
        let mut orch = orchestrator(6, 7);
        orch.select_user_team("T00").unwrap();

        let all_ids = |league: &LeagueState| {
            let mut ids: Vec<String> = league
                .teams
                .values()
                .flat_map(|t| t.roster.iter().map(|p| p.id.clone()))
                .collect();
            ids.sort();
            ids
        };
        let before = all_ids(&*orch.league().read().await);

        for _ in 0..3 {
            orch.run_cycle().await.unwrap();
        }

        let after = all_ids(&*orch.league().read().await);
        assert_eq!(before, after, "players must never duplicate or vanish");
    }

    #[tokio::test]
    async fn test_halt_abandons_cycle() {
        let mut orch = orchestrator(6, 11);
        orch.select_user_team("T00").unwrap();
        orch.halt_handle().store(true, Ordering::SeqCst);
        let outcomes = orch.run_cycle().await.unwrap();
        assert!(outcomes.is_empty());
    }

    #[tokio::test]
    async fn test_select_unknown_user_team_fails() {
        let mut orch = orchestrator(4, 1);
        let err = orch.select_user_team("ZZZ").unwrap_err();
        assert!(matches!(err, FrontOfficeError::UnknownTeam(_)));
    }

    #[tokio::test]
    async fn test_user_proposal_invalid_target_is_rejected_response() {
        let mut orch = orchestrator(4, 1);
        orch.select_user_team("T00").unwrap();

        let mut trade = Trade::new("T00", "ZZZ", TradeActor::User);
        trade.team1_players = vec!["T00_1".to_string()];
        let proposal = TradeProposal {
            trade,
            message: "Test".to_string(),
        };
        let response = orch.process_user_trade_proposal(&proposal).await.unwrap();
        assert_eq!(response.status, TradeStatus::Rejected);
        assert_eq!(response.message, "Invalid target team.");
    }

    #[tokio::test]
    async fn test_user_proposal_with_missing_player_is_rejected() {
        let mut orch = orchestrator(4, 1);
        orch.select_user_team("T00").unwrap();

        let mut trade = Trade::new("T00", "T01", TradeActor::User);
        trade.team1_players = vec!["T00_404".to_string()];
        trade.team2_players = vec!["T01_1".to_string()];
        let proposal = TradeProposal {
            trade,
            message: "Test".to_string(),
        };
        let response = orch.process_user_trade_proposal(&proposal).await.unwrap();
        assert_eq!(response.status, TradeStatus::Rejected);
        assert!(response.message.contains("could not be processed"));
        // Nothing moved
        let league = orch.league();
        let league = league.read().await;
        assert!(league.team("T01").unwrap().has_player("T01_1"));
    }

    #[tokio::test]
    async fn test_accepted_user_proposal_moves_players() {
        let mut orch = orchestrator(4, 1);
        orch.select_user_team("T00").unwrap();

        // Two of ours for one of theirs: clearly favorable for T01
        let mut trade = Trade::new("T00", "T01", TradeActor::User);
        trade.team1_players = vec!["T00_1".to_string(), "T00_6".to_string()];
        trade.team2_players = vec!["T01_1".to_string()];
        let proposal = TradeProposal {
            trade: trade.clone(),
            message: "Take both guards".to_string(),
        };

        let response = orch.process_user_trade_proposal(&proposal).await.unwrap();
        assert_eq!(response.status, TradeStatus::Accepted);

        let league = orch.league();
        let league = league.read().await;
        assert!(league.team("T01").unwrap().has_player("T00_1"));
        assert!(league.team("T00").unwrap().has_player("T01_1"));
        assert_eq!(
            league.trade(&trade.id).unwrap().status,
            TradeStatus::Accepted
        );
    }

    #[tokio::test]
    async fn test_user_responds_accept_executes() {
        let mut orch = orchestrator(4, 1);
        orch.select_user_team("T00").unwrap();

        // An agent proposed a swap to the user earlier
        let mut trade = Trade::new("T01", "T00", TradeActor::Team("T01".to_string()));
        trade.team1_players = vec!["T01_2".to_string()];
        trade.team2_players = vec!["T00_2".to_string()];
        {
            let league = orch.league();
            let mut league = league.write().await;
            league.record_trade(trade.clone());
        }

        let response = orch
            .respond_to_trade_as_user(&trade.id, UserDecision::Accept, None)
            .await
            .unwrap();
        assert_eq!(response.status, TradeStatus::Accepted);

        let league = orch.league();
        let league = league.read().await;
        assert!(league.team("T00").unwrap().has_player("T01_2"));
    }

    #[tokio::test]
    async fn test_user_counter_without_payload_searches() {
        let mut orch = orchestrator(4, 1);
        orch.select_user_team("T00").unwrap();

        let mut trade = Trade::new("T01", "T00", TradeActor::Team("T01".to_string()));
        trade.team1_players = vec!["T01_2".to_string()];
        trade.team2_players = vec!["T00_2".to_string(), "T00_3".to_string()];
        {
            let league = orch.league();
            let mut league = league.write().await;
            league.record_trade(trade.clone());
        }

        let response = orch
            .respond_to_trade_as_user(&trade.id, UserDecision::Counter, None)
            .await
            .unwrap();
        assert_eq!(response.status, TradeStatus::Countered);
        let counter = response.counter_trade.expect("counter present");
        assert_eq!(counter.counter_trade_id.as_deref(), Some(trade.id.as_str()));

        let league = orch.league();
        let league = league.read().await;
        assert_eq!(
            league.trade(&trade.id).unwrap().status,
            TradeStatus::Countered
        );
        assert!(league.trade(&counter.id).is_some(), "counter is in the ledger");
    }

    #[tokio::test]
    async fn test_activity_feed_is_bounded_and_recent_first() {
        let mut orch = orchestrator(4, 1);
        orch.select_user_team("T00").unwrap();

        for i in 0..5 {
            let mut trade = Trade::new("T01", "T02", TradeActor::Team("T01".to_string()));
            trade.team1_players = vec![format!("T01_{}", i + 1)];
            let league = orch.league();
            let mut league = league.write().await;
            league.record_trade(trade);
        }

        let activity = orch.get_league_activity(3).await;
        assert_eq!(activity.len(), 3);
        // Ledger order breaks the same-second tie: newest first
        let last_recorded = {
            let league = orch.league();
            let league = league.read().await;
            league.trades.last().unwrap().id.clone()
        };
        assert_eq!(activity[0].id, last_recorded);
    }

    #[tokio::test]
    async fn test_roster_summary_sorts_by_salary() {
        let mut orch = orchestrator(4, 1);
        {
            let league = orch.league();
            let mut league = league.write().await;
            league.team_mut("T00").unwrap().roster[3].salary = dec!(30_000_000);
        }
        let summary = orch.get_team_roster("T00").await.unwrap();
        assert_eq!(summary.players[0].id, "T00_4");
        assert_eq!(summary.salary_info.total, dec!(102_000_000));
        assert!(!summary.salary_info.over_cap);
    }

    #[tokio::test]
    async fn test_snapshot_store_receives_saves() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(JsonFileStore::new(dir.path().join("league.json")));

        let mut orch = orchestrator(4, 1).with_store(store.clone());
        orch.select_user_team("T00").unwrap();

        let mut trade = Trade::new("T00", "T01", TradeActor::User);
        trade.team1_players = vec!["T00_1".to_string(), "T00_6".to_string()];
        trade.team2_players = vec!["T01_1".to_string()];
        let proposal = TradeProposal {
            trade,
            message: "Test".to_string(),
        };
        orch.process_user_trade_proposal(&proposal).await.unwrap();

        let saved = store.load().unwrap();
        assert!(saved.team("T01").unwrap().has_player("T00_1"));
        assert_eq!(saved.trades.len(), 1);
    }
}
