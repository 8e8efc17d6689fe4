//! Per-team GM agent: the negotiation engine.
//!
//! Each team gets one `GmAgent` sharing the league state. An agent
//! responds to incoming trades (judge first, deterministic fallback),
//! searches for counter-offers, and periodically initiates proposals of
//! its own. All randomness flows through an injected seeded RNG so
//! cycles replay exactly in tests.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::domain::{Player, Trade, TradeActor, TradeProposal, TradeResponse, TradeStatus};
use crate::error::Result;
use crate::judge::{JudgeVerdict, LanguageModelJudge, TradeContext};
use crate::league::LeagueState;
use crate::valuation::{evaluate_trade, player_value, PositionalNeeds, TradeEvaluation};

/// Chance an eligible agent actually initiates trades this cycle
const INITIATE_PROBABILITY: f64 = 0.7;
/// Chance a counter-offer removes our best outgoing player rather than
/// asking for one of theirs
const COUNTER_REMOVE_PROBABILITY: f64 = 0.7;
/// Players valued above this never go into an outgoing package
const OUTGOING_VALUE_CEILING: f64 = 50.0;
/// Outgoing salary target as a fraction of incoming salary
const SALARY_MATCH_RATIO: Decimal = dec!(0.7);
/// Outgoing salary floor
const MIN_OUTGOING_SALARY: Decimal = dec!(1_000_000);
/// Positions with a fill ratio at or above this are not shopping targets
const NEED_THRESHOLD: f64 = 1.5;
/// How many of the most-needed positions to shop for
const TOP_NEEDS: usize = 2;

/// Tunables for one GM agent
#[derive(Debug, Clone)]
pub struct GmAgentConfig {
    /// Minimum seconds between trade-initiation checks
    pub cooldown_secs: i64,
    /// Wall-clock budget for one judge call
    pub judge_timeout: Duration,
}

impl Default for GmAgentConfig {
    fn default() -> Self {
        Self {
            cooldown_secs: 30,
            judge_timeout: Duration::from_secs(45),
        }
    }
}

/// Autonomous decision-maker for one team
pub struct GmAgent {
    team_abbr: String,
    league: Arc<RwLock<LeagueState>>,
    judge: Option<Arc<dyn LanguageModelJudge>>,
    config: GmAgentConfig,
    last_trade_check: DateTime<Utc>,
    rng: StdRng,
}

impl GmAgent {
    pub fn new(
        team_abbr: &str,
        league: Arc<RwLock<LeagueState>>,
        config: GmAgentConfig,
        seed: u64,
    ) -> Self {
        Self {
            team_abbr: team_abbr.to_string(),
            league,
            judge: None,
            config,
            last_trade_check: Utc::now(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Attach a qualitative judge consulted before the deterministic
    /// fallback
    pub fn with_judge(mut self, judge: Arc<dyn LanguageModelJudge>) -> Self {
        self.judge = Some(judge);
        self
    }

    pub fn team_abbr(&self) -> &str {
        &self.team_abbr
    }

    /// Respond to an incoming trade proposal.
    ///
    /// The judge (when attached) gets the first word, bounded by the
    /// configured timeout. Any judge failure falls back to the
    /// deterministic evaluation: accept when acceptable, counter inside
    /// the counter window, reject otherwise. A counter decision with no
    /// workable modification degrades to a rejection.
    pub async fn respond_to_trade(&mut self, trade: &Trade) -> Result<TradeResponse> {
        let evaluation = {
            let league = self.league.read().await;
            evaluate_trade(&league, trade, &self.team_abbr)?
        };

        let (verdict, message) = match self.consult_judge(trade).await {
            Some(decision) => {
                debug!(
                    team = %self.team_abbr,
                    trade_id = %trade.id,
                    verdict = ?decision.decision,
                    "judge decision"
                );
                (decision.decision, decision.message)
            }
            None => Self::fallback_decision(&evaluation),
        };

        let response = match verdict {
            JudgeVerdict::Accept => TradeResponse {
                trade_id: trade.id.clone(),
                status: TradeStatus::Accepted,
                message,
                counter_trade: None,
            },
            JudgeVerdict::Reject => TradeResponse {
                trade_id: trade.id.clone(),
                status: TradeStatus::Rejected,
                message,
                counter_trade: None,
            },
            JudgeVerdict::Counter => match self.create_counter_offer(trade).await {
                Some(counter) => TradeResponse {
                    trade_id: trade.id.clone(),
                    status: TradeStatus::Countered,
                    message: format!(
                        "{} I have a counter-proposal that might work better for us.",
                        message
                    ),
                    counter_trade: Some(counter),
                },
                None => TradeResponse {
                    trade_id: trade.id.clone(),
                    status: TradeStatus::Rejected,
                    message: format!(
                        "{} I couldn't find a counter-offer that works for us.",
                        message
                    ),
                    counter_trade: None,
                },
            },
        };
        Ok(response)
    }

    /// Ask the judge, converting every failure mode into `None`
    async fn consult_judge(&self, trade: &Trade) -> Option<crate::judge::JudgeDecision> {
        let judge = self.judge.as_ref()?;
        let context = {
            let league = self.league.read().await;
            match TradeContext::build(&league, trade, &self.team_abbr) {
                Ok(ctx) => ctx,
                Err(e) => {
                    warn!(team = %self.team_abbr, error = %e, "could not build judge context");
                    return None;
                }
            }
        };

        match timeout(self.config.judge_timeout, judge.evaluate(&context)).await {
            Ok(Ok(decision)) => Some(decision),
            Ok(Err(e)) => {
                warn!(team = %self.team_abbr, trade_id = %trade.id, error = %e,
                    "judge failed, using deterministic fallback");
                None
            }
            Err(_) => {
                warn!(team = %self.team_abbr, trade_id = %trade.id,
                    timeout_ms = self.config.judge_timeout.as_millis() as u64,
                    "judge timed out, using deterministic fallback");
                None
            }
        }
    }

    /// Deterministic decision from a trade evaluation, with canned
    /// messages
    fn fallback_decision(evaluation: &TradeEvaluation) -> (JudgeVerdict, String) {
        if evaluation.acceptable {
            (
                JudgeVerdict::Accept,
                "This looks like a deal that works for both sides.".to_string(),
            )
        } else if evaluation.counter_needed {
            (JudgeVerdict::Counter, evaluation.reasoning.clone())
        } else {
            (
                JudgeVerdict::Reject,
                "Thanks for the offer, but it's not the right fit for our team.".to_string(),
            )
        }
    }

    /// Search for a modified trade that is more favorable to us.
    ///
    /// Stats-driven, never consults the judge. Prefers (with probability
    /// 0.7) dropping our single most valuable outgoing player; otherwise
    /// asks for one more of their players at the descending-value index
    /// n/3 — a reasonable ask, not their best asset. Returns `None` when
    /// no modification was possible.
    pub async fn create_counter_offer(&mut self, original: &Trade) -> Option<Trade> {
        let league = self.league.read().await;
        let our_team = league.team(&self.team_abbr)?;
        let other_team = league.team(original.counterparty(&self.team_abbr))?;
        let needs = PositionalNeeds::from_team(our_team);

        let mut counter = Trade::new(
            &original.team1,
            &original.team2,
            TradeActor::Team(self.team_abbr.clone()),
        );
        counter.team1_players = original.team1_players.clone();
        counter.team2_players = original.team2_players.clone();
        counter.team1_picks = original.team1_picks.clone();
        counter.team2_picks = original.team2_picks.clone();
        counter.counter_trade_id = Some(original.id.clone());

        let we_are_team1 = original.team1 == self.team_abbr;
        let our_ids = original.outgoing_for(&self.team_abbr).to_vec();
        let their_ids = original.incoming_for(&self.team_abbr).to_vec();

        let roll: f64 = self.rng.gen();
        if !our_ids.is_empty() && roll < COUNTER_REMOVE_PROBABILITY {
            // Drop our most valuable player from the package
            let mut ours: Vec<&Player> = our_team
                .roster
                .iter()
                .filter(|p| our_ids.contains(&p.id))
                .collect();
            ours.sort_by(|a, b| {
                player_value(b, &needs).total_cmp(&player_value(a, &needs))
            });
            if let Some(to_remove) = ours.first() {
                let side = if we_are_team1 {
                    &mut counter.team1_players
                } else {
                    &mut counter.team2_players
                };
                side.retain(|id| id != &to_remove.id);
            }
        } else {
            // Ask for one more of their players, mid-to-lower value
            let mut available: Vec<&Player> = other_team
                .roster
                .iter()
                .filter(|p| !their_ids.contains(&p.id))
                .collect();
            if !available.is_empty() {
                available.sort_by(|a, b| {
                    player_value(b, &needs).total_cmp(&player_value(a, &needs))
                });
                let index = (available.len() / 3).min(available.len() - 1);
                let to_add = available[index];
                let side = if we_are_team1 {
                    &mut counter.team2_players
                } else {
                    &mut counter.team1_players
                };
                side.push(to_add.id.clone());
            }
        }

        if counter.same_players_as(original) {
            return None; // no workable modification
        }
        Some(counter)
    }

    /// Generate a proposal targeting another team, or `None` when no
    /// sensible package exists.
    pub async fn generate_trade_proposal(
        &mut self,
        target_abbr: &str,
    ) -> Result<Option<TradeProposal>> {
        let league = self.league.read().await;
        let Some(target_team) = league.team(target_abbr) else {
            warn!(team = %self.team_abbr, target = target_abbr, "proposal target does not exist");
            return Ok(None);
        };
        let our_team = league.require_team(&self.team_abbr)?;
        let needs = PositionalNeeds::from_team(our_team);

        // Shop our most-needed positions first
        let mut targets: Vec<&Player> = Vec::new();
        for (position, need) in needs.ranked().into_iter().take(TOP_NEEDS) {
            if need >= NEED_THRESHOLD {
                continue;
            }
            let mut matching: Vec<&Player> = target_team
                .roster
                .iter()
                .filter(|p| p.position == position)
                .collect();
            if matching.is_empty() {
                continue;
            }
            matching.sort_by(|a, b| {
                player_value(b, &needs).total_cmp(&player_value(a, &needs))
            });
            targets.push(matching[0]);
        }

        // No positional fit: fall back to a value pick, deliberately
        // below their best asset
        if targets.is_empty() && !target_team.roster.is_empty() {
            let mut by_value: Vec<&Player> = target_team.roster.iter().collect();
            by_value.sort_by(|a, b| {
                player_value(b, &needs).total_cmp(&player_value(a, &needs))
            });
            let index = (by_value.len() / 3).min(by_value.len() - 1);
            targets.push(by_value[index]);
        }

        if targets.is_empty() {
            debug!(team = %self.team_abbr, target = target_abbr, "no suitable players found");
            return Ok(None);
        }

        // Build an outgoing package from our lowest-value players until
        // the salaries roughly line up
        let incoming_salary: Decimal = targets.iter().map(|p| p.salary).sum();
        let target_outgoing = (incoming_salary * SALARY_MATCH_RATIO).max(MIN_OUTGOING_SALARY);

        let mut our_sorted: Vec<&Player> = our_team.roster.iter().collect();
        our_sorted.sort_by(|a, b| {
            player_value(a, &needs).total_cmp(&player_value(b, &needs))
        });

        let mut outgoing: Vec<&Player> = Vec::new();
        let mut outgoing_salary = Decimal::ZERO;
        for &player in &our_sorted {
            if player_value(player, &needs) > OUTGOING_VALUE_CEILING {
                continue;
            }
            outgoing.push(player);
            outgoing_salary += player.salary;
            if !outgoing.is_empty() && outgoing_salary >= target_outgoing {
                break;
            }
        }
        if outgoing.is_empty() {
            if let Some(lowest) = our_sorted.first().copied() {
                outgoing.push(lowest);
            }
        }

        let mut trade = Trade::new(
            &self.team_abbr,
            target_abbr,
            TradeActor::Team(self.team_abbr.clone()),
        );
        trade.team1_players = outgoing.iter().map(|p| p.id.clone()).collect();
        trade.team2_players = targets.iter().map(|p| p.id.clone()).collect();

        let outgoing_names: Vec<&str> = outgoing.iter().map(|p| p.name.as_str()).collect();
        let incoming_names: Vec<&str> = targets.iter().map(|p| p.name.as_str()).collect();
        let incoming_positions: Vec<&str> =
            targets.iter().map(|p| p.position.as_str()).collect();
        let message = format!(
            "I'm proposing a trade where we send {} to the {} in exchange for {}. \
This trade addresses our need for {}",
            outgoing_names.join(", "),
            target_team.full_name(),
            incoming_names.join(", "),
            incoming_positions.join(", "),
        );

        Ok(Some(TradeProposal { trade, message }))
    }

    /// Cooldown-gated, probability-gated trade initiation: pick 2-3
    /// random other teams and try to build a proposal against each.
    pub async fn consider_initiating_trades(&mut self) -> Result<Vec<TradeProposal>> {
        let now = Utc::now();
        if (now - self.last_trade_check).num_seconds() < self.config.cooldown_secs {
            return Ok(Vec::new());
        }
        self.last_trade_check = now;

        if self.rng.gen::<f64>() > INITIATE_PROBABILITY {
            return Ok(Vec::new());
        }

        let mut others: Vec<String> = {
            let league = self.league.read().await;
            league
                .teams
                .keys()
                .filter(|abbr| *abbr != &self.team_abbr)
                .cloned()
                .collect()
        };
        if others.is_empty() {
            return Ok(Vec::new());
        }
        others.shuffle(&mut self.rng);
        let count = self.rng.gen_range(2..=3).min(others.len());

        let mut proposals = Vec::new();
        for target in others.into_iter().take(count) {
            if let Some(proposal) = self.generate_trade_proposal(&target).await? {
                proposals.push(proposal);
            }
        }
        Ok(proposals)
    }
}
