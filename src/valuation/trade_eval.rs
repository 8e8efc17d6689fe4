use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::{Player, Position, Trade};
use crate::error::{FrontOfficeError, Result};
use crate::league::LeagueState;

use super::needs::{PositionalNeeds, IDEAL_POSITION_COUNT};
use super::player_value::player_value;

/// Flat penalty for a trade that pushes the team into the luxury tax
const NEW_TAX_PENALTY: f64 = 10.0;
/// Divisor converting a salary delta into value points for teams already
/// in the tax
const TAX_DOLLARS_PER_POINT: Decimal = rust_decimal_macros::dec!(10_000_000);
/// Penalty per missing player at a position after the trade
const DEFICIT_PENALTY: f64 = 5.0;
/// Penalty per player beyond one surplus spot at a position
const SURPLUS_PENALTY: f64 = 3.0;

/// Acceptance threshold: slightly unfavorable trades still clear
const ACCEPT_THRESHOLD: f64 = -5.0;
/// Counter window floor: worse than this is rejected outright
const COUNTER_THRESHOLD: f64 = -10.0;

/// Cap and luxury-tax situation before and after the trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CapStatus {
    pub current_over_cap: bool,
    pub new_over_cap: bool,
    pub current_over_tax: bool,
    pub new_over_tax: bool,
}

impl CapStatus {
    /// The trade moves the team from under to over the tax line
    pub fn enters_tax(&self) -> bool {
        !self.current_over_tax && self.new_over_tax
    }

    /// The team is in the tax both before and after
    pub fn stays_in_tax(&self) -> bool {
        self.current_over_tax && self.new_over_tax
    }
}

/// One side's view of a proposed trade
#[derive(Debug, Clone, Serialize)]
pub struct TradeEvaluation {
    /// Value of the players we would send away
    pub our_value: f64,
    /// Value of the players we would receive, in our context
    pub their_value: f64,
    /// Signed fairness score; positive favors us
    pub value_difference: f64,
    /// Incoming salary minus outgoing salary
    pub salary_difference: Decimal,
    pub cap_status: CapStatus,
    /// Post-trade roster count minus ideal, per position
    pub position_balance: BTreeMap<Position, i64>,
    pub acceptable: bool,
    pub counter_needed: bool,
    pub reasoning: String,
}

/// Score a trade from one side's perspective.
///
/// Both player packages are valued with the perspective team's positional
/// context: what matters is what the incoming players are worth *to us*.
pub fn evaluate_trade(
    league: &LeagueState,
    trade: &Trade,
    perspective: &str,
) -> Result<TradeEvaluation> {
    if !trade.involves(perspective) {
        return Err(FrontOfficeError::InvalidTrade(format!(
            "{} is not a party to trade {}",
            perspective, trade.id
        )));
    }
    let our_team = league.require_team(perspective)?;
    let other_team = league.require_team(trade.counterparty(perspective))?;

    let outgoing_ids = trade.outgoing_for(perspective);
    let incoming_ids = trade.incoming_for(perspective);

    let our_players: Vec<&Player> = our_team
        .roster
        .iter()
        .filter(|p| outgoing_ids.contains(&p.id))
        .collect();
    let their_players: Vec<&Player> = other_team
        .roster
        .iter()
        .filter(|p| incoming_ids.contains(&p.id))
        .collect();

    let needs = PositionalNeeds::from_team(our_team);
    let our_value: f64 = our_players.iter().map(|p| player_value(p, &needs)).sum();
    let their_value: f64 = their_players.iter().map(|p| player_value(p, &needs)).sum();

    let salary_out: Decimal = our_players.iter().map(|p| p.salary).sum();
    let salary_in: Decimal = their_players.iter().map(|p| p.salary).sum();
    let salary_difference = salary_in - salary_out;

    let current_salary = our_team.total_salary();
    let new_salary = current_salary - salary_out + salary_in;
    let cap_status = CapStatus {
        current_over_cap: current_salary > our_team.salary_cap,
        new_over_cap: new_salary > our_team.salary_cap,
        current_over_tax: current_salary > our_team.luxury_tax,
        new_over_tax: new_salary > our_team.luxury_tax,
    };

    let position_balance = post_trade_balance(our_team, &our_players, &their_players);

    let mut value_difference = their_value - our_value;

    // Cap implications
    if cap_status.enters_tax() {
        value_difference -= NEW_TAX_PENALTY;
    } else if cap_status.stays_in_tax() {
        let tax_points = (salary_difference / TAX_DOLLARS_PER_POINT)
            .to_f64()
            .unwrap_or(0.0);
        // Raising the bill while in the tax costs points, shedding
        // salary earns them back
        value_difference -= tax_points;
    }

    // Positional balance after the swap
    for balance in position_balance.values() {
        if *balance < 0 {
            value_difference -= balance.unsigned_abs() as f64 * DEFICIT_PENALTY;
        } else if *balance > 1 {
            value_difference -= (*balance - 1) as f64 * SURPLUS_PENALTY;
        }
    }

    let acceptable = value_difference > ACCEPT_THRESHOLD;
    let counter_needed =
        value_difference > COUNTER_THRESHOLD && value_difference <= ACCEPT_THRESHOLD;
    let reasoning = reasoning_for(value_difference).to_string();

    Ok(TradeEvaluation {
        our_value,
        their_value,
        value_difference,
        salary_difference,
        cap_status,
        position_balance,
        acceptable,
        counter_needed,
        reasoning,
    })
}

/// Roster count minus ideal at each position, after the hypothetical swap
fn post_trade_balance(
    our_team: &crate::domain::Team,
    outgoing: &[&Player],
    incoming: &[&Player],
) -> BTreeMap<Position, i64> {
    Position::ALL
        .iter()
        .map(|&position| {
            let kept = our_team
                .roster
                .iter()
                .filter(|p| p.position == position && !outgoing.iter().any(|o| o.id == p.id))
                .count() as i64;
            let gained = incoming.iter().filter(|p| p.position == position).count() as i64;
            (position, kept + gained - IDEAL_POSITION_COUNT as i64)
        })
        .collect()
}

/// Tiered natural-language label for a fairness score
fn reasoning_for(value_difference: f64) -> &'static str {
    if value_difference > 10.0 {
        "This trade is highly favorable for our team, providing significant value."
    } else if value_difference > 0.0 {
        "This trade provides good value for our team."
    } else if value_difference > -5.0 {
        "This trade is close to fair value, with only minor disadvantages."
    } else if value_difference > -10.0 {
        "This trade is slightly unfavorable but could be acceptable with modifications."
    } else {
        "This trade provides insufficient value for our team."
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{StatKey, StatLine, Team, TradeActor};
    use rust_decimal_macros::dec;

    fn player(id: &str, position: Position, ppg: f64, salary: Decimal) -> Player {
        Player {
            id: id.to_string(),
            name: format!("Player {}", id),
            position,
            age: 26,
            height: "6'7\"".to_string(),
            weight: 220,
            salary,
            contract_years: 1,
            stats: StatLine::new().with(StatKey::Ppg, ppg),
        }
    }

    fn team(abbr: &str, roster: Vec<Player>) -> Team {
        Team {
            id: abbr.to_string(),
            name: abbr.to_string(),
            abbreviation: abbr.to_string(),
            city: abbr.to_string(),
            conference: "East".to_string(),
            division: "Atlantic".to_string(),
            roster,
            draft_picks: Vec::new(),
            salary_cap: crate::domain::DEFAULT_SALARY_CAP,
            luxury_tax: crate::domain::DEFAULT_LUXURY_TAX,
        }
    }

    /// Two teams, two players per position each, identical mid salaries
    fn balanced_league() -> LeagueState {
        let mut league = LeagueState::new();
        for abbr in ["AAA", "BBB"] {
            let mut roster = Vec::new();
            for (i, position) in Position::ALL.iter().cycle().take(10).enumerate() {
                roster.push(player(
                    &format!("{}_{}", abbr, i + 1),
                    *position,
                    20.0,
                    dec!(10_000_000),
                ));
            }
            league.teams.insert(abbr.to_string(), team(abbr, roster));
        }
        league
    }

    fn one_for_one(ours: &str, theirs: &str) -> Trade {
        let mut trade = Trade::new("AAA", "BBB", TradeActor::Team("BBB".to_string()));
        trade.team1_players = vec![ours.to_string()];
        trade.team2_players = vec![theirs.to_string()];
        trade
    }

    #[test]
    fn test_even_swap_scores_near_zero() {
        let league = balanced_league();
        // AAA_1 and BBB_1 are both PGs with identical production and pay
        let trade = one_for_one("AAA_1", "BBB_1");
        let eval = evaluate_trade(&league, &trade, "AAA").unwrap();

        assert!(eval.value_difference.abs() < 1e-9);
        assert!(eval.acceptable);
        assert!(!eval.counter_needed);
        assert_eq!(eval.salary_difference, Decimal::ZERO);
        assert_eq!(eval.position_balance[&Position::Pg], 0);
    }

    #[test]
    fn test_perspective_flips_the_sign() {
        let mut league = balanced_league();
        // Make BBB_1 strictly better than AAA_1
        league.team_mut("BBB").unwrap().roster[0]
            .stats
            .set(StatKey::Ppg, 30.0);

        let trade = one_for_one("AAA_1", "BBB_1");
        let ours = evaluate_trade(&league, &trade, "AAA").unwrap();
        let theirs = evaluate_trade(&league, &trade, "BBB").unwrap();

        assert!(ours.value_difference > 0.0);
        assert!(theirs.value_difference < 0.0);
    }

    #[test]
    fn test_positional_deficit_penalty() {
        let league = balanced_league();
        // Sending a PG for a C leaves AAA with one PG (deficit 1) and
        // three Cs (surplus penalty kicks in above one spare)
        let trade = one_for_one("AAA_1", "BBB_5");
        let eval = evaluate_trade(&league, &trade, "AAA").unwrap();

        assert_eq!(eval.position_balance[&Position::Pg], -1);
        assert_eq!(eval.position_balance[&Position::C], 1);
        // Equal players otherwise, so the score is exactly the deficit
        // penalty: -5
        assert!((eval.value_difference + DEFICIT_PENALTY).abs() < 1e-9);
        assert!(!eval.acceptable);
        assert!(eval.counter_needed, "vd == -5 sits in the counter window");
    }

    #[test]
    fn test_surplus_penalty_beyond_one_spare() {
        let mut league = balanced_league();
        // Give AAA a third center so the incoming C makes four
        let extra = player("AAA_X", Position::C, 20.0, dec!(10_000_000));
        league.team_mut("AAA").unwrap().roster.push(extra);

        let mut trade = Trade::new("AAA", "BBB", TradeActor::Team("BBB".to_string()));
        trade.team2_players = vec!["BBB_5".to_string()];
        let eval = evaluate_trade(&league, &trade, "AAA").unwrap();

        assert_eq!(eval.position_balance[&Position::C], 2);
        // Incoming player is free value, minus the surplus penalty
        assert!(eval.value_difference > 0.0);
    }

    #[test]
    fn test_entering_tax_costs_flat_penalty() {
        let mut league = balanced_league();
        // Put AAA right under the tax line
        league.team_mut("AAA").unwrap().luxury_tax = dec!(100_500_000);

        // Take on a big salary for a small one
        league.team_mut("BBB").unwrap().roster[0].salary = dec!(15_000_000);
        let trade = one_for_one("AAA_1", "BBB_1");

        let with_tax = evaluate_trade(&league, &trade, "AAA").unwrap();
        assert!(with_tax.cap_status.enters_tax());

        // Same trade with a roomier tax line
        league.team_mut("AAA").unwrap().luxury_tax = dec!(150_000_000);
        let without_tax = evaluate_trade(&league, &trade, "AAA").unwrap();

        let delta = without_tax.value_difference - with_tax.value_difference;
        assert!((delta - NEW_TAX_PENALTY).abs() < 1e-9);
    }

    #[test]
    fn test_in_tax_salary_delta_moves_score() {
        let mut league = balanced_league();
        // AAA is deep in the tax before and after
        league.team_mut("AAA").unwrap().luxury_tax = dec!(50_000_000);

        // Shedding salary earns points
        league.team_mut("BBB").unwrap().roster[0].salary = dec!(2_000_000);
        let shed = one_for_one("AAA_1", "BBB_1");
        let shed_eval = evaluate_trade(&league, &shed, "AAA").unwrap();
        assert!(shed_eval.cap_status.stays_in_tax());

        // Taking on salary costs points
        league.team_mut("BBB").unwrap().roster[0].salary = dec!(18_000_000);
        let add = one_for_one("AAA_1", "BBB_1");
        let add_eval = evaluate_trade(&league, &add, "AAA").unwrap();

        assert!(shed_eval.value_difference > add_eval.value_difference);
    }

    #[test]
    fn test_reasoning_tiers() {
        assert!(reasoning_for(12.0).contains("highly favorable"));
        assert!(reasoning_for(4.0).contains("good value"));
        assert!(reasoning_for(-2.0).contains("close to fair"));
        assert!(reasoning_for(-7.0).contains("slightly unfavorable"));
        assert!(reasoning_for(-20.0).contains("insufficient value"));
    }

    #[test]
    fn test_uninvolved_perspective_is_an_error() {
        let league = balanced_league();
        let trade = one_for_one("AAA_1", "BBB_1");
        let err = evaluate_trade(&league, &trade, "CCC").unwrap_err();
        assert!(matches!(err, FrontOfficeError::InvalidTrade(_)));
    }
}
