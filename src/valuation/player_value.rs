use crate::domain::{Player, StatKey};

use super::needs::PositionalNeeds;

/// Weight on points per game in the base value
const PPG_WEIGHT: f64 = 1.0;
/// Weight on rebounds and assists per game
const RPG_APG_WEIGHT: f64 = 0.7;

/// Scalar value of a player, as seen by the evaluating team.
///
/// Multiplies a raw production base by positional need, age, contract
/// length, and salary efficiency. The positional context comes from the
/// evaluating team, so the same player is worth more to a team that is
/// thin at their position.
pub fn player_value(player: &Player, needs: &PositionalNeeds) -> f64 {
    let base_value = base_value(player);

    // A position below ideal fill inflates value, above ideal deflates it
    let position_need_factor = 2.0 - needs.fill_ratio(player.position);

    base_value
        * position_need_factor
        * age_factor(player.age)
        * contract_factor(player.contract_years)
        * normalized_efficiency(base_value, player.salary_millions())
}

/// Raw production: ppg weighted fully, rpg and apg at 0.7
pub fn base_value(player: &Player) -> f64 {
    player.stats.get(StatKey::Ppg) * PPG_WEIGHT
        + player.stats.get(StatKey::Rpg) * RPG_APG_WEIGHT
        + player.stats.get(StatKey::Apg) * RPG_APG_WEIGHT
}

/// Age curve: upside ramp through 23, prime 24-29, then 0.05 per year
/// decline past 30. Deliberately unfloored.
fn age_factor(age: u8) -> f64 {
    let age = age as f64;
    if age <= 23.0 {
        0.8 + (age - 19.0) * 0.05
    } else if age <= 29.0 {
        1.0
    } else {
        1.0 - (age - 30.0) * 0.05
    }
}

/// Shorter contracts are worth more (flexibility)
fn contract_factor(contract_years: u8) -> f64 {
    1.0 - (contract_years as f64 - 1.0) * 0.05
}

/// Production per salary dollar, normalized into [0.5, 1.5]
fn normalized_efficiency(base_value: f64, salary_millions: f64) -> f64 {
    let efficiency = if salary_millions > 0.0 {
        base_value / salary_millions
    } else {
        base_value
    };
    (efficiency / 10.0).clamp(0.5, 1.5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Player, Position, StatLine, Team};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn player_with(ppg: f64, rpg: f64, apg: f64) -> Player {
        Player {
            id: "X_1".to_string(),
            name: "X".to_string(),
            position: Position::Sg,
            age: 26,
            height: "6'5\"".to_string(),
            weight: 200,
            salary: dec!(10_000_000),
            contract_years: 1,
            stats: StatLine::new()
                .with(StatKey::Ppg, ppg)
                .with(StatKey::Rpg, rpg)
                .with(StatKey::Apg, apg),
        }
    }

    fn balanced_team() -> Team {
        // Two players at each position: every fill ratio is exactly 1.0
        let mut roster = Vec::new();
        for (i, position) in Position::ALL.iter().cycle().take(10).enumerate() {
            let mut p = player_with(10.0, 5.0, 3.0);
            p.id = format!("T_{}", i + 1);
            p.position = *position;
            roster.push(p);
        }
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

    fn neutral_needs() -> PositionalNeeds {
        PositionalNeeds::from_team(&balanced_team())
    }

    #[test]
    fn test_base_value_weights() {
        let p = player_with(20.0, 10.0, 5.0);
        assert!((base_value(&p) - (20.0 + 7.0 + 3.5)).abs() < 1e-9);
    }

    #[test]
    fn test_value_monotonic_in_production() {
        // Holding everything else fixed, more production never lowers
        // value while the contextual factors stay non-negative.
        let needs = neutral_needs();
        let mut previous = f64::MIN;
        for ppg in [5.0, 10.0, 15.0, 20.0, 25.0, 30.0] {
            let v = player_value(&player_with(ppg, 5.0, 3.0), &needs);
            assert!(v >= previous, "value decreased at ppg={}", ppg);
            previous = v;
        }

        let low = player_value(&player_with(15.0, 2.0, 3.0), &needs);
        let high = player_value(&player_with(15.0, 9.0, 3.0), &needs);
        assert!(high >= low);

        let low = player_value(&player_with(15.0, 5.0, 1.0), &needs);
        let high = player_value(&player_with(15.0, 5.0, 8.0), &needs);
        assert!(high >= low);
    }

    #[test]
    fn test_positional_need_inflates_value() {
        let mut scarce_team = balanced_team();
        // Remove both centers: C fill ratio drops to 0, need factor 2.0
        scarce_team.roster.retain(|p| p.position != Position::C);
        let scarce = PositionalNeeds::from_team(&scarce_team);

        let mut center = player_with(18.0, 8.0, 2.0);
        center.position = Position::C;

        let neutral_value = player_value(&center, &neutral_needs());
        let scarce_value = player_value(&center, &scarce);
        assert!(scarce_value > neutral_value);
    }

    #[test]
    fn test_age_curve() {
        assert!((age_factor(19) - 0.8).abs() < 1e-9);
        assert!((age_factor(23) - 1.0).abs() < 1e-9);
        assert_eq!(age_factor(26), 1.0);
        assert_eq!(age_factor(29), 1.0);
        assert!((age_factor(30) - 1.0).abs() < 1e-9);
        assert!((age_factor(32) - 0.9).abs() < 1e-9);
        // Unfloored by design: extreme ages can go negative
        assert!(age_factor(55) < 0.0);
    }

    #[test]
    fn test_contract_factor_prefers_short_deals() {
        assert_eq!(contract_factor(1), 1.0);
        assert!((contract_factor(5) - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_efficiency_clamps() {
        // Cheap and productive: clamps at the 1.5 ceiling
        assert_eq!(normalized_efficiency(30.0, 1.0), 1.5);
        // Expensive for the output: clamps at the 0.5 floor
        assert_eq!(normalized_efficiency(10.0, 40.0), 0.5);
        // In-range value passes through
        assert!((normalized_efficiency(30.0, 4.0) - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_zero_salary_uses_raw_base() {
        let mut p = player_with(20.0, 5.0, 5.0);
        p.salary = Decimal::ZERO;
        // base = 27.0, efficiency = 27.0/10 = 2.7 -> clamped to 1.5
        let needs = neutral_needs();
        let v = player_value(&p, &needs);
        let expected = 27.0 * 1.0 * 1.0 * 1.0 * 1.5;
        assert!((v - expected).abs() < 1e-9);
    }
}
