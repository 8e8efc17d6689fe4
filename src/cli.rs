//! Command-line interface: argument definitions and console reporting
//! for the simulation binary.

use clap::{Parser, Subcommand};

use crate::error::Result;
use crate::league::sample_league;
use crate::orchestrator::{CycleOutcome, LeagueOrchestrator};
use crate::persistence::{JsonFileStore, LeagueStore};

#[derive(Parser)]
#[command(name = "frontoffice", about = "Simulated NBA front-office trade sandbox")]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a fresh sample league snapshot
    Init {
        /// Overwrite an existing snapshot
        #[arg(long)]
        force: bool,
    },
    /// List all teams
    Teams,
    /// Show a team's roster and payroll
    Roster {
        /// Team abbreviation, e.g. LAL
        team: String,
    },
    /// Show recent league activity
    Activity {
        /// Maximum entries to show
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Run simulation cycles with a designated user team
    Simulate {
        /// The human-controlled team (never initiates trades)
        #[arg(long)]
        team: String,
        /// Number of cycles to run
        #[arg(long, default_value_t = 1)]
        cycles: u32,
        /// Seed for reproducible runs (overrides configuration)
        #[arg(long)]
        seed: Option<u64>,
    },
}

/// Write the sample league to the snapshot path
pub fn init_league(store: &JsonFileStore, force: bool) -> Result<()> {
    if store.path().exists() && !force {
        println!(
            "Snapshot {} already exists; use --force to overwrite",
            store.path().display()
        );
        return Ok(());
    }
    let league = sample_league();
    store.save(&league)?;
    println!(
        "Wrote sample league ({} teams) to {}",
        league.teams.len(),
        store.path().display()
    );
    Ok(())
}

pub async fn show_teams(orchestrator: &LeagueOrchestrator) {
    for team in orchestrator.list_teams().await {
        println!(
            "{:4} {:24} {:5} {}",
            team.abbreviation,
            format!("{} {}", team.city, team.name),
            team.conference,
            team.division
        );
    }
}

pub async fn show_roster(orchestrator: &LeagueOrchestrator, team: &str) -> Result<()> {
    let summary = orchestrator.get_team_roster(team).await?;
    println!(
        "{} ({}) — total ${}M, cap ${}M, tax ${}M{}",
        format!("{} {}", summary.team.city, summary.team.name),
        summary.team.abbreviation,
        summary.salary_info.total / rust_decimal_macros::dec!(1_000_000),
        summary.salary_info.cap / rust_decimal_macros::dec!(1_000_000),
        summary.salary_info.luxury_tax / rust_decimal_macros::dec!(1_000_000),
        if summary.salary_info.over_tax {
            " [over tax]"
        } else if summary.salary_info.over_cap {
            " [over cap]"
        } else {
            ""
        }
    );
    for player in &summary.players {
        println!(
            "  {:24} {:3} age {:2}  ${:>5.1}M x{}y",
            player.name,
            player.position.as_str(),
            player.age,
            player.salary_millions(),
            player.contract_years
        );
    }
    Ok(())
}

pub async fn show_activity(orchestrator: &LeagueOrchestrator, limit: usize) {
    let activity = orchestrator.get_league_activity(limit).await;
    if activity.is_empty() {
        println!("No league activity yet.");
        return;
    }
    for entry in activity {
        println!(
            "[{}] {:9} {} ({}) <-> {} ({})  proposed by {}",
            entry.timestamp,
            entry.status.as_str(),
            entry.team1.abbr,
            entry.team1.players.join(", "),
            entry.team2.abbr,
            entry.team2.players.join(", "),
            entry.proposed_by
        );
    }
}

/// Print one cycle's outcomes in proposal order
pub fn report_outcomes(cycle: u32, outcomes: &[CycleOutcome]) {
    println!("Cycle {}: {} negotiation(s)", cycle, outcomes.len());
    for outcome in outcomes {
        let trade = &outcome.proposal.trade;
        println!(
            "  {} -> {}: {} ({} for {})",
            trade.team1,
            trade.team2,
            outcome.response.status.as_str(),
            trade.team1_players.len(),
            trade.team2_players.len()
        );
    }
}
