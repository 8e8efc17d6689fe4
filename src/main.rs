use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use frontoffice::cli::{self, Cli, Commands};
use frontoffice::config::AppConfig;
use frontoffice::error::Result;
use frontoffice::judge::HttpJudge;
use frontoffice::orchestrator::LeagueOrchestrator;
use frontoffice::persistence::JsonFileStore;
use frontoffice::stats::NullStatsProvider;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;
    init_logging(&config.logging.filter);

    let store = JsonFileStore::new(&config.league.state_path);

    match cli.command {
        Commands::Init { force } => {
            cli::init_league(&store, force)?;
        }
        Commands::Teams => {
            let orchestrator = build_orchestrator(&config, &store, None)?;
            cli::show_teams(&orchestrator).await;
        }
        Commands::Roster { team } => {
            let orchestrator = build_orchestrator(&config, &store, None)?;
            cli::show_roster(&orchestrator, &team).await?;
        }
        Commands::Activity { limit } => {
            let orchestrator = build_orchestrator(&config, &store, None)?;
            cli::show_activity(&orchestrator, limit).await;
        }
        Commands::Simulate { team, cycles, seed } => {
            let mut orchestrator = build_orchestrator(&config, &store, seed)?;
            orchestrator.select_user_team(&team)?;
            for cycle in 1..=cycles {
                let outcomes = orchestrator.run_cycle().await?;
                cli::report_outcomes(cycle, &outcomes);
            }
            cli::show_activity(&orchestrator, 10).await;
        }
    }

    Ok(())
}

fn build_orchestrator(
    config: &AppConfig,
    store: &JsonFileStore,
    seed_override: Option<u64>,
) -> Result<LeagueOrchestrator> {
    let state = store.load_or_generate()?;

    let mut orchestrator_config = config.orchestrator_config();
    if seed_override.is_some() {
        orchestrator_config.seed = seed_override;
    }

    let mut orchestrator = LeagueOrchestrator::new(state, orchestrator_config)
        .with_store(Arc::new(store.clone()));

    let judge_config = config.judge_config();
    if judge_config.is_configured() {
        info!(model = %judge_config.model, "language-model judge enabled");
        let judge = HttpJudge::new(judge_config, Arc::new(NullStatsProvider))?;
        orchestrator = orchestrator.with_judge(Arc::new(judge));
    } else {
        info!("no judge configured, agents use deterministic evaluation only");
    }

    Ok(orchestrator)
}

fn init_logging(filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter.to_string()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
