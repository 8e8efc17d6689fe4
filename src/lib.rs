pub mod agent;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod judge;
pub mod league;
pub mod orchestrator;
pub mod persistence;
pub mod stats;
pub mod valuation;

pub use agent::{GmAgent, GmAgentConfig};
pub use config::AppConfig;
pub use domain::{
    DraftPick, Player, Position, StatKey, StatLine, Team, Trade, TradeActor, TradeProposal,
    TradeResponse, TradeStatus,
};
pub use error::{FrontOfficeError, JudgeError, Result};
pub use judge::{
    HttpJudge, JudgeConfig, JudgeDecision, JudgeVerdict, LanguageModelJudge, TradeContext,
};
pub use league::{sample_league, LeagueState};
pub use orchestrator::{
    CycleOutcome, LeagueOrchestrator, OrchestratorConfig, UserDecision,
};
pub use persistence::{JsonFileStore, LeagueStore};
pub use stats::{NullStatsProvider, StatsProvider};
pub use valuation::{evaluate_trade, player_value, PositionalNeeds, TradeEvaluation};
