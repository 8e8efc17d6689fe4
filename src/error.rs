use thiserror::Error;

/// Main error type for the front-office sandbox
#[derive(Error, Debug)]
pub enum FrontOfficeError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    // Serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // League registry errors
    #[error("Unknown team: {0}")]
    UnknownTeam(String),

    #[error("Unknown player: {0}")]
    UnknownPlayer(String),

    #[error("Trade not found: {0}")]
    TradeNotFound(String),

    #[error("No user team selected")]
    NoUserTeam,

    // Trade validation errors
    #[error("Invalid trade: {0}")]
    InvalidTrade(String),

    #[error("Player {player_id} is not on the {team} roster")]
    PlayerNotOnRoster { player_id: String, team: String },

    #[error("Draft pick exchange is not supported in trade {trade_id}")]
    PickExchangeUnsupported { trade_id: String },

    #[error("Trade {trade_id} has already been executed")]
    AlreadyExecuted { trade_id: String },

    // Judge errors
    #[error("Judge error: {0}")]
    Judge(#[from] JudgeError),

    // Stats provider errors
    #[error("Stats lookup failed: {0}")]
    StatsLookup(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Generic errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias for FrontOfficeError
pub type Result<T> = std::result::Result<T, FrontOfficeError>;

/// Specific error types for the language-model judge
#[derive(Error, Debug, Clone)]
pub enum JudgeError {
    #[error("Judge is not configured (missing API key)")]
    NotConfigured,

    #[error("Judge request failed: {0}")]
    Http(String),

    #[error("Judge response timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },

    #[error("Unparsable judge response: {0}")]
    Unparsable(String),

    #[error("Judge tool call failed: {tool} - {reason}")]
    ToolCall { tool: String, reason: String },
}
