use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::agent::GmAgentConfig;
use crate::error::Result;
use crate::judge::JudgeConfig;
use crate::orchestrator::OrchestratorConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub league: LeagueConfig,
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub judge: JudgeSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueConfig {
    /// Snapshot file for the league state
    #[serde(default = "default_state_path")]
    pub state_path: String,
}

fn default_state_path() -> String {
    "league_state.json".to_string()
}

impl Default for LeagueConfig {
    fn default() -> Self {
        Self {
            state_path: default_state_path(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    /// Seconds between an agent's trade-initiation checks
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: i64,
    /// Wall-clock budget for one judge call, in seconds
    #[serde(default = "default_judge_timeout_secs")]
    pub judge_timeout_secs: u64,
    /// Master seed for reproducible simulations
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_cooldown_secs() -> i64 {
    30
}

fn default_judge_timeout_secs() -> u64 {
    45
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            cooldown_secs: default_cooldown_secs(),
            judge_timeout_secs: default_judge_timeout_secs(),
            seed: None,
        }
    }
}

/// Judge connection settings. The API key can also come from
/// `JUDGE_API_KEY`; a missing key disables the judge entirely and the
/// agents run on the deterministic evaluator alone.
#[derive(Debug, Clone, Deserialize)]
pub struct JudgeSettings {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_judge_base_url")]
    pub base_url: String,
    #[serde(default = "default_judge_model")]
    pub model: String,
    #[serde(default = "default_judge_request_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_tool_rounds")]
    pub max_tool_rounds: u8,
}

fn default_judge_base_url() -> String {
    "https://api.x.ai/v1".to_string()
}

fn default_judge_model() -> String {
    "grok-4-1-fast-reasoning".to_string()
}

fn default_judge_request_timeout_secs() -> u64 {
    30
}

fn default_max_tool_rounds() -> u8 {
    4
}

impl Default for JudgeSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_judge_base_url(),
            model: default_judge_model(),
            timeout_secs: default_judge_request_timeout_secs(),
            max_tool_rounds: default_max_tool_rounds(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Tracing filter, e.g. "info" or "frontoffice=debug"
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl AppConfig {
    /// Load configuration from an optional TOML file plus
    /// `FRONTOFFICE__*` environment overrides.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(Path::new(path)));
        } else if Path::new("frontoffice.toml").exists() {
            builder = builder.add_source(File::with_name("frontoffice"));
        }
        let settings = builder
            .add_source(Environment::with_prefix("FRONTOFFICE").separator("__"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Per-agent settings derived from this configuration
    pub fn gm_agent_config(&self) -> GmAgentConfig {
        GmAgentConfig {
            cooldown_secs: self.agent.cooldown_secs,
            judge_timeout: Duration::from_secs(self.agent.judge_timeout_secs),
        }
    }

    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            agent: self.gm_agent_config(),
            seed: self.agent.seed,
        }
    }

    /// Judge client settings; environment variables fill any blanks
    pub fn judge_config(&self) -> JudgeConfig {
        let env = JudgeConfig::from_env();
        JudgeConfig {
            api_key: if self.judge.api_key.is_empty() {
                env.api_key
            } else {
                self.judge.api_key.clone()
            },
            base_url: self.judge.base_url.clone(),
            model: self.judge.model.clone(),
            timeout_secs: self.judge.timeout_secs,
            max_tool_rounds: self.judge.max_tool_rounds,
        }
    }
}
