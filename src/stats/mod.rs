//! External NBA statistics lookup capability.
//!
//! Pure query tools surfaced to the language-model judge through its
//! tool-use loop. Deterministic valuation never touches this module.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{FrontOfficeError, Result};

/// Basic information about a looked-up player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: String,
    pub name: String,
    pub team: Option<String>,
    pub active: bool,
}

/// Basic information about a looked-up team
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamRecord {
    pub id: String,
    pub name: String,
    pub abbreviation: String,
}

/// One season of per-game production
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CareerSeason {
    pub season: String,
    pub ppg: f64,
    pub rpg: f64,
    pub apg: f64,
}

/// External statistics service consulted by the judge's tools.
///
/// Implementations wrap whatever upstream source is available; the core
/// only depends on this trait.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatsProvider: Send + Sync {
    /// Find a player by full name
    async fn lookup_player(&self, name: &str) -> Result<PlayerRecord>;

    /// Find a team by name or abbreviation
    async fn lookup_team(&self, name: &str) -> Result<TeamRecord>;

    /// Career per-game stats for a player id
    async fn lookup_career_stats(&self, player_id: &str) -> Result<Vec<CareerSeason>>;
}

/// Provider used when no stats backend is configured. Every lookup
/// fails with a typed error, which the judge reports back to the model
/// as an unavailable tool result.
#[derive(Debug, Clone, Default)]
pub struct NullStatsProvider;

#[async_trait]
impl StatsProvider for NullStatsProvider {
    async fn lookup_player(&self, name: &str) -> Result<PlayerRecord> {
        Err(FrontOfficeError::StatsLookup(format!(
            "no stats backend configured (lookup_player {})",
            name
        )))
    }

    async fn lookup_team(&self, name: &str) -> Result<TeamRecord> {
        Err(FrontOfficeError::StatsLookup(format!(
            "no stats backend configured (lookup_team {})",
            name
        )))
    }

    async fn lookup_career_stats(&self, player_id: &str) -> Result<Vec<CareerSeason>> {
        Err(FrontOfficeError::StatsLookup(format!(
            "no stats backend configured (lookup_career_stats {})",
            player_id
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_null_provider_fails_typed() {
        let provider = NullStatsProvider;
        let err = provider.lookup_player("LeBron James").await.unwrap_err();
        assert!(matches!(err, FrontOfficeError::StatsLookup(_)));
    }
}
