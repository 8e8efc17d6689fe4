//! Whole-state snapshot persistence.
//!
//! The league is small enough to snapshot as a single JSON document.
//! Writes go to a temp file first and rename into place so a crash
//! mid-save never leaves a torn snapshot.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::Result;
use crate::league::{sample_league, LeagueState};

/// Snapshot store for the league aggregate
pub trait LeagueStore: Send + Sync {
    /// Persist the full league state
    fn save(&self, state: &LeagueState) -> Result<()>;

    /// Load the full league state. A store with no snapshot yet yields
    /// an empty league, not an error.
    fn load(&self) -> Result<LeagueState>;
}

/// JSON file-backed store
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the snapshot, or generate and persist the sample league when
    /// the store is empty.
    pub fn load_or_generate(&self) -> Result<LeagueState> {
        let state = self.load()?;
        if !state.teams.is_empty() {
            return Ok(state);
        }
        info!(path = %self.path.display(), "no league snapshot found, generating sample league");
        let state = sample_league();
        self.save(&state)?;
        Ok(state)
    }
}

impl LeagueStore for JsonFileStore {
    fn save(&self, state: &LeagueState) -> Result<()> {
        let json = serde_json::to_string_pretty(state)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), trades = state.trades.len(), "league snapshot saved");
        Ok(())
    }

    fn load(&self) -> Result<LeagueState> {
        if !self.path.exists() {
            return Ok(LeagueState::new());
        }
        let raw = fs::read_to_string(&self.path)?;
        let state = serde_json::from_str(&raw)?;
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Trade, TradeActor, TradeStatus};

    #[test]
    fn test_missing_file_loads_empty_league() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("league.json"));
        let state = store.load().unwrap();
        assert!(state.teams.is_empty());
        assert!(state.trades.is_empty());
    }

    #[test]
    fn test_save_load_round_trip_preserves_trades() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("league.json"));

        let mut state = sample_league();
        let mut trade = Trade::new("LAL", "BOS", TradeActor::User);
        trade.team1_players = vec!["LAL_15".to_string()];
        trade.team2_players = vec!["BOS_15".to_string()];
        trade.status = TradeStatus::Rejected;
        state.record_trade(trade.clone());

        store.save(&state).unwrap();
        let restored = store.load().unwrap();

        // Full structural equality, including trade order and the
        // second-precision timestamp.
        assert_eq!(restored, state);
        assert_eq!(restored.trades[0].timestamp, trade.timestamp);
    }

    #[test]
    fn test_load_or_generate_creates_sample_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("league.json"));

        let first = store.load_or_generate().unwrap();
        assert_eq!(first.teams.len(), 30);

        // Second call reads the snapshot rather than regenerating
        let second = store.load_or_generate().unwrap();
        assert_eq!(second, first);
    }
}
