//! League registry: shared state, lookups, and atomic trade execution.

pub mod sample;
pub mod state;

pub use sample::{sample_draft_picks, sample_league, sample_players};
pub use state::LeagueState;
