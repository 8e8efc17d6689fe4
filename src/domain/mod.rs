//! Entity model: players, teams, draft picks, and trades.
//!
//! Pure data with a few derived computations (salary totals, cap status).
//! All roster mutation goes through `league::LeagueState::execute_trade`.

pub mod player;
pub mod team;
pub mod trade;

pub use player::{Player, Position, StatKey, StatLine};
pub use team::{DraftPick, Team, DEFAULT_LUXURY_TAX, DEFAULT_SALARY_CAP};
pub use trade::{Trade, TradeActor, TradeProposal, TradeResponse, TradeStatus};
