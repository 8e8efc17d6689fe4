//! Deterministic valuation: player worth and trade-fairness scoring.
//!
//! Everything here is pure and synchronous; the qualitative judge layers
//! on top of these numbers, never underneath them.

pub mod needs;
pub mod player_value;
pub mod trade_eval;

pub use needs::{PositionalNeeds, IDEAL_POSITION_COUNT};
pub use player_value::{base_value, player_value};
pub use trade_eval::{evaluate_trade, CapStatus, TradeEvaluation};
