//! Qualitative trade judgment via a language model.
//!
//! The judge sits on top of the deterministic valuation engine: it gets
//! the full trade context, may look up external stats through a bounded
//! tool-use loop, and returns a structured accept/reject/counter
//! decision. Every failure mode (unreachable service, timeout,
//! unparsable output) degrades to the deterministic evaluator in the
//! calling agent — a judge problem is never a hard failure.

pub mod http;
pub mod protocol;

use async_trait::async_trait;

use crate::error::JudgeError;

pub use http::{HttpJudge, JudgeConfig};
pub use protocol::{JudgeDecision, JudgeVerdict, PlayerSummary, SalarySituation, TradeContext};

/// Qualitative decision-maker consulted for trade responses
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LanguageModelJudge: Send + Sync {
    /// Evaluate a trade from the context's perspective and return a
    /// structured decision. Implementations may run tool lookups before
    /// answering but must return a typed error rather than guessing.
    async fn evaluate(&self, context: &TradeContext) -> Result<JudgeDecision, JudgeError>;
}
