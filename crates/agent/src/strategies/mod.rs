//! Reasoning strategies — a closed set of three orchestrators sharing one
//! interface.
//!
//! 1. **ReAct** — single-pass reason-then-act on the top candidate
//! 2. **CoT** — same data flow, visible step-by-step justification
//! 3. **ToT** — exploratory fan-out over all candidates with selection
//!
//! Every strategy recovers extraction failures, missing candidates, and
//! unavailable data locally; the `QueryResult` it returns always carries a
//! coherent answer plus the warnings accumulated along the way.

pub mod cot;
pub mod react;
pub mod tot;

pub use cot::CotStrategy;
pub use react::ReactStrategy;
pub use tot::TotStrategy;

#[cfg(test)]
pub(crate) mod test_helpers;

use crate::extractor::LocationExtractor;
use crate::synthesis::Synthesizer;
use async_trait::async_trait;
use nimbus_core::gateway::{ContextGateway, WeatherGateway};
use nimbus_core::model::{QueryResult, Strategy, UNKNOWN_LOCATION};
use std::sync::Arc;

/// The shared capability set every strategy draws on.
pub struct StrategyContext {
    pub extractor: LocationExtractor,
    pub synthesizer: Synthesizer,
    pub weather: Arc<dyn WeatherGateway>,
    pub context: Arc<dyn ContextGateway>,
    /// Most candidates the exploratory strategy will consider.
    pub candidate_cap: usize,
    /// Candidates at or above this confidence are offered as alternatives.
    pub alternative_threshold: f64,
}

/// One reasoning strategy: query in, `QueryResult` out.
#[async_trait]
pub trait ReasoningStrategy: Send + Sync {
    fn kind(&self) -> Strategy;

    async fn run(&self, query: &str) -> QueryResult;
}

/// The short-circuit result taken when extraction yields zero usable
/// candidates. No gateway is contacted on this path.
pub(crate) fn no_location_result(strategy: Strategy) -> QueryResult {
    let answer = match strategy {
        Strategy::React => {
            "I couldn't identify a location in your query. Please specify a city or place."
        }
        Strategy::Cot => {
            "After thinking it through step by step, I couldn't identify a location in your \
             query. Please specify a city or place."
        }
        Strategy::Tot => {
            "After exploring multiple possibilities, I couldn't determine a location from \
             your query. Please specify a city or place."
        }
    };

    QueryResult {
        answer_text: answer.to_string(),
        strategy_used: strategy,
        location_used: UNKNOWN_LOCATION.to_string(),
        warnings: vec!["location extraction produced no candidates".into()],
    }
}
