//! ReAct strategy — single-pass reason-then-act.
//!
//! One extraction call, the top candidate only, one fetch against each
//! gateway, one synthesized answer. The trace is deliberately flat: no
//! reflection loop, no second pass.

use async_trait::async_trait;
use nimbus_core::model::{QueryResult, Strategy};
use std::sync::Arc;
use tracing::{debug, info};

use crate::strategies::{no_location_result, ReasoningStrategy, StrategyContext};
use crate::synthesis::SynthesisInput;

pub struct ReactStrategy {
    ctx: Arc<StrategyContext>,
}

impl ReactStrategy {
    pub fn new(ctx: Arc<StrategyContext>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl ReasoningStrategy for ReactStrategy {
    fn kind(&self) -> Strategy {
        Strategy::React
    }

    async fn run(&self, query: &str) -> QueryResult {
        let mut warnings = Vec::new();

        // EXTRACT
        let candidates = self.ctx.extractor.extract(query).await;
        let Some(top) = candidates.first() else {
            info!("ReAct: no location identified, short-circuiting to answer");
            return no_location_result(Strategy::React);
        };
        debug!(location = %top.name, confidence = top.confidence, "ReAct: acting on top candidate");

        // FETCH_DATA
        let weather = self.ctx.weather.fetch(&top.name).await;
        let context = self.ctx.context.fetch(&top.name).await;

        if !weather.is_ready() {
            warnings.push(format!("weather data unavailable for {}", top.name));
        }
        if !context.is_ready() {
            warnings.push(format!("location information unavailable for {}", top.name));
        }

        // SYNTHESIZE
        let input = SynthesisInput {
            query,
            location: &top.name,
            strategy: Strategy::React,
            weather: &weather,
            context: &context,
        };
        let answer_text = self.ctx.synthesizer.answer(&input, &mut warnings).await;

        info!(location = %top.name, warnings = warnings.len(), "ReAct completed");

        QueryResult {
            answer_text,
            strategy_used: Strategy::React,
            location_used: top.name.clone(),
            warnings,
        }
    }
}
