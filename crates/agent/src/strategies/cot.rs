//! Chain-of-Thought strategy.
//!
//! Identical data flow to ReAct — top candidate, one fetch per gateway —
//! but the synthesis prompt demands a visible step-by-step justification:
//! how the location was identified, how the data reads, then the final
//! statement.

use async_trait::async_trait;
use nimbus_core::model::{QueryResult, Strategy};
use std::sync::Arc;
use tracing::{debug, info};

use crate::strategies::{no_location_result, ReasoningStrategy, StrategyContext};
use crate::synthesis::SynthesisInput;

pub struct CotStrategy {
    ctx: Arc<StrategyContext>,
}

impl CotStrategy {
    pub fn new(ctx: Arc<StrategyContext>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl ReasoningStrategy for CotStrategy {
    fn kind(&self) -> Strategy {
        Strategy::Cot
    }

    async fn run(&self, query: &str) -> QueryResult {
        let mut warnings = Vec::new();

        let candidates = self.ctx.extractor.extract(query).await;
        let Some(top) = candidates.first() else {
            info!("CoT: no location identified, short-circuiting to answer");
            return no_location_result(Strategy::Cot);
        };
        debug!(location = %top.name, confidence = top.confidence, "CoT: reasoning over top candidate");

        let weather = self.ctx.weather.fetch(&top.name).await;
        let context = self.ctx.context.fetch(&top.name).await;

        if !weather.is_ready() {
            warnings.push(format!("weather data unavailable for {}", top.name));
        }
        if !context.is_ready() {
            warnings.push(format!("location information unavailable for {}", top.name));
        }

        let input = SynthesisInput {
            query,
            location: &top.name,
            strategy: Strategy::Cot,
            weather: &weather,
            context: &context,
        };
        let answer_text = self.ctx.synthesizer.answer(&input, &mut warnings).await;

        info!(location = %top.name, warnings = warnings.len(), "CoT completed");

        QueryResult {
            answer_text,
            strategy_used: Strategy::Cot,
            location_used: top.name.clone(),
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::LocationExtractor;
    use crate::strategies::test_helpers::*;
    use crate::synthesis::Synthesizer;
    use nimbus_core::completion::CompletionService;
    use nimbus_core::model::UNKNOWN_LOCATION;

    fn make_ctx(
        completion: Arc<ScriptedCompletion>,
        weather: Arc<StaticWeatherGateway>,
        context: Arc<StaticContextGateway>,
    ) -> Arc<StrategyContext> {
        let completion: Arc<dyn CompletionService> = completion;
        Arc::new(StrategyContext {
            extractor: LocationExtractor::new(completion.clone(), "mock-model"),
            synthesizer: Synthesizer::new(completion, "mock-model"),
            weather,
            context,
            candidate_cap: 5,
            alternative_threshold: 0.3,
        })
    }

    #[tokio::test]
    async fn selects_exactly_the_top_candidate() {
        let completion = Arc::new(ScriptedCompletion::texts(&[
            &candidates_json(&[("Tokyo", 0.95), ("Kyoto", 0.5)]),
            "Step 1: the query names Tokyo. Step 2: it is mild. Final: 18C in Tokyo.",
        ]));
        let weather = Arc::new(StaticWeatherGateway::new(vec![("Tokyo", make_reading(18.0))]));
        let context =
            Arc::new(StaticContextGateway::new(vec![("Tokyo", make_context("Tokyo"))]));

        let strategy = CotStrategy::new(make_ctx(completion, weather.clone(), context));
        let result = strategy.run("how is the weather in Tokyo?").await;

        assert_eq!(result.location_used, "Tokyo");
        assert_eq!(result.strategy_used, Strategy::Cot);
        assert!(result.answer_text.contains("Step 1"));
        assert_eq!(weather.calls(), vec!["Tokyo"]);
    }

    #[tokio::test]
    async fn empty_extraction_short_circuits() {
        let completion = Arc::new(ScriptedCompletion::texts(&[r#"{"candidates": []}"#]));
        let weather = Arc::new(StaticWeatherGateway::empty());
        let context = Arc::new(StaticContextGateway::empty());

        let strategy = CotStrategy::new(make_ctx(completion, weather.clone(), context.clone()));
        let result = strategy.run("weather please").await;

        assert_eq!(result.location_used, UNKNOWN_LOCATION);
        assert!(result.answer_text.contains("step by step"));
        assert!(weather.calls().is_empty());
        assert!(context.calls().is_empty());
    }
}
