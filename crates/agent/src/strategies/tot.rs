//! Tree-of-Thoughts strategy — exploratory fan-out over all candidates.
//!
//! Every extracted candidate (up to a configurable cap) gets its own
//! weather and context lookup. The fetches are independent: they run
//! concurrently, one candidate's failure never aborts the others, and the
//! results are joined back in candidate order so selection stays
//! deterministic.
//!
//! Selection policy: the highest-confidence candidate whose weather
//! lookup produced data; if none did, the highest-confidence candidate
//! overall, with a warning. Other candidates above the alternative
//! threshold are mentioned in the answer so the user can redirect.

use async_trait::async_trait;
use futures::future::join_all;
use nimbus_core::model::{Fetch, LocationContext, QueryResult, Strategy, WeatherReading};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::strategies::{no_location_result, ReasoningStrategy, StrategyContext};
use crate::synthesis::SynthesisInput;

pub struct TotStrategy {
    ctx: Arc<StrategyContext>,
}

impl TotStrategy {
    pub fn new(ctx: Arc<StrategyContext>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl ReasoningStrategy for TotStrategy {
    fn kind(&self) -> Strategy {
        Strategy::Tot
    }

    async fn run(&self, query: &str) -> QueryResult {
        let mut warnings = Vec::new();

        // EXTRACT
        let mut candidates = self.ctx.extractor.extract(query).await;
        if candidates.is_empty() {
            info!("ToT: no location identified, short-circuiting to answer");
            return no_location_result(Strategy::Tot);
        }

        if candidates.len() > self.ctx.candidate_cap {
            let discarded = candidates.len() - self.ctx.candidate_cap;
            warn!(discarded, cap = self.ctx.candidate_cap, "ToT: discarding low-confidence candidates");
            warnings.push(format!(
                "discarded {discarded} low-confidence candidate(s) beyond the cap of {}",
                self.ctx.candidate_cap
            ));
            candidates.truncate(self.ctx.candidate_cap);
        }

        // FETCH_DATA — isolated-failure fan-out, joined in candidate order.
        let fetches = candidates.iter().map(|candidate| {
            let weather = Arc::clone(&self.ctx.weather);
            let context = Arc::clone(&self.ctx.context);
            let name = candidate.name.clone();
            async move {
                let reading = weather.fetch(&name).await;
                let info = context.fetch(&name).await;
                (reading, info)
            }
        });
        let results: Vec<(Fetch<WeatherReading>, Fetch<LocationContext>)> =
            join_all(fetches).await;

        // Candidates are already ordered by descending confidence, so the
        // first one with usable weather data is the selection.
        let selected = match results.iter().position(|(w, _)| w.is_ready()) {
            Some(i) => i,
            None => {
                warnings.push(
                    "no candidate had usable weather data; answering for the most likely \
                     location anyway"
                        .into(),
                );
                0
            }
        };

        let location = &candidates[selected].name;
        let (weather, context) = &results[selected];
        debug!(
            location = %location,
            confidence = candidates[selected].confidence,
            explored = candidates.len(),
            "ToT: candidate selected"
        );

        if !context.is_ready() {
            warnings.push(format!("location information unavailable for {location}"));
        }

        // SYNTHESIZE
        let input = SynthesisInput {
            query,
            location,
            strategy: Strategy::Tot,
            weather,
            context,
        };
        let mut answer_text = self.ctx.synthesizer.answer(&input, &mut warnings).await;

        // Alternatives are appended deterministically rather than left to
        // the synthesis prompt, so they survive completion failures too.
        let alternatives: Vec<&str> = candidates
            .iter()
            .enumerate()
            .filter(|(i, c)| *i != selected && c.confidence >= self.ctx.alternative_threshold)
            .map(|(_, c)| c.name.as_str())
            .collect();
        if !alternatives.is_empty() {
            answer_text.push_str(&format!(
                "\n\nYou might also have meant {}.",
                alternatives.join(" or ")
            ));
        }

        info!(location = %location, warnings = warnings.len(), "ToT completed");

        QueryResult {
            answer_text,
            strategy_used: Strategy::Tot,
            location_used: location.clone(),
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
    use nimbus_core::gateway::WeatherGateway;
    use nimbus_core::model::UNKNOWN_LOCATION;

    fn make_ctx(
        completion: Arc<ScriptedCompletion>,
        weather: Arc<StaticWeatherGateway>,
        context: Arc<StaticContextGateway>,
        cap: usize,
    ) -> Arc<StrategyContext> {
        let completion: Arc<dyn CompletionService> = completion;
        Arc::new(StrategyContext {
            extractor: LocationExtractor::new(completion.clone(), "mock-model"),
            synthesizer: Synthesizer::new(completion, "mock-model"),
            weather,
            context,
            candidate_cap: cap,
            alternative_threshold: 0.3,
        })
    }

    #[tokio::test]
    async fn prefers_the_candidate_with_usable_weather() {
        // Paris, France outranks Paris, Texas but has no weather data;
        // the answer goes to Texas with France offered as an alternative.
        let completion = Arc::new(ScriptedCompletion::texts(&[
            &candidates_json(&[("Paris, France", 0.6), ("Paris, Texas", 0.55)]),
            "Clear skies in Paris, Texas.",
        ]));
        let weather = Arc::new(StaticWeatherGateway::new(vec![(
            "Paris, Texas",
            make_reading(28.0),
        )]));
        let context = Arc::new(StaticContextGateway::new(vec![
            ("Paris, France", make_context("Paris, France")),
            ("Paris, Texas", make_context("Paris, Texas")),
        ]));

        let strategy = TotStrategy::new(make_ctx(completion, weather, context, 5));
        let result = strategy.run("Weather in Paris or Paris, Texas?").await;

        assert_eq!(result.location_used, "Paris, Texas");
        assert!(result.answer_text.contains("Paris, France"));
        assert!(result.answer_text.contains("might also have meant"));
    }

    #[tokio::test]
    async fn falls_back_to_top_candidate_when_no_weather_anywhere() {
        let completion = Arc::new(ScriptedCompletion::texts(&[&candidates_json(&[
            ("Springfield, Illinois", 0.5),
            ("Springfield, Missouri", 0.45),
        ])]));
        let weather = Arc::new(StaticWeatherGateway::empty());
        let context = Arc::new(StaticContextGateway::empty());

        let strategy = TotStrategy::new(make_ctx(completion, weather, context, 5));
        let result = strategy.run("weather in Springfield").await;

        assert_eq!(result.location_used, "Springfield, Illinois");
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("no candidate had usable weather data")));
    }

    #[tokio::test]
    async fn caps_candidates_and_warns_about_discards() {
        let pairs: Vec<(String, f64)> = (0..7)
            .map(|i| (format!("City{i}"), 0.9 - (i as f64) * 0.1))
            .collect();
        let pair_refs: Vec<(&str, f64)> =
            pairs.iter().map(|(n, c)| (n.as_str(), *c)).collect();

        let completion =
            Arc::new(ScriptedCompletion::texts(&[&candidates_json(&pair_refs)]));
        let weather = Arc::new(StaticWeatherGateway::empty());
        let context = Arc::new(StaticContextGateway::empty());

        let strategy =
            TotStrategy::new(make_ctx(completion, weather.clone(), context.clone(), 5));
        let result = strategy.run("where could it be").await;

        // Only the capped five candidates were explored.
        assert_eq!(weather.calls().len(), 5);
        assert_eq!(context.calls().len(), 5);
        assert!(result.warnings.iter().any(|w| w.contains("discarded 2")));
    }

    #[tokio::test]
    async fn location_used_always_comes_from_the_candidate_set() {
        let completion = Arc::new(ScriptedCompletion::texts(&[&candidates_json(&[
            ("Lagos", 0.7),
            ("Cairo", 0.6),
        ])]));
        let weather = Arc::new(StaticWeatherGateway::new(vec![("Cairo", make_reading(35.0))]));
        let context = Arc::new(StaticContextGateway::empty());

        let strategy = TotStrategy::new(make_ctx(completion, weather, context, 5));
        let result = strategy.run("weather in Lagos or Cairo").await;

        assert!(["Lagos", "Cairo"].contains(&result.location_used.as_str()));
    }

    #[tokio::test]
    async fn alternatives_below_threshold_are_not_mentioned() {
        let completion = Arc::new(ScriptedCompletion::texts(&[
            &candidates_json(&[("Rome, Italy", 0.8), ("Rome, Georgia", 0.2)]),
            "Warm in Rome.",
        ]));
        let weather =
            Arc::new(StaticWeatherGateway::new(vec![("Rome, Italy", make_reading(25.0))]));
        let context = Arc::new(StaticContextGateway::empty());

        let strategy = TotStrategy::new(make_ctx(completion, weather, context, 5));
        let result = strategy.run("weather in Rome").await;

        assert_eq!(result.location_used, "Rome, Italy");
        assert!(!result.answer_text.contains("Rome, Georgia"));
    }

    #[tokio::test]
    async fn empty_extraction_short_circuits() {
        let completion = Arc::new(ScriptedCompletion::texts(&[r#"{"candidates": []}"#]));
        let weather = Arc::new(StaticWeatherGateway::empty());
        let context = Arc::new(StaticContextGateway::empty());

        let strategy =
            TotStrategy::new(make_ctx(completion, weather.clone(), context, 5));
        let result = strategy.run("weather somewhere").await;

        assert_eq!(result.location_used, UNKNOWN_LOCATION);
        assert!(weather.calls().is_empty());
    }

    #[tokio::test]
    async fn static_gateways_are_idempotent_on_failure() {
        let weather = StaticWeatherGateway::empty();
        assert_eq!(weather.fetch("Nowhere").await, Fetch::Unavailable);
        assert_eq!(weather.fetch("Nowhere").await, Fetch::Unavailable);
    }
}
