//! The agent facade — the one entry point callers use.
//!
//! [`WeatherAgent`] wires the extractor, synthesizer, and gateways into a
//! [`StrategyContext`] once at construction, then dispatches each query to
//! the requested strategy. Environmental failures never escape a query:
//! the only hard error `process_query` returns is an unrecognized strategy
//! name, which is a misuse of the call contract rather than bad weather.

use nimbus_config::Settings;
use nimbus_core::completion::CompletionService;
use nimbus_core::error::{Error, Result};
use nimbus_core::gateway::{ContextGateway, WeatherGateway};
use nimbus_core::model::{QueryResult, Strategy};
use nimbus_gateways::weather::OpenWeatherGateway;
use nimbus_gateways::wiki::WikipediaGateway;
use nimbus_providers::openai_compat::OpenAiCompatCompletion;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::extractor::LocationExtractor;
use crate::strategies::{
    CotStrategy, ReactStrategy, ReasoningStrategy, StrategyContext, TotStrategy,
};
use crate::synthesis::Synthesizer;

/// The natural-language weather agent.
pub struct WeatherAgent {
    react: ReactStrategy,
    cot: CotStrategy,
    tot: TotStrategy,
}

impl std::fmt::Debug for WeatherAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherAgent").finish_non_exhaustive()
    }
}

impl WeatherAgent {
    /// Assemble an agent from its collaborators.
    ///
    /// Injectable for tests; production callers usually go through
    /// [`WeatherAgent::from_settings`].
    pub fn new(
        completion: Arc<dyn CompletionService>,
        weather: Arc<dyn WeatherGateway>,
        context: Arc<dyn ContextGateway>,
        model: impl Into<String>,
        candidate_cap: usize,
        alternative_threshold: f64,
    ) -> Self {
        let model = model.into();
        let ctx = Arc::new(StrategyContext {
            extractor: LocationExtractor::new(completion.clone(), &model),
            synthesizer: Synthesizer::new(completion, &model),
            weather,
            context,
            candidate_cap,
            alternative_threshold,
        });

        Self {
            react: ReactStrategy::new(ctx.clone()),
            cot: CotStrategy::new(ctx.clone()),
            tot: TotStrategy::new(ctx),
        }
    }

    /// Build an agent from loaded settings, constructing the real HTTP
    /// providers. Fails fast when a required credential is missing.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let completion_key =
            settings
                .completion
                .api_key
                .clone()
                .ok_or_else(|| Error::Config {
                    message: "completion API key is not set (NIMBUS_COMPLETION_API_KEY or \
                              OPENAI_API_KEY)"
                        .into(),
                })?;
        let weather_key = settings
            .weather
            .api_key
            .clone()
            .ok_or_else(|| Error::Config {
                message: "weather API key is not set (NIMBUS_WEATHER_API_KEY or \
                          OPENWEATHER_API_KEY)"
                    .into(),
            })?;

        let timeout = Duration::from_secs(settings.agent.http_timeout_secs);

        let completion = OpenAiCompatCompletion::new(
            "openai",
            &settings.completion.base_url,
            completion_key,
            timeout,
        )?;
        let weather =
            OpenWeatherGateway::new(&settings.weather.base_url, weather_key, timeout)?;
        let context = WikipediaGateway::new(&settings.wiki.base_url, timeout)?;

        Ok(Self::new(
            Arc::new(completion),
            Arc::new(weather),
            Arc::new(context),
            settings.completion.model.clone(),
            settings.agent.candidate_cap,
            settings.agent.alternative_threshold,
        ))
    }

    /// Run one query under an already-parsed strategy. Infallible: every
    /// environmental failure is folded into the result's warnings.
    pub async fn run_query(&self, query: &str, strategy: Strategy) -> QueryResult {
        info!(strategy = %strategy, "processing query");
        match strategy {
            Strategy::React => self.react.run(query).await,
            Strategy::Cot => self.cot.run(query).await,
            Strategy::Tot => self.tot.run(query).await,
        }
    }

    /// Run one query with a strategy given by name, returning the answer
    /// text. The only error is an unrecognized strategy name.
    pub async fn process_query(&self, query: &str, strategy: &str) -> Result<String> {
        let strategy: Strategy = strategy.parse()?;
        Ok(self.run_query(query, strategy).await.answer_text)
    }
}
