//! Shared test helpers for strategy tests.

use async_trait::async_trait;
use nimbus_core::completion::{CompletionRequest, CompletionResponse, CompletionService, Usage};
use nimbus_core::error::CompletionError;
use nimbus_core::gateway::{ContextGateway, WeatherGateway};
use nimbus_core::model::{Fetch, LocationContext, WeatherReading};
use std::collections::HashMap;
use std::sync::Mutex;

/// A completion double that returns a sequence of scripted outcomes.
///
/// Each call to `complete` returns the next outcome in the queue; once the
/// queue is exhausted, further calls fail with a network error (so a test
/// never hangs on a missing script entry). Deterministic: the same script
/// always produces the same sequence.
pub struct ScriptedCompletion {
    outcomes: Mutex<Vec<Result<CompletionResponse, CompletionError>>>,
    calls: Mutex<usize>,
}

impl ScriptedCompletion {
    pub fn new(outcomes: Vec<Result<CompletionResponse, CompletionError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes),
            calls: Mutex::new(0),
        }
    }

    /// Script a sequence of plain text responses.
    pub fn texts(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| Ok(make_response(t))).collect())
    }

    /// A double whose every call fails with a network error.
    pub fn failing() -> Self {
        Self::new(Vec::new())
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl CompletionService for ScriptedCompletion {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(
        &self,
        _request: CompletionRequest,
    ) -> Result<CompletionResponse, CompletionError> {
        let mut calls = self.calls.lock().unwrap();
        let mut outcomes = self.outcomes.lock().unwrap();
        *calls += 1;

        if outcomes.is_empty() {
            return Err(CompletionError::Network("scripted failure".into()));
        }
        outcomes.remove(0)
    }
}

/// Create a plain text completion response.
pub fn make_response(text: &str) -> CompletionResponse {
    CompletionResponse {
        text: text.to_string(),
        model: "mock-model".into(),
        usage: Some(Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        }),
    }
}

/// Script entry for an extraction call returning structured candidates.
pub fn candidates_json(pairs: &[(&str, f64)]) -> String {
    let items: Vec<String> = pairs
        .iter()
        .map(|(name, conf)| format!(r#"{{"name": "{name}", "confidence": {conf}}}"#))
        .collect();
    format!(r#"{{"candidates": [{}]}}"#, items.join(","))
}

/// A weather gateway backed by a static map. Places absent from the map
/// are Unavailable — and stay Unavailable on every repeated fetch.
pub struct StaticWeatherGateway {
    readings: HashMap<String, WeatherReading>,
    calls: Mutex<Vec<String>>,
}

impl StaticWeatherGateway {
    pub fn new(entries: Vec<(&str, WeatherReading)>) -> Self {
        Self {
            readings: entries
                .into_iter()
                .map(|(k, v)| (k.to_lowercase(), v))
                .collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A gateway with no data at all.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl WeatherGateway for StaticWeatherGateway {
    async fn fetch(&self, place: &str) -> Fetch<WeatherReading> {
        self.calls.lock().unwrap().push(place.to_string());
        self.readings.get(&place.to_lowercase()).cloned().into()
    }
}

/// A context gateway backed by a static map, same contract as
/// [`StaticWeatherGateway`].
pub struct StaticContextGateway {
    entries: HashMap<String, LocationContext>,
    calls: Mutex<Vec<String>>,
}

impl StaticContextGateway {
    pub fn new(entries: Vec<(&str, LocationContext)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.to_lowercase(), v))
                .collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContextGateway for StaticContextGateway {
    async fn fetch(&self, place: &str) -> Fetch<LocationContext> {
        self.calls.lock().unwrap().push(place.to_string());
        self.entries.get(&place.to_lowercase()).cloned().into()
    }
}

/// A plausible reading for tests.
pub fn make_reading(temperature: f64) -> WeatherReading {
    WeatherReading {
        temperature,
        feels_like: temperature - 1.0,
        condition: "scattered clouds".into(),
        humidity: 60,
    }
}

/// A plausible context entry for tests.
pub fn make_context(place: &str) -> LocationContext {
    LocationContext {
        summary: format!("{place} is a place people ask about."),
        source: format!(
            "https://en.wikipedia.org/wiki/{}",
            place.replace(' ', "_")
        ),
    }
}
