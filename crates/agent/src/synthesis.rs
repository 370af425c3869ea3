//! Answer synthesis — folds the gathered data into a user-facing reply.
//!
//! The primary path hands a JSON data block to the completion service with
//! a per-strategy system prompt. The degradation path renders a
//! deterministic local template, so the caller always receives a coherent
//! paragraph even when the completion service is down or the weather
//! lookup came back empty.

use nimbus_core::completion::{CompletionRequest, CompletionService};
use nimbus_core::model::{Fetch, LocationContext, Strategy, WeatherReading};
use std::sync::Arc;
use tracing::warn;

const SYNTHESIS_SYSTEM_PROMPT: &str = "\
You are a helpful weather assistant. Create a friendly and informative \
response about the weather and location based on the provided JSON data.
Include: current conditions, temperature and how it feels, humidity, and \
a brief description of the location when available. If a data field is \
marked unavailable, acknowledge the gap briefly instead of inventing \
values. Always end with source attribution for the data you used.";

const REACT_FLAVOR: &str = "\
You are using ReAct (reason + act) reasoning: answer directly and \
concisely from the gathered observations.";

const COT_FLAVOR: &str = "\
You are using Chain of Thought reasoning. Make your reasoning visible as \
numbered steps: first how the location was identified, then how you \
interpret the data, then the final statement.";

const TOT_FLAVOR: &str = "\
You are using Tree of Thoughts reasoning. Several interpretations of the \
location were explored; briefly note why this one was selected.";

/// Everything the synthesis step needs for one answer.
pub struct SynthesisInput<'a> {
    pub query: &'a str,
    pub location: &'a str,
    pub strategy: Strategy,
    pub weather: &'a Fetch<WeatherReading>,
    pub context: &'a Fetch<LocationContext>,
}

/// Builds the final answer text from gathered data.
pub struct Synthesizer {
    completion: Arc<dyn CompletionService>,
    model: String,
}

impl Synthesizer {
    pub fn new(completion: Arc<dyn CompletionService>, model: impl Into<String>) -> Self {
        Self {
            completion,
            model: model.into(),
        }
    }

    /// Produce the answer. A failed or blank completion degrades to the
    /// local template and records a warning.
    pub async fn answer(&self, input: &SynthesisInput<'_>, warnings: &mut Vec<String>) -> String {
        let system = match input.strategy {
            Strategy::React => format!("{SYNTHESIS_SYSTEM_PROMPT}\n{REACT_FLAVOR}"),
            Strategy::Cot => format!("{SYNTHESIS_SYSTEM_PROMPT}\n{COT_FLAVOR}"),
            Strategy::Tot => format!("{SYNTHESIS_SYSTEM_PROMPT}\n{TOT_FLAVOR}"),
        };

        let data = data_block(input);
        let request = CompletionRequest::freeform(&self.model, system, data.to_string());

        match self.completion.complete(request).await {
            Ok(response) if !response.text.trim().is_empty() => {
                response.text.trim().to_string()
            }
            Ok(_) => {
                warn!("Synthesis returned blank text, using local rendering");
                warnings.push("answer synthesis degraded to local rendering".into());
                render_local(input)
            }
            Err(e) => {
                warn!(error = %e, "Synthesis call failed, using local rendering");
                warnings.push("answer synthesis degraded to local rendering".into());
                render_local(input)
            }
        }
    }
}

/// The JSON block handed to the synthesis prompt.
fn data_block(input: &SynthesisInput<'_>) -> serde_json::Value {
    let weather = match input.weather {
        Fetch::Ready(w) => serde_json::json!({
            "temperature_c": w.temperature,
            "feels_like_c": w.feels_like,
            "condition": w.condition,
            "humidity_pct": w.humidity,
            "source": "OpenWeatherMap",
            "source_url": "https://openweathermap.org/",
        }),
        Fetch::Unavailable => serde_json::json!({ "available": false }),
    };

    let context = match input.context {
        Fetch::Ready(c) => serde_json::json!({
            "summary": c.summary,
            "source": "Wikipedia",
            "source_url": c.source,
        }),
        Fetch::Unavailable => serde_json::json!({ "available": false }),
    };

    serde_json::json!({
        "query": input.query,
        "location": input.location,
        "reasoning_type": input.strategy.as_str(),
        "weather": weather,
        "location_info": context,
    })
}

/// Deterministic fallback rendering. Always yields a coherent paragraph,
/// whatever combination of data survived.
pub fn render_local(input: &SynthesisInput<'_>) -> String {
    let mut out = String::new();

    match input.weather {
        Fetch::Ready(w) => {
            out.push_str(&format!(
                "Weather in {}: currently {}, {:.1}\u{b0}C (feels like {:.1}\u{b0}C), humidity {}%.",
                input.location, w.condition, w.temperature, w.feels_like, w.humidity
            ));
        }
        Fetch::Unavailable => {
            out.push_str(&format!(
                "I couldn't retrieve current weather data for {} right now.",
                input.location
            ));
        }
    }

    match input.context {
        Fetch::Ready(c) => {
            out.push_str(&format!(
                "\n\nAbout {}: {}\nLearn more: {}",
                input.location, c.summary, c.source
            ));
        }
        Fetch::Unavailable => {
            if !input.weather.is_ready() {
                out.push_str(" I couldn't find background information about it either — could you check the spelling or try again later?");
            }
        }
    }

    out
}
