//! Domain value objects.
//!
//! These are the types that flow through one request: the extractor produces
//! [`LocationCandidate`]s, the gateways produce [`Fetch`]-wrapped readings,
//! and an orchestrator folds them into a single [`QueryResult`].

use crate::error::Error;
use serde::{Deserialize, Serialize};

/// A single location hypothesis produced by free-text extraction.
///
/// Confidence is only meaningful within one extraction call; scores are
/// never compared across requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationCandidate {
    /// The place name as the model emitted it (e.g. "Paris, France").
    pub name: String,

    /// Confidence in [0, 1].
    pub confidence: f64,
}

impl LocationCandidate {
    /// Create a candidate, clamping confidence into [0, 1].
    pub fn new(name: impl Into<String>, confidence: f64) -> Self {
        Self {
            name: name.into(),
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}

/// Current weather conditions for one place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    /// Temperature in °C.
    pub temperature: f64,

    /// Perceived temperature in °C.
    pub feels_like: f64,

    /// Human-readable condition (e.g. "light rain").
    pub condition: String,

    /// Relative humidity, 0–100.
    pub humidity: u8,
}

/// A short encyclopedic description of a place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationContext {
    /// A couple of sentences about the place.
    pub summary: String,

    /// URL of the resolved article. The resolved title is visible in the
    /// URL, so callers can detect a mismatch between the requested and
    /// resolved name.
    pub source: String,
}

/// The outcome of a gateway fetch: data, or an explicit "no data" value.
///
/// `Unavailable` is a first-class value, not an error — callers treat
/// absence as a normal, expected result and degrade gracefully.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetch<T> {
    /// The provider answered and the response mapped cleanly.
    Ready(T),
    /// Provider error, timeout, unknown place, or unparseable response.
    Unavailable,
}

impl<T> Fetch<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, Fetch::Ready(_))
    }

    /// Borrow the inner value if present.
    pub fn as_ready(&self) -> Option<&T> {
        match self {
            Fetch::Ready(v) => Some(v),
            Fetch::Unavailable => None,
        }
    }

    /// Consume, yielding the inner value if present.
    pub fn into_ready(self) -> Option<T> {
        match self {
            Fetch::Ready(v) => Some(v),
            Fetch::Unavailable => None,
        }
    }
}

impl<T> From<Option<T>> for Fetch<T> {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => Fetch::Ready(v),
            None => Fetch::Unavailable,
        }
    }
}

/// The closed set of reasoning strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Single-pass reason-then-act.
    React,
    /// Linear step-by-step reasoning with a visible justification.
    Cot,
    /// Multi-candidate exploratory reasoning.
    Tot,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::React, Strategy::Cot, Strategy::Tot];

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::React => "react",
            Strategy::Cot => "cot",
            Strategy::Tot => "tot",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "react" => Ok(Strategy::React),
            "cot" => Ok(Strategy::Cot),
            "tot" => Ok(Strategy::Tot),
            other => Err(Error::InvalidStrategy(other.to_string())),
        }
    }
}

/// The literal marker recorded in [`QueryResult::location_used`] when
/// extraction produced no usable candidate.
pub const UNKNOWN_LOCATION: &str = "unknown";

/// The terminal artifact of one `process_query` call.
///
/// Constructed once per request, never mutated after return.
/// `location_used` is always one of the candidates the extractor produced
/// for that request, or [`UNKNOWN_LOCATION`] if extraction failed entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResult {
    /// The user-facing answer. Always a coherent sentence or paragraph,
    /// even in total failure.
    pub answer_text: String,

    /// Which strategy produced this result.
    pub strategy_used: Strategy,

    /// The place the answer is about, or [`UNKNOWN_LOCATION`].
    pub location_used: String,

    /// Degradations encountered along the way, in occurrence order.
    pub warnings: Vec<String>,
}
