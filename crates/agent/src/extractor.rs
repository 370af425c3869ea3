//! Location Extractor — free text in, ranked location candidates out.
//!
//! Issues exactly one completion call per invocation with a fixed prompt
//! template, then parses the raw output defensively. The service's output
//! is never trusted: structured parsing falls back to treating the whole
//! reply as a single low-confidence candidate, and a failed service call
//! yields an empty candidate set rather than an error.

use nimbus_core::completion::{CompletionRequest, CompletionService};
use nimbus_core::model::LocationCandidate;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// The fixed extraction prompt. The service is asked for machine-readable
/// candidate/confidence pairs; everything else is handled by the parser.
const EXTRACTION_SYSTEM_PROMPT: &str = "\
You extract geographic locations from weather questions.
Identify every location the user could plausibly mean. For ambiguous names \
(several places sharing one name), list each plausible reading separately \
with a qualifier, e.g. \"Paris, France\" and \"Paris, Texas\".
Respond with a JSON object of the form:
{\"candidates\": [{\"name\": \"Paris, France\", \"confidence\": 0.9}]}
Confidence is a number between 0 and 1. Order candidates from most to \
least likely. If no location can be identified, respond with \
{\"candidates\": []}.";

/// The tagged result of parsing one raw completion output.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    /// The output parsed as the requested JSON shape.
    Structured(Vec<LocationCandidate>),
    /// The output was not parseable; the whole trimmed reply is treated as
    /// one candidate at confidence 0.5.
    Fallback(LocationCandidate),
    /// The output was blank.
    Empty,
}

/// Extracts location candidates from a natural-language query.
pub struct LocationExtractor {
    completion: Arc<dyn CompletionService>,
    model: String,
}

impl LocationExtractor {
    pub fn new(completion: Arc<dyn CompletionService>, model: impl Into<String>) -> Self {
        Self {
            completion,
            model: model.into(),
        }
    }

    /// Extract candidates for `query`, ordered by descending confidence.
    ///
    /// Never fails: a service error logs a warning and returns an empty
    /// sequence.
    pub async fn extract(&self, query: &str) -> Vec<LocationCandidate> {
        let request =
            CompletionRequest::structured(&self.model, EXTRACTION_SYSTEM_PROMPT, query);

        let raw = match self.completion.complete(request).await {
            Ok(response) => response.text,
            Err(e) => {
                warn!(error = %e, "Location extraction call failed");
                return Vec::new();
            }
        };

        let candidates = match parse_candidates(&raw) {
            ParseOutcome::Structured(candidates) => candidates,
            ParseOutcome::Fallback(candidate) => {
                debug!(name = %candidate.name, "Unstructured extraction output, using fallback candidate");
                vec![candidate]
            }
            ParseOutcome::Empty => Vec::new(),
        };

        dedup_by_name(candidates)
    }
}

/// Parse raw completion output into a tagged outcome.
pub fn parse_candidates(raw: &str) -> ParseOutcome {
    let trimmed = strip_code_fences(raw).trim();
    if trimmed.is_empty() {
        return ParseOutcome::Empty;
    }

    #[derive(Deserialize)]
    struct CandidateList {
        #[serde(default)]
        candidates: Vec<RawCandidate>,
    }

    #[derive(Deserialize)]
    struct RawCandidate {
        #[serde(default)]
        name: String,
        #[serde(default = "fallback_confidence")]
        confidence: f64,
    }

    fn fallback_confidence() -> f64 {
        0.5
    }

    // Accept both the requested object shape and a bare array.
    let raws: Option<Vec<RawCandidate>> = serde_json::from_str::<CandidateList>(trimmed)
        .map(|list| list.candidates)
        .or_else(|_| serde_json::from_str::<Vec<RawCandidate>>(trimmed))
        .ok();

    match raws {
        Some(raws) => ParseOutcome::Structured(
            raws.into_iter()
                .filter_map(|r| {
                    let name = trim_place(&r.name);
                    (!name.is_empty())
                        .then(|| LocationCandidate::new(name, r.confidence))
                })
                .collect(),
        ),
        None => {
            let name = trim_place(trimmed);
            if name.is_empty() {
                ParseOutcome::Empty
            } else {
                ParseOutcome::Fallback(LocationCandidate::new(name, 0.5))
            }
        }
    }
}

/// Models often wrap JSON in markdown fences despite instructions.
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop an optional language tag on the opening fence.
    let inner = inner
        .strip_prefix("json")
        .unwrap_or(inner)
        .trim_start_matches(['\r', '\n']);
    inner.strip_suffix("```").unwrap_or(inner)
}

/// Trim whitespace and trailing punctuation from a place name.
fn trim_place(s: &str) -> &str {
    s.trim().trim_end_matches(['?', '!', '.', ',', ';', ':'])
}

/// Deduplicate candidates case-insensitively, keeping the highest
/// confidence per name, then order by descending confidence (stable on
/// ties).
fn dedup_by_name(candidates: Vec<LocationCandidate>) -> Vec<LocationCandidate> {
    let mut unique: Vec<LocationCandidate> = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        let key = candidate.name.to_lowercase();
        match unique.iter_mut().find(|c| c.name.to_lowercase() == key) {
            Some(existing) => {
                if candidate.confidence > existing.confidence {
                    *existing = candidate;
                }
            }
            None => unique.push(candidate),
        }
    }

    unique.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    unique
}
