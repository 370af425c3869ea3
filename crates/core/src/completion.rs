//! CompletionService trait — the abstraction over the text-completion
//! backend.
//!
//! The agent treats the language model as an opaque text-in/text-out
//! service: it sends a prompt pair and gets raw text back. Structure (JSON
//! candidate lists, reasoning steps) is negotiated through the prompt and
//! parsed defensively by the caller, never assumed.
//!
//! Implementations: OpenAI-compatible endpoints, scripted test doubles.

use crate::error::CompletionError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One prompt pair sent to the completion service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// The model to use (e.g. "gpt-4o-mini").
    pub model: String,

    /// System instructions (role, output format).
    pub system: String,

    /// The user-side content.
    pub user: String,

    /// Temperature (0.0 = deterministic, 1.0 = creative).
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Ask the service to constrain output to a JSON object.
    #[serde(default)]
    pub json_mode: bool,
}

fn default_temperature() -> f32 {
    0.3
}

impl CompletionRequest {
    /// A request with the defaults the agent uses for structured extraction:
    /// low temperature, JSON mode on.
    pub fn structured(
        model: impl Into<String>,
        system: impl Into<String>,
        user: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            system: system.into(),
            user: user.into(),
            temperature: default_temperature(),
            max_tokens: None,
            json_mode: true,
        }
    }

    /// A free-text request (answer synthesis).
    pub fn freeform(
        model: impl Into<String>,
        system: impl Into<String>,
        user: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            system: system.into(),
            user: user.into(),
            temperature: 0.7,
            max_tokens: None,
            json_mode: false,
        }
    }
}

/// A complete response from the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// The generated text, verbatim.
    pub text: String,

    /// Which model actually responded (may differ from requested).
    pub model: String,

    /// Token usage statistics, when the backend reports them.
    pub usage: Option<Usage>,
}

/// Token usage information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The core completion trait.
///
/// Callers invoke `complete()` without knowing which backend is wired in.
/// Transport failures surface as [`CompletionError`]s; the extraction and
/// synthesis layers absorb them and degrade, so they never reach the
/// facade caller.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// A human-readable name for this backend (e.g. "openai").
    fn name(&self) -> &str;

    /// Send a request and get the generated text back.
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<CompletionResponse, CompletionError>;

    /// Health check — can we reach the service?
    async fn health_check(&self) -> std::result::Result<bool, CompletionError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structured_request_defaults() {
        let req = CompletionRequest::structured("gpt-4o-mini", "sys", "usr");
        assert!(req.json_mode);
        assert!((req.temperature - 0.3).abs() < f32::EPSILON);
        assert!(req.max_tokens.is_none());
    }

    #[test]
    fn freeform_request_defaults() {
        let req = CompletionRequest::freeform("gpt-4o-mini", "sys", "usr");
        assert!(!req.json_mode);
        assert!((req.temperature - 0.7).abs() < f32::EPSILON);
    }
}
