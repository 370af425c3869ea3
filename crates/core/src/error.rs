//! Error types for the Nimbus domain.
//!
//! Uses `thiserror` for ergonomic error definitions. External data failures
//! (weather, encyclopedia) are *not* errors — gateways report them as
//! [`crate::model::Fetch::Unavailable`]. The only condition a caller of the
//! agent facade ever sees as a hard error is `InvalidStrategy`, because it is
//! a misuse of the API contract rather than an environmental failure.

use thiserror::Error;

/// The top-level error type for all Nimbus operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Completion service errors ---
    #[error("Completion error: {0}")]
    Completion(#[from] CompletionError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Caller contract violations ---
    #[error("Invalid reasoning strategy '{0}' (expected one of: react, cot, tot)")]
    InvalidStrategy(String),

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures of the opaque text-completion service.
///
/// These never propagate past the extraction or synthesis step: the agent
/// degrades to an empty candidate set or a locally rendered answer instead.
#[derive(Debug, Clone, Error)]
pub enum CompletionError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by completion service, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Completion service not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Empty completion: the service returned no choices")]
    EmptyResponse,
}
