//! Configuration loading and validation for Nimbus.
//!
//! Loads configuration from `~/.nimbus/config.toml` (optional) with
//! environment variable overrides. Validates all settings at startup.
//! API keys never appear in `Debug` output.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.nimbus/config.toml`; every field can also be set
/// through a `NIMBUS_*` environment variable (see [`Settings::load`]).
#[derive(Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Text-completion service settings.
    #[serde(default)]
    pub completion: CompletionSettings,

    /// Weather provider settings.
    #[serde(default)]
    pub weather: WeatherSettings,

    /// Encyclopedic provider settings.
    #[serde(default)]
    pub wiki: WikiSettings,

    /// Orchestration tunables.
    #[serde(default)]
    pub agent: AgentSettings,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct CompletionSettings {
    /// API key for the completion service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible endpoint.
    #[serde(default = "default_completion_base_url")]
    pub base_url: String,

    /// Model name sent with every request.
    #[serde(default = "default_model")]
    pub model: String,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct WeatherSettings {
    /// OpenWeatherMap API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Current-conditions endpoint base URL.
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WikiSettings {
    /// Wikipedia base URL (language edition).
    #[serde(default = "default_wiki_base_url")]
    pub base_url: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AgentSettings {
    /// How many candidates the exploratory strategy considers at most.
    #[serde(default = "default_candidate_cap")]
    pub candidate_cap: usize,

    /// Candidates at or above this confidence are offered as
    /// "you might also have meant" alternatives.
    #[serde(default = "default_alternative_threshold")]
    pub alternative_threshold: f64,

    /// Per-call HTTP timeout in seconds; a timeout is treated as
    /// Unavailable.
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

fn default_completion_base_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_model() -> String {
    "gpt-4o-mini".into()
}
fn default_weather_base_url() -> String {
    "https://api.openweathermap.org/data/2.5/weather".into()
}
fn default_wiki_base_url() -> String {
    "https://en.wikipedia.org".into()
}
fn default_candidate_cap() -> usize {
    5
}
fn default_alternative_threshold() -> f64 {
    0.3
}
fn default_http_timeout_secs() -> u64 {
    10
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_completion_base_url(),
            model: default_model(),
        }
    }
}

impl Default for WeatherSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_weather_base_url(),
        }
    }
}

impl Default for WikiSettings {
    fn default() -> Self {
        Self {
            base_url: default_wiki_base_url(),
        }
    }
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            candidate_cap: default_candidate_cap(),
            alternative_threshold: default_alternative_threshold(),
            http_timeout_secs: default_http_timeout_secs(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            completion: CompletionSettings::default(),
            weather: WeatherSettings::default(),
            wiki: WikiSettings::default(),
            agent: AgentSettings::default(),
        }
    }
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for CompletionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionSettings")
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

impl std::fmt::Debug for WeatherSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherSettings")
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("completion", &self.completion)
            .field("weather", &self.weather)
            .field("wiki", &self.wiki)
            .field("agent", &self.agent)
            .finish()
    }
}

impl Settings {
    /// Load configuration: file (if present), then environment overrides,
    /// then validation.
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Self::load_from(&Self::config_path())?;
        settings.apply_overrides(std::env::vars());
        settings.validate()?;
        Ok(settings)
    }

    /// Load configuration from a specific file path. A missing file yields
    /// defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Apply environment-style overrides from an iterator of `(key, value)`
    /// pairs. Taking an iterator keeps tests deterministic — they never
    /// mutate the process environment.
    pub fn apply_overrides(&mut self, vars: impl Iterator<Item = (String, String)>) {
        for (key, value) in vars {
            match key.as_str() {
                "NIMBUS_COMPLETION_API_KEY" => self.completion.api_key = Some(value),
                "NIMBUS_COMPLETION_BASE_URL" => self.completion.base_url = value,
                "NIMBUS_COMPLETION_MODEL" => self.completion.model = value,
                "NIMBUS_WEATHER_API_KEY" => self.weather.api_key = Some(value),
                "NIMBUS_WEATHER_BASE_URL" => self.weather.base_url = value,
                "NIMBUS_WIKI_BASE_URL" => self.wiki.base_url = value,
                "NIMBUS_CANDIDATE_CAP" => {
                    if let Ok(cap) = value.parse() {
                        self.agent.candidate_cap = cap;
                    }
                }
                "NIMBUS_ALTERNATIVE_THRESHOLD" => {
                    if let Ok(t) = value.parse() {
                        self.agent.alternative_threshold = t;
                    }
                }
                "NIMBUS_HTTP_TIMEOUT_SECS" => {
                    if let Ok(secs) = value.parse() {
                        self.agent.http_timeout_secs = secs;
                    }
                }
                // Conventional aliases, only used when the dedicated
                // variable hasn't filled the field.
                "OPENAI_API_KEY" => {
                    self.completion.api_key.get_or_insert(value);
                }
                "OPENWEATHER_API_KEY" => {
                    self.weather.api_key.get_or_insert(value);
                }
                _ => {}
            }
        }
    }

    /// Get the configuration file path.
    pub fn config_path() -> PathBuf {
        dirs_home().join(".nimbus").join("config.toml")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.agent.candidate_cap == 0 {
            return Err(ConfigError::ValidationError(
                "candidate_cap must be at least 1".into(),
            ));
        }

        if !(0.0..=1.0).contains(&self.agent.alternative_threshold) {
            return Err(ConfigError::ValidationError(
                "alternative_threshold must be between 0.0 and 1.0".into(),
            ));
        }

        if self.agent.http_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "http_timeout_secs must be at least 1".into(),
            ));
        }

        if self.completion.base_url.is_empty() || self.weather.base_url.is_empty() {
            return Err(ConfigError::ValidationError(
                "provider base URLs must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Whether both provider credentials are present.
    pub fn has_credentials(&self) -> bool {
        self.completion.api_key.is_some() && self.weather.api_key.is_some()
    }

    /// Generate a default config TOML string (for first-run setup).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigError> for nimbus_core::Error {
    fn from(err: ConfigError) -> Self {
        nimbus_core::Error::Config {
            message: err.to_string(),
        }
    }
}
