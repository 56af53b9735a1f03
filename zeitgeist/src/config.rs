//! Runtime settings.
//!
//! Credentials and model selection are resolved once, before any run, and
//! handed to the composition root. Nothing in the library reads the
//! environment on its own.

use crate::errors::ConfigurationError;
use crate::stages::GenerationDefaults;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "OPENROUTER_API_KEY";
/// Environment variable holding the API base URL.
pub const ENV_BASE_URL: &str = "OPENROUTER_BASE_URL";
/// Environment variable naming the pro-tier model.
pub const ENV_PRO_MODEL: &str = "OPENROUTER_PRO_MODEL";
/// Environment variable naming the lite-tier model.
pub const ENV_LITE_MODEL: &str = "OPENROUTER_LITE_MODEL";
/// Environment variable holding the request timeout in seconds.
pub const ENV_TIMEOUT_SECONDS: &str = "ZEITGEIST_TIMEOUT_SECONDS";
/// Environment variable holding the progress channel capacity.
pub const ENV_EVENT_BUFFER: &str = "ZEITGEIST_EVENT_BUFFER";

fn default_base_url() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_pro_model() -> String {
    "google/gemini-2.5-pro".to_string()
}

fn default_lite_model() -> String {
    "google/gemini-2.5-flash-lite".to_string()
}

const fn default_timeout_seconds() -> u64 {
    120
}

const fn default_max_output_tokens() -> u32 {
    4096
}

const fn default_temperature() -> f32 {
    0.7
}

const fn default_event_buffer() -> usize {
    64
}

/// Which configured model a gateway should call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelTier {
    /// The higher-quality model.
    #[default]
    Pro,
    /// The cheaper, faster model.
    Lite,
}

/// Settings for the gateway and the progress transport.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// API key; never serialized.
    #[serde(default, skip_serializing)]
    pub api_key: String,

    /// Base URL of the OpenAI-compatible API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model used for `ModelTier::Pro`.
    #[serde(default = "default_pro_model")]
    pub pro_model: String,

    /// Model used for `ModelTier::Lite`.
    #[serde(default = "default_lite_model")]
    pub lite_model: String,

    /// Per-request timeout.
    #[serde(default = "default_timeout_seconds")]
    pub request_timeout_seconds: u64,

    /// Default output token cap.
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Default sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Capacity of the progress channel between the emitter and the consumer.
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("base_url", &self.base_url)
            .field("pro_model", &self.pro_model)
            .field("lite_model", &self.lite_model)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("temperature", &self.temperature)
            .field("event_buffer", &self.event_buffer)
            .finish()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            pro_model: default_pro_model(),
            lite_model: default_lite_model(),
            request_timeout_seconds: default_timeout_seconds(),
            max_output_tokens: default_max_output_tokens(),
            temperature: default_temperature(),
            event_buffer: default_event_buffer(),
        }
    }
}

impl Settings {
    /// Reads settings from the process environment.
    ///
    /// Unset variables keep their defaults. A missing API key is not an
    /// error here; call [`Settings::validate`] before starting a run.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if a numeric variable cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through an arbitrary lookup function.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if a numeric value cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();
        let lookup = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(api_key) = lookup(ENV_API_KEY) {
            settings.api_key = api_key;
        }
        if let Some(base_url) = lookup(ENV_BASE_URL) {
            settings.base_url = base_url;
        }
        if let Some(model) = lookup(ENV_PRO_MODEL) {
            settings.pro_model = model;
        }
        if let Some(model) = lookup(ENV_LITE_MODEL) {
            settings.lite_model = model;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECONDS) {
            settings.request_timeout_seconds = parse_number(ENV_TIMEOUT_SECONDS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_EVENT_BUFFER) {
            settings.event_buffer = parse_number(ENV_EVENT_BUFFER, &raw)?;
        }

        Ok(settings)
    }

    /// Sets the API key.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the request timeout in seconds.
    #[must_use]
    pub fn with_request_timeout_seconds(mut self, seconds: u64) -> Self {
        self.request_timeout_seconds = seconds;
        self
    }

    /// Sets the progress channel capacity.
    #[must_use]
    pub fn with_event_buffer(mut self, capacity: usize) -> Self {
        self.event_buffer = capacity;
        self
    }

    /// Checks that the settings can drive a run.
    ///
    /// # Errors
    ///
    /// Returns `CONFIG-MISSING-CREDENTIAL` when the API key is empty and
    /// `CONFIG-INVALID-VALUE` for out-of-range parameters.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigurationError::missing_credential(ENV_API_KEY));
        }
        if self.base_url.trim().is_empty() {
            return Err(ConfigurationError::invalid_value("base_url", "must not be empty"));
        }
        if self.request_timeout_seconds == 0 {
            return Err(ConfigurationError::invalid_value(
                "request_timeout_seconds",
                "must be greater than zero",
            ));
        }
        if self.max_output_tokens == 0 {
            return Err(ConfigurationError::invalid_value(
                "max_output_tokens",
                "must be greater than zero",
            ));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigurationError::invalid_value(
                "temperature",
                format!("{} is outside 0.0..=2.0", self.temperature),
            ));
        }
        if self.event_buffer == 0 {
            return Err(ConfigurationError::invalid_value("event_buffer", "must be greater than zero"));
        }
        Ok(())
    }

    /// Returns the model identifier for a tier.
    #[must_use]
    pub fn model_for(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Pro => &self.pro_model,
            ModelTier::Lite => &self.lite_model,
        }
    }

    /// Returns the request timeout.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Returns the sampling defaults applied to stage requests.
    #[must_use]
    pub fn generation_defaults(&self) -> GenerationDefaults {
        GenerationDefaults {
            max_output_tokens: self.max_output_tokens,
            temperature: self.temperature,
        }
    }

    /// Returns the values that must never appear in events or logs.
    #[must_use]
    pub fn secrets(&self) -> Vec<String> {
        if self.api_key.is_empty() {
            Vec::new()
        } else {
            vec![self.api_key.clone()]
        }
    }
}

fn parse_number<T>(key: &str, raw: &str) -> Result<T, ConfigurationError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>()
        .map_err(|e| ConfigurationError::invalid_value(key, format!("'{raw}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::codes;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.base_url, "https://openrouter.ai/api/v1");
        assert_eq!(settings.model_for(ModelTier::Pro), "google/gemini-2.5-pro");
        assert_eq!(settings.model_for(ModelTier::Lite), "google/gemini-2.5-flash-lite");
        assert_eq!(settings.request_timeout(), Duration::from_secs(120));
        assert_eq!(settings.event_buffer, 64);
    }

    #[test]
    fn test_from_lookup_reads_values() {
        let settings = Settings::from_lookup(lookup_from(&[
            (ENV_API_KEY, "secret"),
            (ENV_PRO_MODEL, "custom/pro"),
            (ENV_TIMEOUT_SECONDS, "30"),
            (ENV_EVENT_BUFFER, " 8 "),
        ]))
        .unwrap();

        assert_eq!(settings.api_key, "secret");
        assert_eq!(settings.pro_model, "custom/pro");
        assert_eq!(settings.request_timeout_seconds, 30);
        assert_eq!(settings.event_buffer, 8);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_from_lookup_ignores_blank_values() {
        let settings = Settings::from_lookup(lookup_from(&[(ENV_BASE_URL, "   ")])).unwrap();
        assert_eq!(settings.base_url, "https://openrouter.ai/api/v1");
    }

    #[test]
    fn test_from_lookup_rejects_bad_number() {
        let err = Settings::from_lookup(lookup_from(&[(ENV_TIMEOUT_SECONDS, "soon")])).unwrap_err();
        assert_eq!(err.code(), Some(codes::INVALID_VALUE));
        assert!(err.message.contains(ENV_TIMEOUT_SECONDS));
    }

    #[test]
    fn test_validate_missing_api_key() {
        let err = Settings::default().validate().unwrap_err();
        assert_eq!(err.code(), Some(codes::MISSING_CREDENTIAL));
        assert_eq!(err.message, "OPENROUTER_API_KEY is required");
    }

    #[test]
    fn test_validate_rejects_zero_buffer() {
        let err = Settings::default()
            .with_api_key("k")
            .with_event_buffer(0)
            .validate()
            .unwrap_err();
        assert_eq!(err.code(), Some(codes::INVALID_VALUE));
    }

    #[test]
    fn test_debug_and_serialize_hide_api_key() {
        let settings = Settings::default().with_api_key("super-secret");
        assert!(!format!("{settings:?}").contains("super-secret"));

        let json = serde_json::to_string(&settings).unwrap();
        assert!(!json.contains("super-secret"));
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"api_key": "k"}"#).unwrap();
        assert_eq!(settings.api_key, "k");
        assert_eq!(settings.max_output_tokens, 4096);
    }

    #[test]
    fn test_secrets() {
        assert!(Settings::default().secrets().is_empty());
        assert_eq!(Settings::default().with_api_key("k").secrets(), vec!["k".to_string()]);
    }
}
