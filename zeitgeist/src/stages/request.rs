//! Generation requests built by stages.

use serde::{Deserialize, Serialize};

/// Sampling parameters applied when a request leaves them unset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationDefaults {
    /// Default output token cap.
    pub max_output_tokens: u32,
    /// Default sampling temperature.
    pub temperature: f32,
}

impl Default for GenerationDefaults {
    fn default() -> Self {
        Self {
            max_output_tokens: 4096,
            temperature: 0.7,
        }
    }
}

/// A request for one generation call.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// The user prompt.
    pub prompt: String,
    /// System instructions (persona).
    pub system_instructions: String,
    /// Output token cap; falls back to the run defaults when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    /// Sampling temperature; falls back to the run defaults when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl GenerationRequest {
    /// Creates a request with the given prompt.
    #[must_use]
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    /// Sets the system instructions.
    #[must_use]
    pub fn with_system_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.system_instructions = instructions.into();
        self
    }

    /// Sets the output token cap.
    #[must_use]
    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = Some(max_output_tokens);
        self
    }

    /// Sets the sampling temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Returns the token cap, using `defaults` when unset.
    #[must_use]
    pub fn max_output_tokens_or(&self, defaults: &GenerationDefaults) -> u32 {
        self.max_output_tokens.unwrap_or(defaults.max_output_tokens)
    }

    /// Returns the temperature, using `defaults` when unset.
    #[must_use]
    pub fn temperature_or(&self, defaults: &GenerationDefaults) -> f32 {
        self.temperature.unwrap_or(defaults.temperature)
    }
}
