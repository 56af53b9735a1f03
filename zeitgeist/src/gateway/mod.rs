//! The text-generation boundary.
//!
//! The orchestrator only sees [`ModelGateway`]. Implementations are
//! stateless request/response clients and may be shared across runs.

#[cfg(feature = "http")]
mod openrouter;

#[cfg(feature = "http")]
pub use openrouter::OpenRouterGateway;

use crate::errors::UpstreamError;
use async_trait::async_trait;
use std::sync::Arc;

/// A stateless text-generation backend.
///
/// Implementations must not retry internally; a failed call is reported to
/// the orchestrator as-is.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Generates text for one prompt.
    ///
    /// # Errors
    ///
    /// Returns `UpstreamError` on authentication failure, rate limiting,
    /// transport failure or an unusable response.
    async fn generate(
        &self,
        prompt: &str,
        system_instructions: &str,
        max_output_tokens: u32,
        temperature: f32,
    ) -> Result<String, UpstreamError>;
}

#[async_trait]
impl<T: ModelGateway + ?Sized> ModelGateway for Arc<T> {
    async fn generate(
        &self,
        prompt: &str,
        system_instructions: &str,
        max_output_tokens: u32,
        temperature: f32,
    ) -> Result<String, UpstreamError> {
        (**self)
            .generate(prompt, system_instructions, max_output_tokens, temperature)
            .await
    }
}
