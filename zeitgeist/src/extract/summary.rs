//! Condensing extracted documents into a brand summary.

use crate::gateway::ModelGateway;
use crate::utils::truncate_chars;
use std::sync::Arc;
use tracing::{info, warn};

/// Placed between documents when they are combined.
pub const DOCUMENT_SEPARATOR: &str = "\n\n---\n\n";

/// Appended when the combined text is cut instead of summarised.
pub const TRUNCATION_MARKER: &str = "\n\n[...truncated for length]";

const CHARS_PER_TOKEN: usize = 4;
const DEFAULT_TARGET_TOKENS: usize = 3000;
const SUMMARY_MAX_OUTPUT_TOKENS: u32 = 3500;
const SUMMARY_TEMPERATURE: f32 = 0.3;

const SUMMARY_INSTRUCTIONS: &str = "\
You are an expert brand analyst. Extract and summarize the company's brand identity and values, \
products or services, target audience and positioning, voice and tone, recurring marketing themes, \
history and achievements, and unique selling propositions. Keep only what helps when creating \
marketing campaigns.";

/// Turns extracted document texts into one brand summary.
///
/// Texts that fit the target length are returned combined and unchanged.
/// Longer texts are summarised by the model; if that call fails the
/// combined text is truncated to the target length instead.
#[derive(Clone)]
pub struct DocumentSummarizer {
    gateway: Arc<dyn ModelGateway>,
    target_tokens: usize,
}

impl std::fmt::Debug for DocumentSummarizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentSummarizer")
            .field("target_tokens", &self.target_tokens)
            .finish_non_exhaustive()
    }
}

impl DocumentSummarizer {
    /// Creates a summarizer with a 3000-token target.
    #[must_use]
    pub fn new(gateway: Arc<dyn ModelGateway>) -> Self {
        Self {
            gateway,
            target_tokens: DEFAULT_TARGET_TOKENS,
        }
    }

    /// Sets the target summary length in tokens.
    #[must_use]
    pub fn with_target_tokens(mut self, tokens: usize) -> Self {
        self.target_tokens = tokens;
        self
    }

    /// Returns the target length in characters.
    #[must_use]
    pub fn target_chars(&self) -> usize {
        self.target_tokens.saturating_mul(CHARS_PER_TOKEN)
    }

    /// Summarises `texts` for `company_name`, or returns `None` when every
    /// text is blank.
    pub async fn summarize(&self, texts: &[String], company_name: &str) -> Option<String> {
        let parts: Vec<&str> = texts
            .iter()
            .map(String::as_str)
            .filter(|t| !t.trim().is_empty())
            .collect();
        if parts.is_empty() {
            return None;
        }

        let combined = parts.join(DOCUMENT_SEPARATOR);
        let combined_chars = combined.chars().count();
        if combined_chars < self.target_chars() {
            return Some(combined);
        }

        info!(chars = combined_chars, company = company_name, "Summarizing brand documents");
        let prompt = format!(
            "Company Name: {company_name}\n\nDocuments:\n{combined}\n\n\
Provide a comprehensive summary (target: about {} tokens) that captures the brand context \
and marketing-relevant information from these documents.",
            self.target_tokens
        );

        match self
            .gateway
            .generate(
                &prompt,
                SUMMARY_INSTRUCTIONS,
                SUMMARY_MAX_OUTPUT_TOKENS,
                SUMMARY_TEMPERATURE,
            )
            .await
        {
            Ok(summary) => {
                info!(chars = summary.chars().count(), "Brand documents summarized");
                Some(summary)
            }
            Err(err) => {
                warn!(error = %err, "Summarization failed, truncating documents");
                let mut truncated = truncate_chars(&combined, self.target_chars());
                truncated.push_str(TRUNCATION_MARKER);
                Some(truncated)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::UpstreamError;
    use crate::testing::ScriptedGateway;

    #[tokio::test]
    async fn test_short_texts_are_combined_without_a_call() {
        let gateway = Arc::new(ScriptedGateway::new());
        let summarizer = DocumentSummarizer::new(gateway.clone());

        let summary = summarizer
            .summarize(&["one".to_string(), "  ".to_string(), "two".to_string()], "Acme")
            .await;

        assert_eq!(summary.as_deref(), Some("one\n\n---\n\ntwo"));
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_blank_input_yields_none() {
        let summarizer = DocumentSummarizer::new(Arc::new(ScriptedGateway::new()));
        assert!(summarizer.summarize(&[], "Acme").await.is_none());
    }

    #[tokio::test]
    async fn test_long_texts_are_summarized() {
        let gateway = Arc::new(ScriptedGateway::new().with_response("SUMMARY"));
        let summarizer = DocumentSummarizer::new(gateway.clone()).with_target_tokens(5);

        let summary = summarizer.summarize(&["x".repeat(50)], "Acme").await;

        assert_eq!(summary.as_deref(), Some("SUMMARY"));
        let call = &gateway.calls()[0];
        assert!(call.prompt.starts_with("Company Name: Acme"));
        assert_eq!(call.max_output_tokens, SUMMARY_MAX_OUTPUT_TOKENS);
    }

    #[tokio::test]
    async fn test_failed_summary_falls_back_to_truncation() {
        let gateway =
            Arc::new(ScriptedGateway::new().with_failure(UpstreamError::timeout("slow")));
        let summarizer = DocumentSummarizer::new(gateway).with_target_tokens(5);

        let summary = summarizer.summarize(&["y".repeat(50)], "Acme").await.unwrap();

        assert_eq!(summary, format!("{}{TRUNCATION_MARKER}", "y".repeat(20)));
    }
}
