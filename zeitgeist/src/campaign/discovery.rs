//! Trend discovery for a company profile.

use super::trend_analysis_stage;
use crate::errors::{ConfigurationError, ZeitgeistError};
use crate::events::ProgressSink;
use crate::pipeline::PipelineOrchestrator;
use crate::trends::{parse_trends, Trend};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::info;

/// Shortest accepted company name, in characters.
pub const MIN_COMPANY_NAME_CHARS: usize = 3;
/// Longest accepted company name, in characters.
pub const MAX_COMPANY_NAME_CHARS: usize = 100;

/// The company trends are discovered for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyProfile {
    /// Company name.
    pub company_name: String,
    /// What the company does.
    pub company_description: String,
    /// Optional industry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
}

impl CompanyProfile {
    /// Creates a profile without an industry.
    #[must_use]
    pub fn new(company_name: impl Into<String>, company_description: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into(),
            company_description: company_description.into(),
            industry: None,
        }
    }

    /// Sets the industry.
    #[must_use]
    pub fn with_industry(mut self, industry: impl Into<String>) -> Self {
        self.industry = Some(industry.into());
        self
    }

    /// Checks the profile.
    ///
    /// # Errors
    ///
    /// Returns `CONFIG-INVALID-VALUE` if the trimmed company name is not
    /// 3 to 100 characters long or the description is blank.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let chars = self.company_name.trim().chars().count();
        if !(MIN_COMPANY_NAME_CHARS..=MAX_COMPANY_NAME_CHARS).contains(&chars) {
            return Err(ConfigurationError::invalid_value(
                "company_name",
                format!(
                    "must be {MIN_COMPANY_NAME_CHARS} to {MAX_COMPANY_NAME_CHARS} characters, got {chars}"
                ),
            ));
        }
        if self.company_description.trim().is_empty() {
            return Err(ConfigurationError::invalid_value(
                "company_description",
                "must not be empty",
            ));
        }
        Ok(())
    }

    /// Renders the profile as the analysis stage's input.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Company: {}", self.company_name.trim());
        let _ = writeln!(out, "Description: {}", self.company_description.trim());
        if let Some(industry) = self.industry.as_deref().filter(|i| !i.trim().is_empty()) {
            let _ = writeln!(out, "Industry: {}", industry.trim());
        }
        out.push_str(
            "\nFocus on finding trends that are relevant to this company's market, audience, and brand positioning.\n",
        );
        out
    }
}

/// Trends found for a company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendReport {
    /// Extracted trends; never empty.
    pub trends: Vec<Trend>,
    /// What was analysed.
    pub search_context: String,
    /// The model's full analysis text.
    pub raw_analysis: String,
}

/// Runs the trend analysis stage on its own.
#[derive(Debug, Clone)]
pub struct TrendDiscovery {
    orchestrator: PipelineOrchestrator,
}

impl TrendDiscovery {
    /// Creates a discovery service on top of `orchestrator`.
    #[must_use]
    pub fn new(orchestrator: PipelineOrchestrator) -> Self {
        Self { orchestrator }
    }

    /// Discovers trends relevant to `profile`.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` for an invalid profile and the stage's cause
    /// (usually `Upstream`) when the analysis fails.
    pub async fn discover(
        &self,
        profile: &CompanyProfile,
        sink: Arc<dyn ProgressSink>,
    ) -> Result<TrendReport, ZeitgeistError> {
        profile.validate()?;
        info!(company = %profile.company_name, "Starting trend discovery");

        let result = self
            .orchestrator
            .run(&[trend_analysis_stage()], &profile.render(), sink)
            .await?
            .into_result()
            .map_err(|failure| failure.cause)?;

        let trends = result
            .processed
            .and_then(|value| serde_json::from_value::<Vec<Trend>>(value).ok())
            .filter(|trends| !trends.is_empty())
            .unwrap_or_else(|| parse_trends(&result.output));
        info!(company = %profile.company_name, trends = trends.len(), "Trend discovery finished");

        Ok(TrendReport {
            trends,
            search_context: format!(
                "Analyzed current viral trends and cultural movements relevant to {}",
                profile.company_name.trim()
            ),
            raw_analysis: result.output,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{codes, UpstreamError};
    use crate::events::{CollectingProgressSink, NoOpProgressSink};
    use crate::testing::ScriptedGateway;

    fn profile() -> CompanyProfile {
        CompanyProfile::new("Acme Tees", "Graphic shirts for internet people")
    }

    #[test]
    fn test_profile_render() {
        let rendered = profile().with_industry("Apparel").render();
        assert!(rendered.starts_with("Company: Acme Tees\n"));
        assert!(rendered.contains("Industry: Apparel\n"));
        assert!(!profile().render().contains("Industry"));
    }

    #[test]
    fn test_profile_validation() {
        assert!(profile().validate().is_ok());
        let err = CompanyProfile::new("Ac", "desc").validate().unwrap_err();
        assert_eq!(err.code(), Some(codes::INVALID_VALUE));
        assert!(CompanyProfile::new("Acme", " ").validate().is_err());
    }

    #[tokio::test]
    async fn test_discover_returns_trends_and_raw_text() {
        let analysis = "1. Dopamine Dressing\nBold colours.\n2. Micro-Retirement\nBreaks between jobs.";
        let gateway = Arc::new(ScriptedGateway::new().with_response(analysis));
        let discovery = TrendDiscovery::new(PipelineOrchestrator::new(gateway.clone()));
        let sink = Arc::new(CollectingProgressSink::new());

        let report = discovery.discover(&profile(), sink.clone()).await.unwrap();

        assert_eq!(report.trends.len(), 2);
        assert_eq!(report.trends[1].name, "Micro-Retirement");
        assert_eq!(report.raw_analysis, analysis);
        assert!(report.search_context.ends_with("Acme Tees"));
        assert!(gateway.prompts()[0].contains("Company: Acme Tees"));
        assert_eq!(sink.len(), 4);
    }

    #[tokio::test]
    async fn test_discover_surfaces_upstream_errors() {
        let gateway = Arc::new(ScriptedGateway::new().with_failure(UpstreamError::rate_limited("429")));
        let discovery = TrendDiscovery::new(PipelineOrchestrator::new(gateway));

        let err = discovery
            .discover(&profile(), Arc::new(NoOpProgressSink))
            .await
            .unwrap_err();
        assert!(matches!(err, ZeitgeistError::Upstream(_)));
    }

    #[tokio::test]
    async fn test_invalid_profile_never_calls_the_gateway() {
        let gateway = Arc::new(ScriptedGateway::new().with_fallback("text"));
        let discovery = TrendDiscovery::new(PipelineOrchestrator::new(gateway.clone()));

        let err = discovery
            .discover(&CompanyProfile::new("", "desc"), Arc::new(NoOpProgressSink))
            .await
            .unwrap_err();
        assert!(matches!(err, ZeitgeistError::Configuration(_)));
        assert_eq!(gateway.call_count(), 0);
    }
}
