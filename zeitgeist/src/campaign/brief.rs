//! Campaign inputs and result shaping.

use crate::errors::ConfigurationError;
use crate::pipeline::PipelineResult;
use crate::trends::Trend;
use crate::utils::truncate_chars;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;

use super::{PIPELINE_DESCRIPTION, TREND_ANALYSIS_STAGE};

/// Longest narrative kept in a [`CampaignOutput`], in characters.
pub const NARRATIVE_CHARS: usize = 2000;

/// What a campaign is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignBrief {
    /// Company name.
    pub company_name: String,
    /// What the company does.
    pub company_description: String,
    /// Brand voice, e.g. "edgy" or "professional".
    pub brand_voice: String,
    /// Name of the trend the campaign rides.
    pub trend_name: String,
    /// Background on the trend.
    pub trend_context: String,
    /// Summary of uploaded brand documents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_summary: Option<String>,
}

impl CampaignBrief {
    /// Creates a brief without a document summary.
    #[must_use]
    pub fn new(
        company_name: impl Into<String>,
        company_description: impl Into<String>,
        brand_voice: impl Into<String>,
        trend_name: impl Into<String>,
        trend_context: impl Into<String>,
    ) -> Self {
        Self {
            company_name: company_name.into(),
            company_description: company_description.into(),
            brand_voice: brand_voice.into(),
            trend_name: trend_name.into(),
            trend_context: trend_context.into(),
            document_summary: None,
        }
    }

    /// Attaches a summary of the brand's documents. Blank summaries are
    /// ignored.
    #[must_use]
    pub fn with_document_summary(mut self, summary: impl Into<String>) -> Self {
        let summary = summary.into();
        self.document_summary = (!summary.trim().is_empty()).then_some(summary);
        self
    }

    /// Checks that the required fields are present.
    ///
    /// # Errors
    ///
    /// Returns `CONFIG-INVALID-VALUE` naming the first blank field.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for (key, value) in [
            ("company_name", &self.company_name),
            ("company_description", &self.company_description),
            ("brand_voice", &self.brand_voice),
            ("trend_name", &self.trend_name),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigurationError::invalid_value(key, "must not be empty"));
            }
        }
        Ok(())
    }

    /// Renders the brief as the pipeline's initial input.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Company: {}", self.company_name.trim());
        let _ = writeln!(out, "Description: {}", self.company_description.trim());
        let _ = writeln!(out, "Brand Voice: {}", self.brand_voice.trim());
        out.push('\n');
        let _ = writeln!(out, "Trend/Topic: {}", self.trend_name.trim());
        let _ = writeln!(out, "Trend Context: {}", self.trend_context.trim());
        if let Some(summary) = &self.document_summary {
            out.push('\n');
            let _ = writeln!(out, "Brand Documents Summary: {}", summary.trim());
        }
        out.push('\n');
        out.push_str("Create a complete marketing campaign that leverages this trend.\n");
        out
    }
}

/// Descriptive facts about a finished campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignMetadata {
    /// Company name from the brief.
    pub company_name: String,
    /// Trend name from the brief.
    pub trend_name: String,
    /// Brand voice from the brief.
    pub brand_voice: String,
    /// Number of stages that ran.
    pub stages_used: usize,
    /// Human-readable stage chain.
    pub pipeline: String,
}

/// A finished campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignOutput {
    /// The first [`NARRATIVE_CHARS`] characters of the final output.
    pub narrative: String,
    /// The full final output.
    pub full_output: String,
    /// Trends recovered from the analysis stage.
    pub trends: Vec<Trend>,
    /// Raw output of every stage keyed `"{n}_{stage}"`, `n` starting at 1.
    pub intermediary_outputs: BTreeMap<String, String>,
    /// Facts about the run.
    pub metadata: CampaignMetadata,
}

impl CampaignOutput {
    /// Shapes a completed campaign run.
    #[must_use]
    pub fn from_result(brief: &CampaignBrief, result: &PipelineResult) -> Self {
        let intermediary_outputs = result
            .records
            .iter()
            .map(|record| {
                (
                    format!("{}_{}", record.index + 1, record.stage),
                    record.raw.clone().unwrap_or_default(),
                )
            })
            .collect();

        let trends = result
            .stage_processed(TREND_ANALYSIS_STAGE)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
            .unwrap_or_default();

        Self {
            narrative: truncate_chars(&result.output, NARRATIVE_CHARS),
            full_output: result.output.clone(),
            trends,
            intermediary_outputs,
            metadata: CampaignMetadata {
                company_name: brief.company_name.clone(),
                trend_name: brief.trend_name.clone(),
                brand_voice: brief.brand_voice.clone(),
                stages_used: result.records.len(),
                pipeline: PIPELINE_DESCRIPTION.to_string(),
            },
        }
    }
}
