//! Structured trend records recovered from free-form generated text.
//!
//! [`TrendExtractor`] is a pure, total function from text to a non-empty,
//! ordered list of [`Trend`]s. Block detection runs through an ordered list
//! of [`BlockStrategy`]s and per-trend attributes come from the keyword
//! tables in [`signals`].

mod extractor;
#[cfg(test)]
mod extractor_tests;
pub mod signals;
mod strategy;

pub use extractor::{parse_trends, Extraction, TrendExtractor};
pub use strategy::{BlockStrategy, TrendBlock};

use crate::errors::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest trend name kept, in characters.
pub const MAX_NAME_CHARS: usize = 100;
/// Longest trend description kept, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 500;
/// Longest `why_its_hot` snippet kept, in characters.
pub const MAX_WHY_HOT_CHARS: usize = 200;
/// Shortest accepted manual topic, in characters.
pub const MIN_TOPIC_CHARS: usize = 5;
/// Longest accepted manual topic, in characters.
pub const MAX_TOPIC_CHARS: usize = 200;

/// How soon a trend should be acted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpportunityWindow {
    /// The trend is at its peak.
    #[serde(rename = "Peak: Now")]
    PeakNow,
    /// The trend is still building.
    #[serde(rename = "Growing")]
    Growing,
    /// The trend is just appearing.
    #[serde(rename = "Early")]
    Early,
}

impl fmt::Display for OpportunityWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PeakNow => write!(f, "Peak: Now"),
            Self::Growing => write!(f, "Growing"),
            Self::Early => write!(f, "Early"),
        }
    }
}

/// A structured trend record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trend {
    /// Trend name, at most [`MAX_NAME_CHARS`] characters.
    #[serde(rename = "trend_name")]
    pub name: String,
    /// Description, at most [`MAX_DESCRIPTION_CHARS`] characters.
    pub description: String,
    /// Why the trend resonates now.
    pub why_its_hot: String,
    /// Relevance from 1 to 10.
    pub relevance_score: u8,
    /// How soon to act on it.
    pub opportunity_window: OpportunityWindow,
    /// Who the trend speaks to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<String>,
}

impl Trend {
    /// Builds a trend from a user-supplied topic.
    ///
    /// # Errors
    ///
    /// Returns `CONFIG-INVALID-VALUE` unless the trimmed topic is between
    /// [`MIN_TOPIC_CHARS`] and [`MAX_TOPIC_CHARS`] characters long.
    pub fn manual(topic: &str) -> Result<Self, ConfigurationError> {
        let topic = topic.trim();
        let chars = topic.chars().count();
        if !(MIN_TOPIC_CHARS..=MAX_TOPIC_CHARS).contains(&chars) {
            return Err(ConfigurationError::invalid_value(
                "topic",
                format!(
                    "must be {MIN_TOPIC_CHARS} to {MAX_TOPIC_CHARS} characters, got {chars}"
                ),
            ));
        }

        Ok(Self {
            name: crate::utils::truncate_chars(topic, MAX_NAME_CHARS),
            description: format!("Analysis of {topic} and its market relevance."),
            why_its_hot: "Based on current cultural and psychological drivers.".to_string(),
            relevance_score: 7,
            opportunity_window: OpportunityWindow::Growing,
            target_audience: Some("To be determined based on campaign development".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::codes;

    #[test]
    fn test_opportunity_window_wire_values() {
        assert_eq!(serde_json::to_string(&OpportunityWindow::PeakNow).unwrap(), r#""Peak: Now""#);
        assert_eq!(serde_json::to_string(&OpportunityWindow::Growing).unwrap(), r#""Growing""#);
        let early: OpportunityWindow = serde_json::from_str(r#""Early""#).unwrap();
        assert_eq!(early, OpportunityWindow::Early);
        assert_eq!(OpportunityWindow::PeakNow.to_string(), "Peak: Now");
    }

    #[test]
    fn test_trend_wire_field_names() {
        let trend = Trend::manual("Quiet luxury").unwrap();
        let json = serde_json::to_value(&trend).unwrap();

        assert_eq!(json["trend_name"], "Quiet luxury");
        assert_eq!(json["relevance_score"], 7);
        assert_eq!(json["opportunity_window"], "Growing");
        assert!(json.get("why_its_hot").is_some());
        assert!(json.get("target_audience").is_some());
    }

    #[test]
    fn test_manual_rejects_short_topic() {
        let err = Trend::manual("  abc  ").unwrap_err();
        assert_eq!(err.code(), Some(codes::INVALID_VALUE));
    }

    #[test]
    fn test_manual_rejects_long_topic() {
        let topic = "x".repeat(201);
        assert!(Trend::manual(&topic).is_err());
        assert!(Trend::manual(&"x".repeat(200)).is_ok());
    }

    #[test]
    fn test_manual_trims_topic() {
        let trend = Trend::manual("  Slow living  ").unwrap();
        assert_eq!(trend.name, "Slow living");
        assert_eq!(trend.opportunity_window, OpportunityWindow::Growing);
    }
}
