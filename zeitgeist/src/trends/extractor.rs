//! The trend extraction cascade.

use super::signals::{why_its_hot, TextSignals};
use super::{BlockStrategy, OpportunityWindow, Trend, MAX_DESCRIPTION_CHARS, MAX_NAME_CHARS};
use crate::errors::ZeitgeistError;
use crate::stages::PostProcessor;
use crate::utils::truncate_chars;
use tracing::{debug, warn};

/// Most trends kept from one text.
pub const MAX_TRENDS: usize = 5;
/// Lowest relevance score given to an extracted trend.
pub const MIN_EXTRACTED_SCORE: u8 = 6;
/// Relevance score of the first extracted trend.
pub const TOP_EXTRACTED_SCORE: u8 = 10;

const FALLBACK_NAME: &str = "Current Cultural Zeitgeist Analysis";
const FALLBACK_WHY_HOT: &str = "Based on deep analysis of current psychological and cultural drivers";
const FALLBACK_AUDIENCE: &str = "Culturally-aware consumers seeking authentic expression";
const FALLBACK_SCORE: u8 = 8;

/// The result of one extraction, with the strategy that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Extracted trends; never empty.
    pub trends: Vec<Trend>,
    /// The strategy that matched, or `None` when the fallback was used.
    pub strategy: Option<BlockStrategy>,
}

impl Extraction {
    /// Returns true if the synthetic fallback trend was used.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.strategy.is_none()
    }
}

/// Parses free-form text into trend records.
///
/// Strategies are tried in order and the first one that finds any block
/// wins. When none does, a single fallback trend summarising the text is
/// returned, so the result is never empty. Output depends only on the input
/// text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendExtractor {
    strategies: Vec<BlockStrategy>,
}

impl Default for TrendExtractor {
    fn default() -> Self {
        Self {
            strategies: BlockStrategy::DEFAULT_ORDER.to_vec(),
        }
    }
}

impl TrendExtractor {
    /// Creates an extractor with the default strategy order.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the strategy order.
    #[must_use]
    pub fn with_strategies(mut self, strategies: Vec<BlockStrategy>) -> Self {
        self.strategies = strategies;
        self
    }

    /// Returns the strategy order.
    #[must_use]
    pub fn strategies(&self) -> &[BlockStrategy] {
        &self.strategies
    }

    /// Parses `text` into at most [`MAX_TRENDS`] trends.
    #[must_use]
    pub fn parse(&self, text: &str) -> Vec<Trend> {
        self.extract(text).trends
    }

    /// Parses `text` and reports which strategy matched.
    #[must_use]
    pub fn extract(&self, text: &str) -> Extraction {
        let found = self
            .strategies
            .iter()
            .find_map(|strategy| strategy.extract(text).map(|blocks| (*strategy, blocks)));

        let Some((strategy, blocks)) = found else {
            warn!(text_chars = text.chars().count(), "No trend blocks found, using fallback trend");
            return Extraction {
                trends: vec![fallback_trend(text)],
                strategy: None,
            };
        };

        debug!(strategy = %strategy, blocks = blocks.len(), "Trend blocks found");

        let signals = TextSignals::scan(text);
        let trends = blocks
            .into_iter()
            .take(MAX_TRENDS)
            .enumerate()
            .map(|(index, block)| Trend {
                name: truncate_chars(&block.name, MAX_NAME_CHARS),
                description: truncate_chars(&block.description, MAX_DESCRIPTION_CHARS),
                why_its_hot: why_its_hot(text, &block.name),
                relevance_score: score_for(index),
                opportunity_window: signals.opportunity_window(index),
                target_audience: Some(signals.audience_or_default()),
            })
            .collect();

        Extraction {
            trends,
            strategy: Some(strategy),
        }
    }
}

impl PostProcessor for TrendExtractor {
    fn process(&self, raw: &str) -> Result<serde_json::Value, ZeitgeistError> {
        Ok(serde_json::to_value(self.parse(raw))?)
    }
}

/// Parses `text` with the default extractor.
#[must_use]
pub fn parse_trends(text: &str) -> Vec<Trend> {
    TrendExtractor::default().parse(text)
}

fn score_for(index: usize) -> u8 {
    let drop = u8::try_from(index).unwrap_or(u8::MAX);
    TOP_EXTRACTED_SCORE
        .saturating_sub(drop)
        .max(MIN_EXTRACTED_SCORE)
}

fn fallback_trend(text: &str) -> Trend {
    Trend {
        name: FALLBACK_NAME.to_string(),
        description: truncate_chars(text, MAX_DESCRIPTION_CHARS),
        why_its_hot: FALLBACK_WHY_HOT.to_string(),
        relevance_score: FALLBACK_SCORE,
        opportunity_window: OpportunityWindow::Growing,
        target_audience: Some(FALLBACK_AUDIENCE.to_string()),
    }
}
