//! Block detection strategies.
//!
//! Each strategy scans the text line by line for a marker line that opens a
//! block. The marker line carries the trend name (or, when it carries
//! nothing, the next non-blank line does). The lines after it, up to the
//! next boundary line, form the description. Blank lines are skipped and a
//! block without any description line is discarded.

use crate::utils::clean_heading;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// `Trend: X`, `**Trend 2 - X**`, `## TREND #3. X` and a bare `Trend 1`.
/// The label must be followed by an ordinal, a separator or the end of the
/// line, so "trending", "trends" and headings like "Trend Report" do not
/// open a block.
static LABELED_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:[#>*\-]+\s*)*trend\s*(?:#?\d{1,2}\b\s*[:.\-)]?|[:.\-)]|$)\s*(.*)$")
        .expect("valid regex")
});

/// `1. X`, `2) X`, `### 3. X`. One or two digits followed by whitespace, so
/// `2.5 million` and `2024.` are not markers.
static NUMBERED_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[#>*]+\s*)*\d{1,2}[.)](?:\s+(.*))?$").expect("valid regex")
});

/// A name and description pair found by a strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendBlock {
    /// Cleaned name line.
    pub name: String,
    /// Description lines joined with `\n`.
    pub description: String,
}

/// A way of finding trend blocks in text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockStrategy {
    /// Blocks opened by an explicit "trend" label.
    LabeledBlocks,
    /// Blocks opened by an ordinal marker.
    NumberedList,
}

impl fmt::Display for BlockStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LabeledBlocks => write!(f, "labeled_blocks"),
            Self::NumberedList => write!(f, "numbered_list"),
        }
    }
}

impl BlockStrategy {
    /// Strategies in the order they are tried.
    pub const DEFAULT_ORDER: [Self; 2] = [Self::LabeledBlocks, Self::NumberedList];

    /// Finds blocks in `text`, or `None` when the strategy finds nothing.
    #[must_use]
    pub fn extract(self, text: &str) -> Option<Vec<TrendBlock>> {
        let blocks = match self {
            Self::LabeledBlocks => scan_blocks(text, &LABELED_MARKER, &[&LABELED_MARKER, &NUMBERED_MARKER]),
            Self::NumberedList => scan_blocks(text, &NUMBERED_MARKER, &[&NUMBERED_MARKER]),
        };
        (!blocks.is_empty()).then_some(blocks)
    }
}

fn scan_blocks(text: &str, marker: &Regex, boundaries: &[&Regex]) -> Vec<TrendBlock> {
    let lines: Vec<&str> = text.lines().collect();
    let is_boundary = |line: &str| boundaries.iter().any(|re| re.is_match(line));

    let mut blocks = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        let Some(caps) = marker.captures(lines[i]) else {
            i += 1;
            continue;
        };
        i += 1;

        let mut name = clean_heading(caps.get(1).map_or("", |m| m.as_str()));
        if name.is_empty() {
            while i < lines.len() && lines[i].trim().is_empty() {
                i += 1;
            }
            if i < lines.len() && !is_boundary(lines[i]) {
                name = clean_heading(lines[i]);
                i += 1;
            }
        }

        let mut description = Vec::new();
        while i < lines.len() && !is_boundary(lines[i]) {
            let line = lines[i].trim();
            if !line.is_empty() {
                description.push(line);
            }
            i += 1;
        }

        if !name.is_empty() && !description.is_empty() {
            blocks.push(TrendBlock {
                name,
                description: description.join("\n"),
            });
        }
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labeled_blocks() {
        let text = "Intro line\n\nTrend 1: Quiet Luxury\nUnderstated wealth.\nNo logos.\n\nTrend 2: Slow Living\nDeliberate pace.";
        let blocks = BlockStrategy::LabeledBlocks.extract(text).unwrap();

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].name, "Quiet Luxury");
        assert_eq!(blocks[0].description, "Understated wealth.\nNo logos.");
        assert_eq!(blocks[1].name, "Slow Living");
    }

    #[test]
    fn test_labeled_markdown_variants() {
        let text = "**TREND #1 - Dopamine Decor**\nBright rooms.\n## Trend: Micro Retirement\nBreaks between jobs.";
        let blocks = BlockStrategy::LabeledBlocks.extract(text).unwrap();

        let names: Vec<_> = blocks.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Dopamine Decor", "Micro Retirement"]);
    }

    #[test]
    fn test_labeled_name_on_next_line() {
        let text = "Trend 1:\n\n**Analog Revival**\nFilm cameras are back.";
        let blocks = BlockStrategy::LabeledBlocks.extract(text).unwrap();

        assert_eq!(blocks[0].name, "Analog Revival");
        assert_eq!(blocks[0].description, "Film cameras are back.");
    }

    #[test]
    fn test_heading_without_separator_is_not_a_label() {
        assert!(BlockStrategy::LabeledBlocks
            .extract("Trend Report for Acme\nHere is my analysis.")
            .is_none());
        assert!(BlockStrategy::LabeledBlocks
            .extract("Trend\nQuiet Luxury\nUnderstated wealth.")
            .is_some());
    }

    #[test]
    fn test_trending_is_not_a_label() {
        assert!(BlockStrategy::LabeledBlocks
            .extract("Trending now\nEverything is viral.\nTrends matter.\nYes.")
            .is_none());
    }

    #[test]
    fn test_labeled_block_stops_at_numbered_line() {
        let text = "Trend: Quiet Luxury\nUnderstated wealth.\n1. Unrelated list item\nMore detail.";
        let blocks = BlockStrategy::LabeledBlocks.extract(text).unwrap();

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].description, "Understated wealth.");
    }

    #[test]
    fn test_numbered_list() {
        let text = "1. AI Personalization\nConsumers want tailored experiences.\n2) Analog Nostalgia\nFilm and vinyl.";
        let blocks = BlockStrategy::NumberedList.extract(text).unwrap();

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1].name, "Analog Nostalgia");
    }

    #[test]
    fn test_numbered_ignores_decimals_and_years() {
        let text = "1. Creator Economy\n2.5 million creators joined.\n2024. was a big year.";
        let blocks = BlockStrategy::NumberedList.extract(text).unwrap();

        assert_eq!(blocks.len(), 1);
        assert_eq!(
            blocks[0].description,
            "2.5 million creators joined.\n2024. was a big year."
        );
    }

    #[test]
    fn test_block_without_description_is_dropped() {
        let text = "1. Lonely Name\n2. Second\nHas a description.";
        let blocks = BlockStrategy::NumberedList.extract(text).unwrap();

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].name, "Second");
    }

    #[test]
    fn test_nothing_found() {
        assert!(BlockStrategy::NumberedList.extract("").is_none());
        assert!(BlockStrategy::LabeledBlocks.extract("plain prose only").is_none());
    }

    #[test]
    fn test_default_order() {
        assert_eq!(
            BlockStrategy::DEFAULT_ORDER,
            [BlockStrategy::LabeledBlocks, BlockStrategy::NumberedList]
        );
        assert_eq!(BlockStrategy::NumberedList.to_string(), "numbered_list");
    }
}
