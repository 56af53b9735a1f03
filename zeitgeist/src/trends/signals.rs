//! Keyword tables and the attribute rules built on them.
//!
//! Every table here is ordered and the order is part of the contract:
//! earlier entries win.

use super::{OpportunityWindow, MAX_WHY_HOT_CHARS};
use crate::utils::truncate_chars;
use regex::Regex;
use std::sync::LazyLock;

/// Whole-text vocabulary that marks a trend as peaking now.
pub const URGENCY_TERMS: &[&str] = &["peak", "now", "urgent", "immediate", "viral", "trending"];

/// Whole-text vocabulary that marks a trend as still growing.
pub const GROWTH_TERMS: &[&str] = &["growing", "emerging", "rising", "gaining"];

/// Words that introduce an explanation of why a trend resonates.
pub const CAUSAL_TERMS: &[&str] = &["psychological", "driver", "because", "truth", "need"];

/// Words that introduce an audience description.
pub const AUDIENCE_CUES: &[&str] = &["target", "audience", "demographic"];

/// Audiences recognised shortly after an [`AUDIENCE_CUES`] word.
pub const CUED_AUDIENCES: &[&str] = &["Gen Z", "Millennials", "consumers", "users"];

/// Audiences recognised anywhere in the text.
pub const STANDALONE_AUDIENCES: &[&str] = &["Gen Z", "Millennials", "young professionals", "students"];

/// Used when no audience is mentioned.
pub const DEFAULT_AUDIENCE: &str = "Trend-conscious consumers";

/// Used when no causal explanation follows the trend name.
pub const GENERIC_WHY_HOT: &str = "Reflects current psychological and cultural drivers";

/// Used when a causal explanation was found but its last sentence is empty.
pub const EMPTY_WHY_HOT: &str = "Driven by current cultural and psychological factors";

/// Characters searched after the trend name for a causal word.
const CAUSAL_LOOKAHEAD_CHARS: usize = 300;

/// Characters kept after the causal word.
const CAUSAL_TRAIL_CHARS: usize = 200;

/// Characters allowed between an audience cue and the audience.
const AUDIENCE_CUE_GAP_CHARS: usize = 100;

/// The evidence that decides a trend's opportunity window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowSignal {
    /// Any [`URGENCY_TERMS`] word in the text.
    Urgency,
    /// Any [`GROWTH_TERMS`] word in the text.
    Growth,
    /// The trend's position: first is peaking, the rest are growing.
    Position,
}

/// Order in which window signals are consulted.
pub const OPPORTUNITY_PRECEDENCE: [WindowSignal; 3] =
    [WindowSignal::Urgency, WindowSignal::Growth, WindowSignal::Position];

fn alternation(terms: &[&str]) -> String {
    terms
        .iter()
        .map(|term| regex::escape(term))
        .collect::<Vec<_>>()
        .join("|")
}

/// Terms anchor at a word start only: "peaking" counts as "peak", while
/// "knowledge" does not count as "now".
static URGENCY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\b(?:{})", alternation(URGENCY_TERMS))).expect("valid regex")
});

static GROWTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\b(?:{})", alternation(GROWTH_TERMS))).expect("valid regex")
});

static CUED_AUDIENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?:{}).{{0,{AUDIENCE_CUE_GAP_CHARS}}}?\b({}|people aged \d+-\d+)",
        alternation(AUDIENCE_CUES),
        alternation(CUED_AUDIENCES),
    ))
    .expect("valid regex")
});

static STANDALONE_AUDIENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\b({})", alternation(STANDALONE_AUDIENCES))).expect("valid regex")
});

/// Whole-text facts computed once per extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSignals {
    /// The text mentions urgency vocabulary.
    pub urgent: bool,
    /// The text mentions growth vocabulary.
    pub growing: bool,
    /// The first audience mention, if any.
    pub audience: Option<String>,
}

impl TextSignals {
    /// Scans `text` once.
    #[must_use]
    pub fn scan(text: &str) -> Self {
        Self {
            urgent: URGENCY.is_match(text),
            growing: GROWTH.is_match(text),
            audience: find_audience(text),
        }
    }

    /// Decides the opportunity window for the trend at `index`.
    #[must_use]
    pub fn opportunity_window(&self, index: usize) -> OpportunityWindow {
        OPPORTUNITY_PRECEDENCE
            .iter()
            .find_map(|signal| match signal {
                WindowSignal::Urgency => self.urgent.then_some(OpportunityWindow::PeakNow),
                WindowSignal::Growth => self.growing.then_some(OpportunityWindow::Growing),
                WindowSignal::Position => Some(if index == 0 {
                    OpportunityWindow::PeakNow
                } else {
                    OpportunityWindow::Growing
                }),
            })
            .unwrap_or(OpportunityWindow::Growing)
    }

    /// Returns the audience mention, or [`DEFAULT_AUDIENCE`].
    #[must_use]
    pub fn audience_or_default(&self) -> String {
        self.audience
            .clone()
            .unwrap_or_else(|| DEFAULT_AUDIENCE.to_string())
    }
}

fn find_audience(text: &str) -> Option<String> {
    [&*CUED_AUDIENCE, &*STANDALONE_AUDIENCE]
        .iter()
        .find_map(|re| re.captures(text))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// Explains why the trend called `name` is hot.
///
/// Looks for a [`CAUSAL_TERMS`] word within a bounded window after the
/// first occurrence of `name`. On a hit, the last sentence of the window is
/// returned, capped at [`MAX_WHY_HOT_CHARS`] characters.
#[must_use]
pub fn why_its_hot(text: &str, name: &str) -> String {
    if name.is_empty() {
        return GENERIC_WHY_HOT.to_string();
    }

    let pattern = format!(
        r"(?is){}.{{0,{CAUSAL_LOOKAHEAD_CHARS}}}?\b(?:{}).{{0,{CAUSAL_TRAIL_CHARS}}}",
        regex::escape(name),
        alternation(CAUSAL_TERMS),
    );
    let Ok(re) = Regex::new(&pattern) else {
        return GENERIC_WHY_HOT.to_string();
    };

    match re.find(text) {
        Some(window) => {
            let last_sentence = window.as_str().rsplit('.').next().unwrap_or_default().trim();
            if last_sentence.is_empty() {
                EMPTY_WHY_HOT.to_string()
            } else {
                truncate_chars(last_sentence, MAX_WHY_HOT_CHARS)
            }
        }
        None => GENERIC_WHY_HOT.to_string(),
    }
}
