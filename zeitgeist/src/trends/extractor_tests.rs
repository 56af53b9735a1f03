//! Behavioural tests for trend extraction.

#[cfg(test)]
mod tests {
    use crate::trends::{
        parse_trends, BlockStrategy, OpportunityWindow, TrendExtractor, MAX_DESCRIPTION_CHARS,
        MAX_NAME_CHARS,
    };
    use pretty_assertions::assert_eq;

    const TWO_NUMBERED: &str = "1. AI Personalization\nConsumers want tailored, automated experiences.\n2. Analog Nostalgia\nYoung users are returning to film and vinyl.";

    fn assert_invariants(text: &str) {
        let trends = parse_trends(text);
        assert!(!trends.is_empty(), "no trends for {text:?}");
        assert!(trends.len() <= 5);
        for trend in &trends {
            assert!(trend.name.chars().count() <= MAX_NAME_CHARS);
            assert!(trend.description.chars().count() <= MAX_DESCRIPTION_CHARS);
            assert!((1..=10).contains(&trend.relevance_score));
        }
    }

    #[test]
    fn test_numbered_scenario() {
        let trends = parse_trends(TWO_NUMBERED);

        assert_eq!(trends.len(), 2);
        assert_eq!(trends[0].name, "AI Personalization");
        assert_eq!(trends[1].name, "Analog Nostalgia");
        assert_eq!(trends[0].relevance_score, 10);
        assert_eq!(trends[1].relevance_score, 9);
        assert_eq!(trends[0].opportunity_window, OpportunityWindow::PeakNow);
        assert_eq!(trends[1].opportunity_window, OpportunityWindow::Growing);
        assert_eq!(
            trends[0].description,
            "Consumers want tailored, automated experiences."
        );
    }

    #[test]
    fn test_urgency_vocabulary_applies_to_every_trend() {
        let text = format!("{TWO_NUMBERED}\ntrending now");
        let trends = parse_trends(&text);

        assert_eq!(trends.len(), 2);
        assert!(trends
            .iter()
            .all(|t| t.opportunity_window == OpportunityWindow::PeakNow));
    }

    #[test]
    fn test_inflected_urgency_word_applies_to_every_trend() {
        let text = format!("{TWO_NUMBERED} This is peaking.");
        let trends = parse_trends(&text);

        let windows: Vec<_> = trends.iter().map(|t| t.opportunity_window).collect();
        assert_eq!(windows, vec![OpportunityWindow::PeakNow, OpportunityWindow::PeakNow]);
    }

    #[test]
    fn test_trend_heading_does_not_hide_numbered_list() {
        let text = format!("Trend Report for Acme\nHere is my analysis.\n\n{TWO_NUMBERED}");
        let extraction = TrendExtractor::new().extract(&text);

        assert_eq!(extraction.strategy, Some(BlockStrategy::NumberedList));
        let names: Vec<_> = extraction.trends.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["AI Personalization", "Analog Nostalgia"]);
    }

    #[test]
    fn test_empty_text_yields_single_fallback() {
        let trends = parse_trends("");

        assert_eq!(trends.len(), 1);
        assert_eq!(trends[0].description, "");
        assert_eq!(trends[0].relevance_score, 8);
        assert_eq!(trends[0].opportunity_window, OpportunityWindow::Growing);
        assert!(trends[0].target_audience.is_some());
    }

    #[test]
    fn test_fallback_description_is_bounded() {
        let text = "word ".repeat(300);
        let trends = parse_trends(&text);

        assert_eq!(trends.len(), 1);
        assert_eq!(trends[0].description.chars().count(), MAX_DESCRIPTION_CHARS);
    }

    #[test]
    fn test_labeled_strategy_wins_over_numbered() {
        let text = "TREND 1: Quiet Luxury\nUnderstated wealth.\n\nSome notes:\n1. Not a trend\nJust a list item.";
        let extraction = TrendExtractor::new().extract(text);

        assert_eq!(extraction.strategy, Some(BlockStrategy::LabeledBlocks));
        assert_eq!(extraction.trends.len(), 1);
        assert_eq!(extraction.trends[0].name, "Quiet Luxury");
    }

    #[test]
    fn test_at_most_five_with_descending_scores() {
        let text: String = (1..=7)
            .map(|i| format!("{i}. Trend Number {i}\nDescription {i}.\n"))
            .collect();
        let trends = parse_trends(&text);

        let scores: Vec<u8> = trends.iter().map(|t| t.relevance_score).collect();
        assert_eq!(scores, vec![10, 9, 8, 7, 6]);
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_long_fields_are_truncated() {
        let name = "N".repeat(250);
        let description = "d".repeat(900);
        let text = format!("Trend: {name}\n{description}");
        let trends = parse_trends(&text);

        assert_eq!(trends[0].name.chars().count(), MAX_NAME_CHARS);
        assert_eq!(trends[0].description.chars().count(), MAX_DESCRIPTION_CHARS);
    }

    #[test]
    fn test_multibyte_truncation_stays_on_char_boundaries() {
        let text = format!("1. {}\n{}", "é".repeat(150), "ü".repeat(700));
        let trends = parse_trends(&text);

        assert_eq!(trends[0].name.chars().count(), MAX_NAME_CHARS);
        assert_eq!(trends[0].description.chars().count(), MAX_DESCRIPTION_CHARS);
    }

    #[test]
    fn test_why_its_hot_and_audience() {
        let text = "Trend 1: Quiet Luxury\nUnderstated wealth signals taste.\nThe driver is status anxiety among Millennials";
        let trends = parse_trends(text);

        assert_eq!(
            trends[0].why_its_hot,
            "The driver is status anxiety among Millennials"
        );
        assert_eq!(trends[0].target_audience.as_deref(), Some("Millennials"));
    }

    #[test]
    fn test_markdown_output_from_a_model() {
        let text = "\
## Cultural analysis

Here are the trends shaping the moment:

### 1. **Dopamine Dressing**

Bold colours as mood management.
Growing on social feeds.

### 2. **Micro-Retirement**

Workers take deliberate breaks between jobs.
";
        let extraction = TrendExtractor::new().extract(text);

        assert_eq!(extraction.strategy, Some(BlockStrategy::NumberedList));
        let names: Vec<_> = extraction.trends.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Dopamine Dressing", "Micro-Retirement"]);
        assert!(extraction
            .trends
            .iter()
            .all(|t| t.opportunity_window == OpportunityWindow::Growing));
    }

    #[test]
    fn test_parse_is_deterministic() {
        let first = serde_json::to_string(&parse_trends(TWO_NUMBERED)).unwrap();
        let second = serde_json::to_string(&parse_trends(TWO_NUMBERED)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_invariants_hold_for_assorted_inputs() {
        for text in [
            "",
            "   \n\n  ",
            "just one line",
            "1.",
            "Trend:",
            "Trend:\n\n",
            TWO_NUMBERED,
            "1. a\nb\n2. c\nd\n3. e\nf\n4. g\nh\n5. i\nj\n6. k\nl",
            "TREND TREND TREND\ntrend\ntrend",
        ] {
            assert_invariants(text);
        }
    }
}
