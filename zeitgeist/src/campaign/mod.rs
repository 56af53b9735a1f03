//! The four-stage campaign pipeline and single-stage trend discovery.
//!
//! | # | Stage | Agent | Sees |
//! |---|-------|-------|------|
//! | 1 | `trend_analysis` | Zeitgeist Philosopher | brief |
//! | 2 | `content` | Cynical Content Architect | brief, `trend_analysis` |
//! | 3 | `optimization` | Brutalist Optimizer | `content` |
//! | 4 | `final_content` | Final Content Polish | brief, all three |

mod brief;
mod discovery;
pub mod prompts;

pub use brief::{CampaignBrief, CampaignMetadata, CampaignOutput, NARRATIVE_CHARS};
pub use discovery::{CompanyProfile, TrendDiscovery, TrendReport};

use crate::stages::Stage;
use crate::trends::TrendExtractor;

/// Name of the trend analysis stage.
pub const TREND_ANALYSIS_STAGE: &str = "trend_analysis";
/// Name of the first content draft stage.
pub const CONTENT_STAGE: &str = "content";
/// Name of the optimization stage.
pub const OPTIMIZATION_STAGE: &str = "optimization";
/// Name of the final polish stage.
pub const FINAL_CONTENT_STAGE: &str = "final_content";

/// Agent label of pipeline-level campaign events.
pub const CAMPAIGN_LABEL: &str = "Campaign Pipeline";

/// Human-readable chain of campaign agents.
pub const PIPELINE_DESCRIPTION: &str = "Philosopher → Architect → Optimizer → Architect";

/// Builds the campaign stages.
#[must_use]
pub fn campaign_pipeline() -> Vec<Stage> {
    vec![
        trend_analysis_stage(),
        Stage::new(CONTENT_STAGE, prompts::content_prompt)
            .with_agent_label("Cynical Content Architect")
            .with_working_message("Creating viral content and compelling narratives...")
            .depends_on([TREND_ANALYSIS_STAGE]),
        Stage::new(OPTIMIZATION_STAGE, prompts::optimization_prompt)
            .with_agent_label("Brutalist Optimizer")
            .with_working_message("Optimizing for SEO and conversion metrics...")
            .depends_on([CONTENT_STAGE]),
        Stage::new(FINAL_CONTENT_STAGE, prompts::final_content_prompt)
            .with_agent_label("Final Content Polish")
            .with_working_message("Architect creating final optimized campaign...")
            .depends_on([TREND_ANALYSIS_STAGE, CONTENT_STAGE, OPTIMIZATION_STAGE]),
    ]
}

/// The trend analysis stage, with [`TrendExtractor`] as its post-processor.
#[must_use]
pub fn trend_analysis_stage() -> Stage {
    Stage::new(TREND_ANALYSIS_STAGE, prompts::trend_analysis_prompt)
        .with_agent_label("Zeitgeist Philosopher")
        .with_working_message("Analyzing cultural drivers and psychological truths...")
        .with_post_processor(TrendExtractor::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::CollectingProgressSink;
    use crate::pipeline::{validate_stages, PipelineOrchestrator};
    use crate::testing::{assert_steps_sequential, ScriptedGateway};
    use std::sync::Arc;

    #[test]
    fn test_campaign_pipeline_shape() {
        let stages = campaign_pipeline();
        assert!(validate_stages(&stages).is_ok());

        let names: Vec<_> = stages.iter().map(Stage::name).collect();
        assert_eq!(
            names,
            vec![TREND_ANALYSIS_STAGE, CONTENT_STAGE, OPTIMIZATION_STAGE, FINAL_CONTENT_STAGE]
        );
        assert!(stages[0].has_post_processor());
        assert!(stages[0].dependencies().is_empty());
        assert_eq!(stages[2].dependencies().len(), 1);
        assert_eq!(stages[3].dependencies().len(), 3);
        assert_eq!(stages[3].agent_label(), "Final Content Polish");
    }

    #[tokio::test]
    async fn test_campaign_end_to_end() {
        let gateway = Arc::new(
            ScriptedGateway::new()
                .with_response("Trend 1: Quiet Luxury\nUnderstated wealth is growing.")
                .with_response("DRAFT")
                .with_response("AUDIT")
                .with_response("FINAL CAMPAIGN"),
        );
        let brief = CampaignBrief::new("Acme", "Shirts", "edgy", "Quiet Luxury", "Calm");
        let sink = Arc::new(CollectingProgressSink::new());

        let result = PipelineOrchestrator::new(gateway.clone())
            .with_label(CAMPAIGN_LABEL)
            .run(&campaign_pipeline(), &brief.render(), sink.clone())
            .await
            .unwrap()
            .into_result()
            .unwrap();
        let output = CampaignOutput::from_result(&brief, &result);

        assert_eq!(output.full_output, "FINAL CAMPAIGN");
        assert_eq!(output.trends[0].name, "Quiet Luxury");
        assert_eq!(output.intermediary_outputs.len(), 4);
        assert_eq!(output.intermediary_outputs["2_content"], "DRAFT");

        let prompts = gateway.prompts();
        assert!(prompts[2].contains("DRAFT"));
        assert!(!prompts[2].contains("Understated wealth"));
        assert!(prompts[3].contains("AUDIT") && prompts[3].contains("Understated wealth"));

        let events = sink.events();
        assert_eq!(events.len(), 10);
        assert_steps_sequential(&events);
        assert_eq!(events[1].agent_label, "Zeitgeist Philosopher");
    }
}
