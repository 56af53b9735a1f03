//! Persona instructions and prompt builders for the campaign stages.

use crate::context::StageInputs;
use crate::stages::GenerationRequest;

/// Persona of the trend analysis stage.
pub const PHILOSOPHER_INSTRUCTIONS: &str = "\
You are the Zeitgeist Philosopher, a cultural analyst who reasons from first principles. \
Look past surface-level trend observations to the timeless emotional drivers underneath them \
and turn those into concrete marketing insight.";

/// Persona of the content and final polish stages.
pub const ARCHITECT_INSTRUCTIONS: &str = "\
You are the Cynical Content Architect, a creative director and multi-platform writer. \
Turn cultural insight into content people share because it is uncomfortably true. \
Favour clever visual ideas over plain references.";

/// Persona of the optimization stage.
pub const OPTIMIZER_INSTRUCTIONS: &str = "\
You are the Brutalist Optimizer, a technical SEO and conversion analyst. \
Treat content as a system to debug: measure, find the weak points, and give specific \
recommendations with their expected impact.";

/// Prompt of the trend analysis stage.
#[must_use]
pub fn trend_analysis_prompt(inputs: &StageInputs) -> GenerationRequest {
    GenerationRequest::new(format!(
        "Analyze the following brief and the cultural moment around it.\n\n\
{brief}\n\n\
Your analysis must:\n\
1. Identify 3-5 current trends or cultural movements relevant to the brief\n\
2. Find the psychological drivers behind each trend\n\
3. Connect those drivers to consumer behaviour and name the audience most affected\n\
4. Say whether each trend is peaking now, growing, or early\n\
5. Finish with the top opportunities ranked by potential\n\n\
Present each trend as a block starting with a line `Trend N: <name>`, followed by \
its description on the next lines.",
        brief = inputs.initial_input().trim(),
    ))
    .with_system_instructions(PHILOSOPHER_INSTRUCTIONS)
}

/// Prompt of the first content draft.
#[must_use]
pub fn content_prompt(inputs: &StageInputs) -> GenerationRequest {
    GenerationRequest::new(format!(
        "Using the trend analysis below, create multi-platform marketing content for this brief.\n\n\
Brief:\n{brief}\n\n\
Previous work:\n{previous}\n\n\
Produce:\n\
1. T-SHIRT CONCEPTS: 10 front-print visual designs, each with a target audience\n\
2. SOCIAL MEDIA: 5 posts for X, 3 Instagram captions with hashtags, 2 TikTok concepts\n\
3. BLOG POST: an SEO title of 50-60 characters, an opening hook, a full outline with \
headers, and a meta description of 150-155 characters",
        brief = inputs.initial_input().trim(),
        previous = inputs.render_dependencies(),
    ))
    .with_system_instructions(ARCHITECT_INSTRUCTIONS)
}

/// Prompt of the optimization review.
#[must_use]
pub fn optimization_prompt(inputs: &StageInputs) -> GenerationRequest {
    GenerationRequest::new(format!(
        "Audit and optimize the marketing content below for search visibility and conversion.\n\n\
{previous}\n\n\
Cover:\n\
1. TECHNICAL SEO: title tags, meta descriptions, header hierarchy, keywords\n\
2. CONVERSION: CTA placement, psychological triggers, urgency and social proof\n\
3. PERFORMANCE: expected CTR and conversion estimates\n\
4. PRIORITY ACTIONS: the three most impactful changes with their expected impact",
        previous = inputs.render_dependencies(),
    ))
    .with_system_instructions(OPTIMIZER_INSTRUCTIONS)
}

/// Prompt of the final polished campaign.
#[must_use]
pub fn final_content_prompt(inputs: &StageInputs) -> GenerationRequest {
    GenerationRequest::new(format!(
        "Create the final, optimized campaign for this brief. Fold in the trend insights, \
the first content draft and every optimization recommendation below.\n\n\
Brief:\n{brief}\n\n\
Previous work:\n{previous}\n\n\
Deliver the finished T-shirt designs, social media content and a complete SEO-optimized \
blog post, ready to publish.",
        brief = inputs.initial_input().trim(),
        previous = inputs.render_dependencies(),
    ))
    .with_system_instructions(ARCHITECT_INSTRUCTIONS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::StageContext;
    use std::collections::BTreeSet;

    fn deps(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|n| (*n).to_string()).collect()
    }

    #[test]
    fn test_trend_analysis_prompt_carries_brief() {
        let ctx = StageContext::new("Company: Acme");
        let request = trend_analysis_prompt(&ctx.view_for("trend_analysis", &deps(&[])));

        assert!(request.prompt.contains("Company: Acme"));
        assert!(request.prompt.contains("Trend N: <name>"));
        assert_eq!(request.system_instructions, PHILOSOPHER_INSTRUCTIONS);
    }

    #[test]
    fn test_optimization_prompt_uses_only_the_draft() {
        let mut ctx = StageContext::new("Company: Acme");
        ctx.insert("trend_analysis", 0, "ANALYSIS", None).unwrap();
        ctx.insert("content", 1, "DRAFT", None).unwrap();

        let request = optimization_prompt(&ctx.view_for("optimization", &deps(&["content"])));

        assert!(request.prompt.contains("### content\nDRAFT"));
        assert!(!request.prompt.contains("ANALYSIS"));
        assert!(!request.prompt.contains("Acme"));
        assert_eq!(request.system_instructions, OPTIMIZER_INSTRUCTIONS);
    }
}
