//! Static checks on a stage list, run before any stage executes.

use crate::errors::{codes, ConfigurationError, ContractErrorInfo};
use crate::stages::Stage;
use std::collections::HashMap;

/// Checks that `stages` can be run in order.
///
/// # Errors
///
/// Returns a [`ConfigurationError`] when the list is empty, two stages
/// share a name, or a stage depends on itself, on a later stage, or on a
/// stage that is not in the list.
pub fn validate_stages(stages: &[Stage]) -> Result<(), ConfigurationError> {
    if stages.is_empty() {
        return Err(ConfigurationError::new("Pipeline has no stages").with_error_info(
            ContractErrorInfo::new(codes::EMPTY, "Cannot run an empty pipeline")
                .with_fix_hint("Add at least one stage to the pipeline before running it."),
        ));
    }

    let mut positions: HashMap<&str, usize> = HashMap::with_capacity(stages.len());
    for (index, stage) in stages.iter().enumerate() {
        if positions.insert(stage.name(), index).is_some() {
            return Err(ConfigurationError::new(format!(
                "Stage '{}' is defined more than once",
                stage.name()
            ))
            .with_stages(vec![stage.name().to_string()])
            .with_error_info(
                ContractErrorInfo::new(
                    codes::DUPLICATE_STAGE,
                    format!("Duplicate stage name '{}'", stage.name()),
                )
                .with_fix_hint("Give every stage in the pipeline a unique name."),
            ));
        }
    }

    for (index, stage) in stages.iter().enumerate() {
        for dep in stage.dependencies() {
            if dep == stage.name() {
                return Err(ConfigurationError::new(format!(
                    "Stage '{dep}' depends on itself"
                ))
                .with_stages(vec![dep.clone()])
                .with_error_info(
                    ContractErrorInfo::new(codes::SELF_DEP, format!("Self-dependency on '{dep}'"))
                        .with_fix_hint("Remove the stage from its own dependency list."),
                ));
            }

            match positions.get(dep.as_str()) {
                None => {
                    return Err(ConfigurationError::new(format!(
                        "Stage '{}' depends on '{dep}' which is not in the pipeline",
                        stage.name()
                    ))
                    .with_stages(vec![stage.name().to_string(), dep.clone()])
                    .with_error_info(
                        ContractErrorInfo::new(
                            codes::MISSING_DEP,
                            format!("Dependency '{dep}' not found"),
                        )
                        .with_fix_hint(
                            "Add the dependency as an earlier stage or drop it from depends_on.",
                        ),
                    ));
                }
                Some(&position) if position > index => {
                    return Err(ConfigurationError::new(format!(
                        "Stage '{}' depends on '{dep}' which runs after it",
                        stage.name()
                    ))
                    .with_stages(vec![stage.name().to_string(), dep.clone()])
                    .with_error_info(
                        ContractErrorInfo::new(
                            codes::FORWARD_DEP,
                            format!("Dependency '{dep}' runs later"),
                        )
                        .with_context_entry("stage_index", index.to_string())
                        .with_context_entry("dependency_index", position.to_string())
                        .with_fix_hint("Move the dependency before the stage that reads it."),
                    ));
                }
                Some(_) => {}
            }
        }
    }

    Ok(())
}
