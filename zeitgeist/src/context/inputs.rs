//! Stage inputs with strictness enforcement.

use super::StageEntry;
use crate::errors::UndeclaredDependencyError;
use std::collections::BTreeSet;
use std::fmt::Write as _;

/// Provides an immutable view of prior stage outputs.
///
/// Only declared dependencies are visible; naming any other stage returns
/// `UndeclaredDependencyError`.
#[derive(Debug, Clone, Default)]
pub struct StageInputs {
    /// The name of the current stage (for error messages).
    stage_name: String,
    /// The run's initial input.
    initial_input: String,
    /// The declared dependencies for this stage.
    declared_dependencies: BTreeSet<String>,
    /// Entries of the declared dependencies, in execution order.
    entries: Vec<StageEntry>,
}

impl StageInputs {
    /// Creates new stage inputs.
    #[must_use]
    pub fn new(
        stage_name: impl Into<String>,
        initial_input: impl Into<String>,
        declared_dependencies: BTreeSet<String>,
        entries: Vec<StageEntry>,
    ) -> Self {
        Self {
            stage_name: stage_name.into(),
            initial_input: initial_input.into(),
            declared_dependencies,
            entries,
        }
    }

    /// Returns the run's initial input.
    #[must_use]
    pub fn initial_input(&self) -> &str {
        &self.initial_input
    }

    /// Returns the name of the stage this view belongs to.
    #[must_use]
    pub fn stage_name(&self) -> &str {
        &self.stage_name
    }

    /// Gets the entry of a declared dependency.
    ///
    /// # Errors
    ///
    /// Returns `UndeclaredDependencyError` if the stage is not a declared
    /// dependency.
    pub fn get(&self, stage: &str) -> Result<Option<&StageEntry>, UndeclaredDependencyError> {
        if !self.declared_dependencies.contains(stage) {
            return Err(UndeclaredDependencyError::new(&self.stage_name, stage));
        }
        Ok(self.entries.iter().find(|entry| entry.stage == stage))
    }

    /// Gets the raw text of a declared dependency.
    ///
    /// # Errors
    ///
    /// Returns `UndeclaredDependencyError` if the stage is not a declared
    /// dependency.
    pub fn raw(&self, stage: &str) -> Result<Option<&str>, UndeclaredDependencyError> {
        Ok(self.get(stage)?.map(|entry| entry.raw.as_str()))
    }

    /// Gets the post-processed value of a declared dependency.
    ///
    /// # Errors
    ///
    /// Returns `UndeclaredDependencyError` if the stage is not a declared
    /// dependency.
    pub fn processed(&self, stage: &str) -> Result<Option<&serde_json::Value>, UndeclaredDependencyError> {
        Ok(self.get(stage)?.and_then(|entry| entry.processed.as_ref()))
    }

    /// Returns the declared dependencies.
    #[must_use]
    pub fn declared_dependencies(&self) -> &BTreeSet<String> {
        &self.declared_dependencies
    }

    /// Iterates the visible entries in execution order.
    pub fn iter(&self) -> impl Iterator<Item = &StageEntry> {
        self.entries.iter()
    }

    /// Returns the number of visible entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no dependency output is visible.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renders the visible outputs as labelled sections for a prompt.
    #[must_use]
    pub fn render_dependencies(&self) -> String {
        let mut rendered = String::new();
        for entry in &self.entries {
            if !rendered.is_empty() {
                rendered.push_str("\n\n");
            }
            let _ = write!(rendered, "### {}\n{}", entry.stage, entry.raw.trim());
        }
        rendered
    }
}
