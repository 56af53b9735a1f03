//! Append-only store of stage outputs.

use super::StageInputs;
use crate::errors::OutputConflictError;
use crate::utils::{now_utc, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The stored output of one completed stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageEntry {
    /// The stage name.
    pub stage: String,
    /// Zero-based position of the stage in the pipeline.
    pub index: usize,
    /// Raw text returned by the model.
    pub raw: String,
    /// Post-processed value, if the stage declares a post-processor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed: Option<serde_json::Value>,
    /// When the entry was written.
    pub completed_at: Timestamp,
}

/// Accumulates outputs from completed stages.
///
/// Entries are kept in execution order. Each stage name may be written once;
/// a second write is rejected with `OutputConflictError` and leaves the
/// existing entry untouched.
#[derive(Debug, Clone, Default)]
pub struct StageContext {
    initial_input: String,
    entries: Vec<StageEntry>,
}

impl StageContext {
    /// Creates an empty context around the run's initial input.
    #[must_use]
    pub fn new(initial_input: impl Into<String>) -> Self {
        Self {
            initial_input: initial_input.into(),
            entries: Vec::new(),
        }
    }

    /// Returns the run's initial input.
    #[must_use]
    pub fn initial_input(&self) -> &str {
        &self.initial_input
    }

    /// Stores the output of a completed stage.
    ///
    /// # Errors
    ///
    /// Returns `OutputConflictError` if the stage already has an entry.
    pub fn insert(
        &mut self,
        stage: impl Into<String>,
        index: usize,
        raw: impl Into<String>,
        processed: Option<serde_json::Value>,
    ) -> Result<(), OutputConflictError> {
        let stage = stage.into();
        if self.contains(&stage) {
            return Err(OutputConflictError::new(
                &stage,
                "stage output already recorded",
            ));
        }

        self.entries.push(StageEntry {
            stage,
            index,
            raw: raw.into(),
            processed,
            completed_at: now_utc(),
        });
        Ok(())
    }

    /// Gets the entry for a stage.
    #[must_use]
    pub fn get(&self, stage: &str) -> Option<&StageEntry> {
        self.entries.iter().find(|entry| entry.stage == stage)
    }

    /// Checks if a stage has an entry.
    #[must_use]
    pub fn contains(&self, stage: &str) -> bool {
        self.get(stage).is_some()
    }

    /// Returns all entries in execution order.
    #[must_use]
    pub fn entries(&self) -> &[StageEntry] {
        &self.entries
    }

    /// Returns the most recently written entry.
    #[must_use]
    pub fn last(&self) -> Option<&StageEntry> {
        self.entries.last()
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no stage has completed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Builds the read-restricted view a stage is allowed to see.
    ///
    /// The view holds the initial input plus the entries of exactly the
    /// declared dependencies, in execution order.
    #[must_use]
    pub fn view_for(&self, stage: &str, depends_on: &BTreeSet<String>) -> StageInputs {
        let visible = self
            .entries
            .iter()
            .filter(|entry| depends_on.contains(&entry.stage))
            .cloned()
            .collect();

        StageInputs::new(
            stage,
            self.initial_input.clone(),
            depends_on.clone(),
            visible,
        )
    }
}
