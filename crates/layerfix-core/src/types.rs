//! Data types exchanged between the repair workflow and its collaborators.
//!
//! None of these outlive a single project load attempt.

use serde::{Deserialize, Serialize};

use layerfix_core_common::ProviderKind;

use crate::error::WorkflowSignal;

/// Result of handling one bad layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum RepairOutcome {
    /// The data source was rewritten to the contained path.
    Repaired(String),
    /// The layer was left as it was.
    Skipped,
    /// The layer is not file-based, so no replacement was searched for.
    Unsupported(ProviderKind),
}

impl RepairOutcome {
    /// Returns `true` if the layer's data source was rewritten.
    #[must_use]
    pub fn is_repaired(&self) -> bool {
        matches!(self, RepairOutcome::Repaired(_))
    }

    /// Short label for tables and logs.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            RepairOutcome::Repaired(_) => "Repaired",
            RepairOutcome::Skipped => "Skipped",
            RepairOutcome::Unsupported(_) => "Unsupported",
        }
    }
}

/// The batch-level decision taken once per set of bad layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchChoice {
    /// Continue loading without the missing layers.
    Ignore,
    /// Search for replacements, one layer at a time.
    Locate,
    /// Return to the pre-load state.
    Abort,
}

impl BatchChoice {
    /// Returns the string representation of this choice.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            BatchChoice::Ignore => "ignore",
            BatchChoice::Locate => "locate",
            BatchChoice::Abort => "abort",
        }
    }
}

/// Policy for callers that cannot prompt a human.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonInteractivePolicy {
    /// Skip every bad layer and keep loading.
    SkipAll,
    /// Fail the whole load.
    FailAll,
}

impl From<NonInteractivePolicy> for BatchChoice {
    fn from(policy: NonInteractivePolicy) -> Self {
        match policy {
            NonInteractivePolicy::SkipAll => BatchChoice::Ignore,
            NonInteractivePolicy::FailAll => BatchChoice::Abort,
        }
    }
}

/// What the file picker is asked to show for one layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickRequest {
    /// Filter expression, seed file name first, then the format filters.
    pub filter: String,
    /// Base file name of the original source, used to pre-select it.
    pub seed_filename: String,
    /// Dialog title naming the missing file and where it used to be.
    pub title: String,
    /// Key under which the picker remembers its last directory.
    pub remember_key: &'static str,
    /// The layer's original data source string.
    pub original_source: String,
}

/// What the file picker returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickResult {
    /// A replacement file was chosen.
    Selected(String),
    /// Nothing was chosen for this layer.
    None,
    /// Stop searching for the remaining layers.
    CancelAll,
}

/// Per-load-attempt state owned by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadContext {
    /// Set when the user chose to continue without the missing layers.
    pub ignore_missing: bool,
}

/// Result of one `handle_bad_layers` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    /// Processing finished. `outcomes[i]` belongs to `batch[i]`.
    Done {
        /// One entry per processed layer, in batch order.
        outcomes: Vec<RepairOutcome>,
        /// The picker asked to stop; layers past `outcomes.len()` were never offered.
        stopped_early: bool,
        /// Size of the batch that was handed in.
        batch_len: usize,
    },
    /// The user aborted; the caller should restore its pre-load state.
    CancelledAll {
        /// Size of the batch that was handed in.
        batch_len: usize,
    },
}

impl BatchOutcome {
    /// Per-layer outcomes; empty when the batch was aborted.
    #[must_use]
    pub fn outcomes(&self) -> &[RepairOutcome] {
        match self {
            BatchOutcome::Done { outcomes, .. } => outcomes,
            BatchOutcome::CancelledAll { .. } => &[],
        }
    }

    /// Number of layers that were never processed.
    #[must_use]
    pub fn unprocessed(&self) -> usize {
        match self {
            BatchOutcome::Done {
                outcomes,
                batch_len,
                ..
            } => batch_len.saturating_sub(outcomes.len()),
            BatchOutcome::CancelledAll { batch_len } => *batch_len,
        }
    }

    /// Number of layers whose data source was rewritten.
    #[must_use]
    pub fn repaired_count(&self) -> usize {
        self.outcomes().iter().filter(|o| o.is_repaired()).count()
    }

    /// Returns `true` if the user aborted the batch.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, BatchOutcome::CancelledAll { .. })
    }

    /// The user decision that cut processing short, if any.
    #[must_use]
    pub fn signal(&self) -> Option<WorkflowSignal> {
        match self {
            BatchOutcome::CancelledAll { batch_len } => Some(WorkflowSignal::BatchAborted {
                layers: *batch_len,
            }),
            BatchOutcome::Done {
                stopped_early: true,
                ..
            } => Some(WorkflowSignal::PickerCancelled {
                remaining: self.unprocessed(),
            }),
            BatchOutcome::Done { .. } => None,
        }
    }

    /// Converts the outcome into the per-layer results, treating any user
    /// cancellation as an error.
    ///
    /// # Errors
    ///
    /// Returns the [`WorkflowSignal`] if the batch was aborted or the search
    /// was cancelled before every layer was processed.
    pub fn into_result(self) -> Result<Vec<RepairOutcome>, WorkflowSignal> {
        match self {
            BatchOutcome::Done {
                outcomes,
                stopped_early: false,
                ..
            } => Ok(outcomes),
            BatchOutcome::Done {
                outcomes,
                stopped_early: true,
                batch_len,
            } => Err(WorkflowSignal::PickerCancelled {
                remaining: batch_len.saturating_sub(outcomes.len()),
            }),
            BatchOutcome::CancelledAll { batch_len } => {
                Err(WorkflowSignal::BatchAborted { layers: batch_len })
            },
        }
    }
}
