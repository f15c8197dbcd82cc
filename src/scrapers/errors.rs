use std::time::Duration;

use thiserror::Error;

/// Failure modes of a single interaction step against the live page.
///
/// These are absorbed at the step boundary: a failed filter step is
/// reported and skipped, never fatal to the run.
#[derive(Debug, Clone, Error)]
pub enum StepError {
    #[error("no element matched {target} within {timeout:?}")]
    NotFound { target: String, timeout: Duration },

    #[error("{target} was found but refused interaction")]
    NotInteractable { target: String },

    #[error("{value:?} has no table entry and no visible option contains it")]
    UnmappedValue { value: String },

    #[error("page did not settle within {0:?}")]
    SettleTimeout(Duration),
}
