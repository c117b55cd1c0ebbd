//! Error taxonomy for the truth-discovery engine.
//!
//! Every failure is deterministic: retrying the same call with the same
//! input fails the same way, so nothing here is marked retryable.

use thiserror::Error;

use crate::engine::EngineState;

/// Result type alias using [`TruthError`].
pub type Result<T> = std::result::Result<T, TruthError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TruthError {
    /// A tuning constant is outside its valid range. Raised at construction.
    #[error("configuration error: {parameter} = {value} (expected {expected})")]
    Configuration {
        parameter: &'static str,
        value: f64,
        expected: &'static str,
    },

    /// A numeric value left the domain of the computation (trustworthiness
    /// reaching 1, NaN/infinity in the pipeline, oracle out of range).
    #[error("domain error in {context}: {value}")]
    Domain { context: String, value: f64 },

    /// A statement row is malformed and was rejected before iteration.
    #[error("invalid statement at row {row}: {reason}")]
    Input { row: usize, reason: String },

    /// A training run was driven out of order, e.g. `step()` after `finish()`.
    #[error("cannot {operation} a training run in state {state:?}")]
    InvalidState {
        operation: &'static str,
        state: EngineState,
    },
}

impl TruthError {
    pub(crate) fn domain(context: impl Into<String>, value: f64) -> Self {
        TruthError::Domain {
            context: context.into(),
            value,
        }
    }
}
