//! Error types for the risk screener
//!
//! One variant per failure mode of the inference request pipeline, so callers
//! can distinguish retryable conditions (Busy, Inference) from fatal ones
//! (ModelUnreachable, ModelMalformed, SchemaMismatch).

use crate::validator::ValidationOutcome;
use thiserror::Error;

/// Main error type for the screener pipeline
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// Submission arrived before the model session reached Ready
    #[error("model session is not ready")]
    NotReady,

    /// Another submission is currently in flight
    #[error("a submission is already in flight")]
    Busy,

    /// One or more fields failed validation; carries the full per-field outcome
    #[error("input record failed validation")]
    ValidationFailed(ValidationOutcome),

    /// Model artifact could not be found or read
    #[error("model artifact unreachable: {0}")]
    ModelUnreachable(String),

    /// Model artifact was fetched but the runtime could not parse or initialize it
    #[error("model artifact malformed: {0}")]
    ModelMalformed(String),

    /// Introspected model schema does not match the feature catalog
    #[error("model schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Engine invocation failed during a run; retryable without reloading
    #[error("inference failed: {0}")]
    Inference(String),

    /// Decoded label index falls outside the known category table
    #[error("model emitted unmapped label index {0}")]
    UnmappedLabel(i64),

    /// Categorical value has no position in the spec's declared vocabulary
    #[error("value {value:?} is not a known choice for field {field:?}")]
    UnknownChoice { field: String, value: String },

    /// Internal invariant breach (caller contract violation, poisoned lock)
    #[error("internal error: {0}")]
    Internal(String),
}

/// Convenience Result type using the screener Error
pub type Result<T> = std::result::Result<T, Error>;
