// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Evidence Kernel Error Hierarchy
// ─────────────────────────────────────────────────────────────────────

use thiserror::Error;

/// Root error type for all evidence accumulation failures.
///
/// None of these are fatal to the surrounding process: the router turns
/// every one of them into a logged skip ("no decision this round").
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AccumulationError {
    /// Configuration rejected by `AccumulationConfig::validate()`.
    #[error("config error: {0}")]
    Config(String),

    /// Probability vector has the wrong class cardinality.
    #[error("dimension mismatch: expected {expected} classes, got {got}")]
    Dimension { expected: usize, got: usize },

    /// Probability vector contains negative or non-finite entries.
    #[error("validation error: {0}")]
    Validation(String),

    /// Event payload could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),
}

pub type AccumulationResult<T> = Result<T, AccumulationError>;
