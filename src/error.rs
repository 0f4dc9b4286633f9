//! Errors raised by the validation layer around the solver.
//!
//! `solve` itself never fails; these cover request construction, settings and
//! face building for callers that want an explicit error instead of a fallback.

#[derive(Debug, thiserror::Error)]
pub enum BevelError {
    #[error("{name} must have finite coordinates, got {point:?}")]
    NonFinitePoint { name: &'static str, point: [f64; 3] },

    #[error("offset must be finite and > 0, got {offset}")]
    InvalidOffset { offset: f64 },

    #[error("segment count must be >= 1, got {segments}")]
    InvalidSegmentCount { segments: usize },

    #[error("invalid point `{input}`: expected three comma-separated numbers")]
    InvalidPoint { input: String },

    #[error("corner at {anchor:?} is degenerate (collinear or zero-length sides)")]
    Degenerate { anchor: [f64; 3] },

    #[error("no bevel has been evaluated yet")]
    NotEvaluated,
}
