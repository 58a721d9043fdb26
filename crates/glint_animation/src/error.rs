//! Animation error types

use thiserror::Error;

/// Errors from building easing curves
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EasingError {
    /// Custom curve data is not a single `M0,0 C.. 1,1` cubic
    #[error("invalid custom ease curve: {0:?}")]
    InvalidCurve(String),

    /// No ease registered under this name
    #[error("unknown ease: {0}")]
    UnknownEase(String),
}
