//! Error type shared by every model fit and by the RANSAC core.

use thiserror::Error;

/// Failure modes of fitting and robust estimation.
///
/// `InsufficientPoints` and `DegenerateFit` are local to a single fit
/// attempt; the RANSAC core absorbs them as skipped iterations. Only
/// `NoModelFound` leaves the core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FitError {
    /// Fewer points than the model's minimal sample size.
    #[error("not enough points: at least {required} are necessary, {available} available")]
    InsufficientPoints { required: usize, available: usize },

    /// The linear system is singular or the solution is not a valid model.
    #[error("degenerate fit: {0}")]
    DegenerateFit(&'static str),

    /// No iteration produced an acceptable consensus set.
    #[error("no model found after {iterations} iterations")]
    NoModelFound { iterations: usize },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FitError>;

/// Reject point sets smaller than `required`.
pub(crate) fn ensure_points(required: usize, available: usize) -> Result<()> {
    if available < required {
        Err(FitError::InsufficientPoints {
            required,
            available,
        })
    } else {
        Ok(())
    }
}
