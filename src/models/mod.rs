//! Concrete models.
//!
//! Open curves `y = f(x)`:
//! - [`Linear`], [`Quadratic`], [`Polynomial`] of any degree;
//! - [`Interpolated`], a blend of two of the above.
//!
//! Closed shapes:
//! - [`Circle`], [`Ellipse`].

pub mod circle;
pub mod ellipse;
pub mod interpolated;
pub mod line;
pub mod polynomial;
pub mod quadratic;

pub use circle::Circle;
pub use ellipse::Ellipse;
pub use interpolated::Interpolated;
pub use line::Linear;
pub use polynomial::{LeastSquares, Polynomial};
pub use quadratic::Quadratic;

use crate::types::Point;

/// Change of abscissa `u = (x - shift) / scale` applied before solving the
/// least-squares systems of the open curves, so that pixel-sized x values
/// do not wreck the conditioning of the normal equations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct AbscissaNormalization {
    shift: f64,
    scale: f64,
}

impl AbscissaNormalization {
    /// Center on the mean x and scale by the largest deviation from it.
    ///
    /// A zero or non-finite spread keeps unit scale; the subsequent solve
    /// reports the degeneracy.
    pub(crate) fn of(points: &[Point]) -> Self {
        if points.is_empty() {
            return Self {
                shift: 0.0,
                scale: 1.0,
            };
        }
        let shift = points.iter().map(|p| p.x).sum::<f64>() / points.len() as f64;
        let spread = points
            .iter()
            .fold(0.0f64, |m, p| m.max((p.x - shift).abs()));
        let scale = if spread > 0.0 && spread.is_finite() {
            spread
        } else {
            1.0
        };
        Self { shift, scale }
    }

    pub(crate) fn apply(&self, x: f64) -> f64 {
        (x - self.shift) / self.scale
    }

    /// Coefficients in `x` of the polynomial `Σ coefficients[k] * u^k`.
    pub(crate) fn expand(&self, coefficients: &[f64]) -> Vec<f64> {
        let mut out = vec![0.0; coefficients.len()];
        let neg_shift = -self.shift;
        for (k, &c) in coefficients.iter().enumerate() {
            let factor = c / self.scale.powi(k as i32);
            let mut binomial = 1.0;
            for j in 0..=k {
                out[j] += factor * binomial * neg_shift.powi((k - j) as i32);
                binomial = binomial * (k - j) as f64 / (j + 1) as f64;
            }
        }
        out
    }
}
