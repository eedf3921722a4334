//! Point-to-model distance algorithms.
//!
//! Most models have a closed-form distance and use these routines directly.
//! Closed shapes without one (the ellipse) select an algorithm through
//! [`ShapeDistance`], bound when the model is constructed.

pub mod ellipse;
pub mod polynomial;

pub use ellipse::closest_point_axis_aligned;
pub use polynomial::{line_foot_point, quadratic_foot_point, NewtonRaphson};

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use crate::core::ClosedShape;
use crate::types::Point;

/// How a closed shape measures the distance from a point to its boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ShapeDistance {
    /// Closed-form-seeded iterative refinement of the foot point.
    Iterative { iterations: usize },
    /// Sample the boundary every `step` radians and keep the nearest sample.
    BruteForce { step: f64 },
}

impl ShapeDistance {
    pub const DEFAULT_ITERATIONS: usize = 10;
    pub const DEFAULT_STEP: f64 = 0.01;

    pub fn iterative() -> Self {
        Self::Iterative {
            iterations: Self::DEFAULT_ITERATIONS,
        }
    }

    pub fn brute_force() -> Self {
        Self::BruteForce {
            step: Self::DEFAULT_STEP,
        }
    }
}

impl Default for ShapeDistance {
    fn default() -> Self {
        Self::iterative()
    }
}

/// Nearest of the boundary samples `point_at(k * step)`, `k * step < 2π`.
///
/// Returns the distance and the sample it was measured to. A non-positive
/// step degenerates to the single sample at angle zero.
pub fn brute_force_foot_point<S>(shape: &S, p: &Point, step: f64) -> (f64, Point)
where
    S: ClosedShape + ?Sized,
{
    let samples = if step > 0.0 && step.is_finite() {
        (TAU / step).ceil() as usize
    } else {
        1
    };

    let mut best_point = shape.point_at(0.0);
    let mut best = (best_point - p).norm();
    for k in 1..samples {
        let q = shape.point_at(k as f64 * step);
        let d = (q - p).norm();
        if d < best {
            best = d;
            best_point = q;
        }
    }
    (best, best_point)
}

/// Brute-force distance from `p` to the boundary of `shape`.
pub fn brute_force_distance<S>(shape: &S, p: &Point, step: f64) -> f64
where
    S: ClosedShape + ?Sized,
{
    brute_force_foot_point(shape, p, step).0
}
