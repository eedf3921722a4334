//! Core shared types.
//!
//! Input samples are plain `nalgebra` points. A [`PointMatch`] pairs one of
//! them with the distance to the model it was last applied to, which is what
//! the inlier tests and the RANSAC loop pass around.

use nalgebra::Point2;

use crate::core::Model;

/// A 2D input sample. Never mutated once created.
pub type Point = Point2<f64>;

/// A point together with its cached distance to a model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointMatch {
    point: Point,
    distance: f64,
}

impl PointMatch {
    /// Wrap a point; the distance is unknown (`f64::MAX`) until `apply`.
    pub fn new(point: Point) -> Self {
        Self {
            point,
            distance: f64::MAX,
        }
    }

    pub fn point(&self) -> &Point {
        &self.point
    }

    /// Distance computed by the last [`apply`](Self::apply).
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Recompute the cached distance against `model`.
    pub fn apply<M: Model>(&mut self, model: &M) {
        self.distance = model.distance_to(&self.point);
    }
}

impl From<Point> for PointMatch {
    fn from(point: Point) -> Self {
        Self::new(point)
    }
}

/// Build fresh matches for a point slice.
pub fn matches_from(points: &[Point]) -> Vec<PointMatch> {
    points.iter().copied().map(PointMatch::new).collect()
}

/// Extract the points of a match slice, preserving order.
pub fn points_of(matches: &[PointMatch]) -> Vec<Point> {
    matches.iter().map(|m| m.point).collect()
}
