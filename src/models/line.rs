//! Straight line `y = m*x + n`.

use std::fmt;

use nalgebra::{Matrix2, Vector2};

use crate::core::{Function1D, Model};
use crate::distance::line_foot_point;
use crate::error::{ensure_points, FitError, Result};
use crate::models::AbscissaNormalization;
use crate::types::{points_of, Point, PointMatch};
use crate::utils::invert_2x2;

/// Line `y = m*x + n`, fitted by least squares on vertical residuals.
///
/// Vertical lines cannot be represented and fail to fit.
#[derive(Debug, Clone, PartialEq)]
pub struct Linear {
    m: f64,
    n: f64,
    cost: f64,
}

impl Default for Linear {
    fn default() -> Self {
        Self::new()
    }
}

impl Linear {
    pub const MIN_NUM_POINTS: usize = 2;

    pub fn new() -> Self {
        Self::from_coefficients(0.0, 0.0)
    }

    pub fn from_coefficients(m: f64, n: f64) -> Self {
        Self {
            m,
            n,
            cost: f64::MAX,
        }
    }

    pub fn slope(&self) -> f64 {
        self.m
    }

    pub fn intercept(&self) -> f64 {
        self.n
    }

    /// Nearest point of the line to `p`.
    pub fn foot_point(&self, p: &Point) -> Point {
        line_foot_point(self.m, self.n, p)
    }

    /// Whether a line fitted to `inliers` has a slope within `[min_slope, max_slope]`.
    pub fn slope_fits(inliers: &[PointMatch], min_slope: f64, max_slope: f64) -> bool {
        let mut line = Self::new();
        match line.fit(&points_of(inliers)) {
            Ok(()) => line.m >= min_slope && line.m <= max_slope,
            Err(_) => false,
        }
    }
}

impl Model for Linear {
    fn min_sample_size(&self) -> usize {
        Self::MIN_NUM_POINTS
    }

    fn fit(&mut self, points: &[Point]) -> Result<()> {
        ensure_points(Self::MIN_NUM_POINTS, points.len())?;
        let norm = AbscissaNormalization::of(points);

        let (mut su, mut suu, mut sy, mut suy) = (0.0, 0.0, 0.0, 0.0);
        for p in points {
            let u = norm.apply(p.x);
            su += u;
            suu += u * u;
            sy += p.y;
            suy += u * p.y;
        }

        let delta = Matrix2::new(suu, su, su, points.len() as f64);
        let inverse =
            invert_2x2(&delta).ok_or(FitError::DegenerateFit("all points share one x"))?;
        let theta = inverse * Vector2::new(suy, sy);

        let coefficients = norm.expand(&[theta[1], theta[0]]);
        self.n = coefficients[0];
        self.m = coefficients[1];
        Ok(())
    }

    fn distance_to(&self, point: &Point) -> f64 {
        (point.y - self.m * point.x - self.n).abs() / (self.m * self.m + 1.0).sqrt()
    }

    fn evaluate(&self, x: f64, y: f64) -> f64 {
        y - self.predict(x)
    }

    fn cost(&self) -> f64 {
        self.cost
    }

    fn set_cost(&mut self, cost: f64) {
        self.cost = cost;
    }
}

impl Function1D for Linear {
    fn degree(&self) -> usize {
        1
    }

    fn coefficient(&self, j: usize) -> f64 {
        match j {
            0 => self.n,
            1 => self.m,
            _ => 0.0,
        }
    }

    fn predict(&self, x: f64) -> f64 {
        self.m * x + self.n
    }
}

impl fmt::Display for Linear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "f(x)={}*x + {}", self.m, self.n)
    }
}
