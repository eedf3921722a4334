//! Parabola `y = a*x^2 + b*x + c`.

use std::fmt;

use nalgebra::{Matrix3, Vector3};

use crate::core::{Function1D, Model};
use crate::distance::quadratic_foot_point;
use crate::error::{ensure_points, FitError, Result};
use crate::models::AbscissaNormalization;
use crate::types::Point;
use crate::utils::invert_3x3;

/// Parabola fitted through the 3×3 normal equations.
///
/// The distance to a point is exact: the foot point is a real root of a
/// cubic solved in closed form.
#[derive(Debug, Clone, PartialEq)]
pub struct Quadratic {
    a: f64,
    b: f64,
    c: f64,
    cost: f64,
}

impl Default for Quadratic {
    fn default() -> Self {
        Self::new()
    }
}

impl Quadratic {
    pub const MIN_NUM_POINTS: usize = 3;

    pub fn new() -> Self {
        Self::from_coefficients(0.0, 0.0, 0.0)
    }

    pub fn from_coefficients(a: f64, b: f64, c: f64) -> Self {
        Self {
            a,
            b,
            c,
            cost: f64::MAX,
        }
    }

    pub fn a(&self) -> f64 {
        self.a
    }

    pub fn b(&self) -> f64 {
        self.b
    }

    pub fn c(&self) -> f64 {
        self.c
    }

    /// Nearest point of the parabola to `p`.
    pub fn foot_point(&self, p: &Point) -> Point {
        quadratic_foot_point(self.a, self.b, self.c, p)
    }
}

impl Model for Quadratic {
    fn min_sample_size(&self) -> usize {
        Self::MIN_NUM_POINTS
    }

    fn fit(&mut self, points: &[Point]) -> Result<()> {
        ensure_points(Self::MIN_NUM_POINTS, points.len())?;
        let norm = AbscissaNormalization::of(points);

        let mut moments = [0.0; 5];
        let mut rhs = Vector3::zeros();
        for p in points {
            let u = norm.apply(p.x);
            let u2 = u * u;
            moments[0] += 1.0;
            moments[1] += u;
            moments[2] += u2;
            moments[3] += u2 * u;
            moments[4] += u2 * u2;
            rhs[0] += u2 * p.y;
            rhs[1] += u * p.y;
            rhs[2] += p.y;
        }

        #[rustfmt::skip]
        let delta = Matrix3::new(
            moments[4], moments[3], moments[2],
            moments[3], moments[2], moments[1],
            moments[2], moments[1], moments[0],
        );
        let inverse = invert_3x3(&delta)
            .ok_or(FitError::DegenerateFit("fewer than three distinct x values"))?;
        let theta = inverse * rhs;

        let coefficients = norm.expand(&[theta[2], theta[1], theta[0]]);
        self.c = coefficients[0];
        self.b = coefficients[1];
        self.a = coefficients[2];
        Ok(())
    }

    fn distance_to(&self, point: &Point) -> f64 {
        (self.foot_point(point) - point).norm()
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

impl Function1D for Quadratic {
    fn degree(&self) -> usize {
        2
    }

    fn coefficient(&self, j: usize) -> f64 {
        match j {
            0 => self.c,
            1 => self.b,
            2 => self.a,
            _ => 0.0,
        }
    }
}

impl fmt::Display for Quadratic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "f(x)={}*x^2 + {}*x + {}", self.a, self.b, self.c)
    }
}
