//! Blend of two open curves.

use std::fmt;

use crate::core::{Function1D, Model};
use crate::error::{ensure_points, Result};
use crate::models::Polynomial;
use crate::types::Point;

/// Curve `(1 - λ) * A(x) + λ * B(x)`.
///
/// Fitting fits `A` and `B` to the same points, blends their predictions at
/// each sample abscissa and fits a polynomial of the higher of the two
/// degrees to the blended samples. Predictions and distances use that
/// polynomial.
#[derive(Debug, Clone, PartialEq)]
pub struct Interpolated<A, B> {
    a: A,
    b: B,
    lambda: f64,
    blended: Polynomial,
    cost: f64,
}

impl<A, B> Interpolated<A, B>
where
    A: Model + Function1D,
    B: Model + Function1D,
{
    /// `lambda = 0` follows `a`, `lambda = 1` follows `b`.
    pub fn new(a: A, b: B, lambda: f64) -> Self {
        let degree = a.degree().max(b.degree());
        Self {
            a,
            b,
            lambda,
            blended: Polynomial::new(degree),
            cost: f64::MAX,
        }
    }

    pub fn a(&self) -> &A {
        &self.a
    }

    pub fn b(&self) -> &B {
        &self.b
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    /// Takes effect on the next [`fit`](Model::fit).
    pub fn set_lambda(&mut self, lambda: f64) {
        self.lambda = lambda;
    }

    /// The polynomial fitted to the blended samples.
    pub fn blended(&self) -> &Polynomial {
        &self.blended
    }
}

impl<A, B> Model for Interpolated<A, B>
where
    A: Model + Function1D,
    B: Model + Function1D,
{
    fn min_sample_size(&self) -> usize {
        self.a.min_sample_size().max(self.b.min_sample_size())
    }

    fn fit(&mut self, points: &[Point]) -> Result<()> {
        ensure_points(self.min_sample_size(), points.len())?;
        self.a.fit(points)?;
        self.b.fit(points)?;

        let l1 = 1.0 - self.lambda;
        let blended: Vec<Point> = points
            .iter()
            .map(|p| {
                let y = l1 * self.a.predict(p.x) + self.lambda * self.b.predict(p.x);
                Point::new(p.x, y)
            })
            .collect();
        self.blended.fit(&blended)
    }

    fn distance_to(&self, point: &Point) -> f64 {
        self.blended.distance_to(point)
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

impl<A, B> Function1D for Interpolated<A, B> {
    fn degree(&self) -> usize {
        self.blended.degree()
    }

    fn coefficient(&self, j: usize) -> f64 {
        self.blended.coefficient(j)
    }

    fn predict(&self, x: f64) -> f64 {
        self.blended.predict(x)
    }
}

impl<A, B> fmt::Display for Interpolated<A, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (lambda={})", self.blended, self.lambda)
    }
}
