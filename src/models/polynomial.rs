//! Polynomial `y = Σ c_j x^j` of arbitrary degree.

use std::fmt;

use nalgebra::{DMatrix, DVector};

use crate::core::{Function1D, Model};
use crate::distance::{line_foot_point, quadratic_foot_point, NewtonRaphson};
use crate::error::{ensure_points, FitError, Result};
use crate::models::AbscissaNormalization;
use crate::types::Point;
use crate::utils::pseudo_inverse;

/// Least-squares solver used by [`Polynomial::fit`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LeastSquares {
    /// QR decomposition of the Vandermonde matrix.
    Qr,
    /// SVD pseudo-inverse of the normal matrix; singular values below
    /// `threshold` are dropped instead of failing.
    PseudoInverse { threshold: f64 },
}

/// Relative size of the smallest R diagonal entry below which the
/// Vandermonde matrix is considered rank deficient.
const RANK_TOLERANCE: f64 = 1e-10;

#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    coefficients: Vec<f64>,
    solver: LeastSquares,
    newton: NewtonRaphson,
    r_squared: f64,
    cost: f64,
}

impl Polynomial {
    /// Zero polynomial of the given degree, solved by QR.
    pub fn new(degree: usize) -> Self {
        Self::from_coefficients(vec![0.0; degree + 1])
    }

    /// Polynomial with `coefficients[j]` multiplying `x^j`.
    ///
    /// An empty vector is treated as the constant zero.
    pub fn from_coefficients(mut coefficients: Vec<f64>) -> Self {
        if coefficients.is_empty() {
            coefficients.push(0.0);
        }
        Self {
            coefficients,
            solver: LeastSquares::Qr,
            newton: NewtonRaphson::default(),
            r_squared: f64::NAN,
            cost: f64::MAX,
        }
    }

    pub fn with_solver(mut self, solver: LeastSquares) -> Self {
        self.solver = solver;
        self
    }

    /// Replace the Newton-Raphson settings used for degrees above two.
    pub fn with_newton(mut self, newton: NewtonRaphson) -> Self {
        self.newton = newton;
        self
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Coefficient of determination `1 - SSE/SST` of the last fit.
    ///
    /// NaN before the first fit or when all fitted y values are equal.
    pub fn r_squared(&self) -> f64 {
        self.r_squared
    }

    /// Nearest point of the curve to `p`.
    pub fn foot_point(&self, p: &Point) -> Point {
        let c = &self.coefficients;
        match self.degree() {
            0 => Point::new(p.x, c[0]),
            1 => line_foot_point(c[1], c[0], p),
            2 => quadratic_foot_point(c[2], c[1], c[0], p),
            _ => self.newton.foot_point(c, p),
        }
    }

    fn solve_qr(&self, vandermonde: DMatrix<f64>, y: &DVector<f64>) -> Result<DVector<f64>> {
        let qr = vandermonde.qr();
        let r = qr.r();
        let diagonal = r.diagonal().abs();
        let largest = diagonal.max();
        if !(largest > 0.0) || diagonal.min() <= RANK_TOLERANCE * largest {
            return Err(FitError::DegenerateFit(
                "fewer distinct x values than coefficients",
            ));
        }
        let qty = qr.q().transpose() * y;
        r.solve_upper_triangular(&qty)
            .ok_or(FitError::DegenerateFit("singular triangular factor"))
    }

    fn solve_pseudo_inverse(
        &self,
        vandermonde: &DMatrix<f64>,
        y: &DVector<f64>,
        threshold: f64,
    ) -> Result<DVector<f64>> {
        let vt = vandermonde.transpose();
        let normal = &vt * vandermonde;
        let inverse = pseudo_inverse(&normal, threshold)
            .ok_or(FitError::DegenerateFit("pseudo-inverse did not converge"))?;
        Ok(inverse * (vt * y))
    }
}

impl Model for Polynomial {
    fn min_sample_size(&self) -> usize {
        self.degree() + 1
    }

    fn fit(&mut self, points: &[Point]) -> Result<()> {
        let terms = self.coefficients.len();
        ensure_points(terms, points.len())?;
        let norm = AbscissaNormalization::of(points);

        let vandermonde = DMatrix::from_fn(points.len(), terms, |i, j| {
            norm.apply(points[i].x).powi(j as i32)
        });
        let y = DVector::from_iterator(points.len(), points.iter().map(|p| p.y));

        let theta = match self.solver {
            LeastSquares::Qr => self.solve_qr(vandermonde.clone(), &y)?,
            LeastSquares::PseudoInverse { threshold } => {
                self.solve_pseudo_inverse(&vandermonde, &y, threshold)?
            }
        };

        let mean = y.mean();
        let sst = y.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
        let sse = (&vandermonde * &theta - &y).norm_squared();
        self.r_squared = 1.0 - sse / sst;

        self.coefficients = norm.expand(theta.as_slice());
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

impl Function1D for Polynomial {
    fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    fn coefficient(&self, j: usize) -> f64 {
        self.coefficients.get(j).copied().unwrap_or(0.0)
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "f(x)=")?;
        for (j, c) in self.coefficients.iter().enumerate().rev() {
            match j {
                0 => write!(f, "{}", c)?,
                1 => write!(f, "{}*x + ", c)?,
                _ => write!(f, "{}*x^{} + ", c, j)?,
            }
        }
        Ok(())
    }
}
