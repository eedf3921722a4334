//! Foot points on graphs of polynomials `y = p(x)`.
//!
//! Degree one and two have closed forms: the perpendicular foot on a line and
//! the real roots of the cubic `d/dx |(x, p(x)) - q|^2 = 0` for a parabola.
//! Higher degrees use [`NewtonRaphson`].

use rand::prelude::*;

use crate::types::Point;
use crate::utils::{polynomial_roots_real_parts, solve_cubic_real};

/// Foot point of `p` on the line `y = m*x + n`.
pub fn line_foot_point(m: f64, n: f64, p: &Point) -> Point {
    let x = (p.x + m * (p.y - n)) / (1.0 + m * m);
    Point::new(x, m * x + n)
}

/// Foot point of `p` on the parabola `y = a*x^2 + b*x + c`.
///
/// With `a == 0` the curve is the line `y = b*x + c`.
pub fn quadratic_foot_point(a: f64, b: f64, c: f64, p: &Point) -> Point {
    let a3 = 2.0 * a * a;
    let a2 = 3.0 * a * b / a3;
    let a1 = (2.0 * c * a - 2.0 * a * p.y + 1.0 + b * b) / a3;
    let a0 = (c * b - p.y * b - p.x) / a3;
    if !(a2.is_finite() && a1.is_finite() && a0.is_finite()) {
        return line_foot_point(b, c, p);
    }

    let mut roots = [0.0; 3];
    let n_roots = solve_cubic_real(a2, a1, a0, &mut roots);

    let mut best = Point::new(p.x, a * p.x * p.x + b * p.x + c);
    let mut best_d = (best - p).norm_squared();
    for &x in &roots[..n_roots] {
        let q = Point::new(x, (a * x + b) * x + c);
        let d = (q - p).norm_squared();
        if d < best_d {
            best_d = d;
            best = q;
        }
    }
    best
}

/// `p(x)` and its first three derivatives by nested Horner evaluation.
fn derivatives(coefficients: &[f64], x: f64) -> [f64; 4] {
    let mut d = [0.0; 4];
    for &c in coefficients.iter().rev() {
        d[3] = d[3] * x + d[2];
        d[2] = d[2] * x + d[1];
        d[1] = d[1] * x + d[0];
        d[0] = d[0] * x + c;
    }
    [d[0], d[1], 2.0 * d[2], 6.0 * d[3]]
}

/// Coefficients of `(p(x) - y0) * p'(x) + (x - x0)`, whose real roots are
/// the stationary points of the squared distance from `(x0, y0)`.
fn stationary_polynomial(coefficients: &[f64], p: &Point) -> Vec<f64> {
    let mut residual = coefficients.to_vec();
    residual[0] -= p.y;
    let slope: Vec<f64> = coefficients
        .iter()
        .enumerate()
        .skip(1)
        .map(|(j, &c)| j as f64 * c)
        .collect();

    let mut product = vec![0.0; (residual.len() + slope.len()).saturating_sub(1).max(2)];
    for (i, &r) in residual.iter().enumerate() {
        for (j, &s) in slope.iter().enumerate() {
            product[i + j] += r * s;
        }
    }
    product[0] -= p.x;
    product[1] += 1.0;
    product
}

/// Damped Newton-Raphson search for the foot point on a polynomial graph.
///
/// Minimizes `((x - x0)^2 + (p(x) - y0)^2) / 2` with a Halley-corrected
/// Newton step. Descents start at `x0` and at the real parts of the
/// companion-matrix roots of the stationary condition, so the global
/// minimum is not missed when the curve folds back towards the point.
/// Every `restart_interval` iterations without convergence a descent
/// restarts from a random abscissa within the current best distance of
/// `x0`, with a random damping of the correction term. The generator is
/// reseeded from `seed` on every query, so results only depend on the
/// coefficients and the point. Non-convergence is silent: the best
/// candidate visited is returned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonRaphson {
    pub max_iterations: usize,
    pub min_change: f64,
    pub restart_interval: usize,
    pub seed: u64,
}

impl Default for NewtonRaphson {
    fn default() -> Self {
        Self {
            max_iterations: 10_000,
            min_change: 1e-3,
            restart_interval: 1000,
            seed: 43_583_458,
        }
    }
}

/// Best foot point found so far.
struct Nearest {
    point: Point,
    distance: f64,
}

impl NewtonRaphson {
    pub fn new(max_iterations: usize, min_change: f64) -> Self {
        Self {
            max_iterations,
            min_change,
            ..Self::default()
        }
    }

    /// Foot point of `p` on `y = Σ coefficients[j] * x^j`.
    pub fn foot_point(&self, coefficients: &[f64], p: &Point) -> Point {
        if coefficients.is_empty() {
            return Point::new(p.x, 0.0);
        }
        let mut rng = StdRng::seed_from_u64(self.seed);
        let start = Point::new(p.x, derivatives(coefficients, p.x)[0]);
        let mut nearest = Nearest {
            distance: (start - p).norm(),
            point: start,
        };

        self.descend(coefficients, p, p.x, &mut rng, &mut nearest);
        for seed in polynomial_roots_real_parts(&stationary_polynomial(coefficients, p)) {
            self.descend(coefficients, p, seed, &mut rng, &mut nearest);
        }
        nearest.point
    }

    fn descend(
        &self,
        coefficients: &[f64],
        p: &Point,
        start: f64,
        rng: &mut StdRng,
        nearest: &mut Nearest,
    ) {
        let mut xc = start;
        let mut damp = 1.0;

        for iteration in 1..=self.max_iterations {
            let [f, f1, f2, f3] = derivatives(coefficients, xc);
            let r = f - p.y;
            let g = r * f1 + (xc - p.x);
            let h = f1 * f1 + r * f2 + 1.0;
            let h2 = r * f3 + 3.0 * f1 * f2;

            let x_new = xc - (g / h) * (1.0 + damp * 0.5 * g * h2 / (h * h));
            damp = 1.0;
            if !x_new.is_finite() {
                return;
            }

            let candidate = Point::new(x_new, derivatives(coefficients, x_new)[0]);
            let d = (candidate - p).norm();
            if d < nearest.distance {
                nearest.distance = d;
                nearest.point = candidate;
            }

            if (x_new - xc).abs() <= self.min_change {
                return;
            }
            xc = x_new;

            if self.restart_interval > 0 && iteration % self.restart_interval == 0 {
                xc = p.x + rng.gen_range(-1.0..=1.0) * nearest.distance;
                damp = rng.gen::<f64>();
            }
        }
    }

    /// Distance from `p` to the graph of the polynomial.
    pub fn distance(&self, coefficients: &[f64], p: &Point) -> f64 {
        (self.foot_point(coefficients, p) - p).norm()
    }
}
