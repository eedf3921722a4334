//! Ellipse `a*x^2 + 2b*x*y + c*y^2 + 2d*x + 2e*y + f = 0`.
//!
//! Fitting is the direct constrained least-squares method of Fitzgibbon et
//! al.: the scatter matrix of the design rows `[x², xy, y², x, y, 1]` is
//! reduced to a 3×3 system on the quadratic part, premultiplied by the
//! inverse of the constraint matrix `4AC - B² = 1`, and solved as an
//! eigenproblem. Points are moved to their centroid and scaled to a mean
//! radius of √2 first; the method is similarity invariant, so the result is
//! mapped back exactly.
//!
//! With four points (the minimal sample) the reduced system has a repeated
//! zero eigenvalue whose eigenspace is the pencil of conics through the
//! points. The member of that pencil maximizing the constraint is used.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI, SQRT_2};
use std::fmt;

use nalgebra::linalg::Schur;
use nalgebra::{Affine2, DMatrix, Isometry2, Matrix2, Matrix3, Vector2, Vector3};

use crate::core::{ClosedShape, Model};
use crate::distance::{brute_force_distance, closest_point_axis_aligned, ShapeDistance};
use crate::error::{ensure_points, FitError, Result};
use crate::types::Point;
use crate::utils::{invert_2x2, invert_3x3};

/// Geometry derived from the six coefficients.
///
/// All fields are NaN when the coefficients do not describe a real ellipse.
#[derive(Debug, Clone, PartialEq)]
struct Geometry {
    center: Point,
    g: f64,
    axis0: f64,
    axis1: f64,
    r_axis0: f64,
    r_axis1: f64,
    to_axis_frame: Isometry2<f64>,
    to_unit_circle: Affine2<f64>,
}

impl Geometry {
    fn derive(k: &[f64; 6]) -> Self {
        let [a, b, c, d, e, f] = *k;

        let center = invert_2x2(&Matrix2::new(a, b, b, c))
            .map(|inverse| {
                let v = inverse * Vector2::new(-d, -e);
                Point::new(v.x, v.y)
            })
            .unwrap_or_else(|| Point::new(f64::NAN, f64::NAN));
        let (xc, yc) = (center.x, center.y);
        let g = a * xc * xc + 2.0 * b * xc * yc + c * yc * yc - f;

        let axis0 = if a != c {
            0.5 * (2.0 * b / (a - c)).atan()
        } else if b != 0.0 {
            FRAC_PI_4.copysign(b)
        } else {
            0.0
        };
        let axis1 = axis0 + FRAC_PI_2;
        let r_axis0 = polar_radius(k, g, axis0);
        let r_axis1 = polar_radius(k, g, axis1);

        let to_axis_frame = Isometry2::rotation(-axis0) * Isometry2::translation(-xc, -yc);
        let scaling = Matrix3::new_nonuniform_scaling(&Vector2::new(1.0 / r_axis0, 1.0 / r_axis1));
        let to_unit_circle =
            Affine2::from_matrix_unchecked(scaling * to_axis_frame.to_homogeneous());

        Self {
            center,
            g,
            axis0,
            axis1,
            r_axis0,
            r_axis1,
            to_axis_frame,
            to_unit_circle,
        }
    }

    fn is_real(&self) -> bool {
        self.g > 0.0
            && self.r_axis0.is_finite()
            && self.r_axis1.is_finite()
            && self.r_axis0 > 0.0
            && self.r_axis1 > 0.0
    }
}

fn polar_radius(k: &[f64; 6], g: f64, t: f64) -> f64 {
    let (sin, cos) = t.sin_cos();
    (g / (k[0] * cos * cos + 2.0 * k[1] * cos * sin + k[2] * sin * sin)).sqrt()
}

/// Ellipse with algebraic coefficients and the geometry derived from them.
#[derive(Debug, Clone, PartialEq)]
pub struct Ellipse {
    coefficients: [f64; 6],
    geometry: Geometry,
    distance: ShapeDistance,
    cost: f64,
}

impl Default for Ellipse {
    fn default() -> Self {
        Self::new(ShapeDistance::default())
    }
}

impl Ellipse {
    pub const MIN_NUM_POINTS: usize = 4;

    /// Unfitted ellipse measuring distances with `distance`.
    pub fn new(distance: ShapeDistance) -> Self {
        Self::from_coefficients([0.0; 6], distance)
    }

    /// Ellipse from `[a, b, c, d, e, f]` of
    /// `a*x^2 + 2b*x*y + c*y^2 + 2d*x + 2e*y + f = 0`.
    ///
    /// Coefficients that do not describe a real ellipse are accepted; the
    /// derived geometry is then NaN and [`is_ellipse`](Self::is_ellipse)
    /// may be false.
    pub fn from_coefficients(coefficients: [f64; 6], distance: ShapeDistance) -> Self {
        Self {
            geometry: Geometry::derive(&coefficients),
            coefficients,
            distance,
            cost: f64::MAX,
        }
    }

    /// Ellipse centered at `center` with semi-axes `semi_a` along `angle` and
    /// `semi_b` perpendicular to it.
    pub fn from_geometry(
        center: Point,
        semi_a: f64,
        semi_b: f64,
        angle: f64,
        distance: ShapeDistance,
    ) -> Self {
        let (sin, cos) = angle.sin_cos();
        let (ia, ib) = (1.0 / (semi_a * semi_a), 1.0 / (semi_b * semi_b));
        let a = cos * cos * ia + sin * sin * ib;
        let b = cos * sin * (ia - ib);
        let c = sin * sin * ia + cos * cos * ib;
        let (cx, cy) = (center.x, center.y);
        let d = -(a * cx + b * cy);
        let e = -(b * cx + c * cy);
        let f = a * cx * cx + 2.0 * b * cx * cy + c * cy * cy - 1.0;
        Self::from_coefficients([a, b, c, d, e, f], distance)
    }

    /// `[a, b, c, d, e, f]` of `a*x^2 + 2b*x*y + c*y^2 + 2d*x + 2e*y + f = 0`.
    pub fn coefficients(&self) -> [f64; 6] {
        self.coefficients
    }

    pub fn is_ellipse(&self) -> bool {
        let [a, b, c, ..] = self.coefficients;
        a * c - b * b > 0.0
    }

    /// `g = a*xc^2 + 2b*xc*yc + c*yc^2 - f`, the level of the centered
    /// quadratic form on the boundary.
    pub fn g(&self) -> f64 {
        self.geometry.g
    }

    /// Polar angles of the two axes; the second is the first plus π/2.
    pub fn axes(&self) -> (f64, f64) {
        (self.geometry.axis0, self.geometry.axis1)
    }

    /// Radii along [`axes`](Self::axes), in the same order.
    pub fn semi_axes(&self) -> (f64, f64) {
        (self.geometry.r_axis0, self.geometry.r_axis1)
    }

    /// Affine map taking this ellipse onto the unit circle.
    pub fn to_unit_circle(&self) -> &Affine2<f64> {
        &self.geometry.to_unit_circle
    }

    pub fn distance_strategy(&self) -> ShapeDistance {
        self.distance
    }

    fn iterative_distance(&self, p: &Point, iterations: usize) -> f64 {
        let q = self.geometry.to_axis_frame.transform_point(p);
        let (r0, r1) = self.semi_axes();
        if r0 >= r1 {
            let foot = closest_point_axis_aligned(r0, r1, &q, iterations);
            (foot - q).norm()
        } else {
            let swapped = Point::new(q.y, q.x);
            let foot = closest_point_axis_aligned(r1, r0, &swapped, iterations);
            (foot - swapped).norm()
        }
    }
}

/// Constraint value `4*v0*v2 - v1^2`.
fn constraint(v: &Vector3<f64>) -> f64 {
    4.0 * v[0] * v[2] - v[1] * v[1]
}

/// Symmetric bilinear form of [`constraint`].
fn constraint_bilinear(u: &Vector3<f64>, v: &Vector3<f64>) -> f64 {
    2.0 * (u[0] * v[2] + u[2] * v[0]) - u[1] * v[1]
}

/// Unit vector of the eigenspace of `system` at `lambda` with the largest
/// constraint value.
fn eigenspace_vector(system: &Matrix3<f64>, lambda: f64, tolerance: f64) -> Option<Vector3<f64>> {
    let shifted = system - Matrix3::identity() * lambda;
    let svd = shifted.svd(false, true);
    let v_t = svd.v_t?;
    let sigma = svd.singular_values;

    let mut order = [0usize, 1, 2];
    order.sort_by(|&i, &j| sigma[i].total_cmp(&sigma[j]));
    let nullity = order.iter().filter(|&&i| sigma[i] <= tolerance).count().max(1);
    let basis: Vec<Vector3<f64>> = order[..nullity]
        .iter()
        .map(|&i| v_t.row(i).transpose())
        .collect();

    if nullity == 1 {
        return Some(basis[0]);
    }

    let gram = DMatrix::from_fn(nullity, nullity, |i, j| {
        constraint_bilinear(&basis[i], &basis[j])
    });
    let eigen = gram.symmetric_eigen();
    let weights = eigen.eigenvectors.column(eigen.eigenvalues.imax());
    let v = basis
        .iter()
        .zip(weights.iter())
        .fold(Vector3::zeros(), |acc, (b, w)| acc + b * *w);
    let norm = v.norm();
    (norm > 0.0).then(|| v / norm)
}

/// Eigenvector of `system` with a positive constraint value closest to one.
fn select_eigenvector(system: &Matrix3<f64>) -> Option<Vector3<f64>> {
    let scale = system.norm();
    if !(scale > 0.0) || !scale.is_finite() {
        return None;
    }
    let tolerance = 1e-8 * scale;
    let schur = Schur::try_new(*system, f64::EPSILON, 1_000)?;

    let mut visited: Vec<f64> = Vec::with_capacity(3);
    let mut best: Option<(f64, Vector3<f64>)> = None;
    for lambda in schur.complex_eigenvalues().iter() {
        if lambda.im.abs() > tolerance {
            continue;
        }
        let lambda = lambda.re;
        if visited.iter().any(|seen| (seen - lambda).abs() <= tolerance) {
            continue;
        }
        visited.push(lambda);

        let Some(v) = eigenspace_vector(system, lambda, tolerance) else {
            continue;
        };
        let cond = constraint(&v);
        let error = (cond - 1.0) * (cond - 1.0);
        if cond > 0.0 && best.map_or(true, |(best_error, _)| error < best_error) {
            best = Some((error, v));
        }
    }
    best.map(|(_, v)| v)
}

/// Centroid and the scale bringing the mean distance to it to √2.
fn similarity_normalization(points: &[Point]) -> (Point, f64) {
    let n = points.len() as f64;
    let centroid = points
        .iter()
        .fold(Point::origin(), |acc, p| acc + p.coords / n);
    let mean_distance = points.iter().map(|p| (p - centroid).norm()).sum::<f64>() / n;
    let scale = if mean_distance > 1e-15 {
        SQRT_2 / mean_distance
    } else {
        1.0
    };
    (centroid, scale)
}

impl Model for Ellipse {
    fn min_sample_size(&self) -> usize {
        Self::MIN_NUM_POINTS
    }

    fn fit(&mut self, points: &[Point]) -> Result<()> {
        ensure_points(Self::MIN_NUM_POINTS, points.len())?;
        let (centroid, s) = similarity_normalization(points);

        let mut s1 = Matrix3::zeros();
        let mut s2 = Matrix3::zeros();
        let mut s3 = Matrix3::zeros();
        for p in points {
            let x = (p.x - centroid.x) * s;
            let y = (p.y - centroid.y) * s;
            let quadratic = Vector3::new(x * x, x * y, y * y);
            let linear = Vector3::new(x, y, 1.0);
            s1 += quadratic * quadratic.transpose();
            s2 += quadratic * linear.transpose();
            s3 += linear * linear.transpose();
        }

        let s3_inverse =
            invert_3x3(&s3).ok_or(FitError::DegenerateFit("points are collinear"))?;
        let t = -(s3_inverse * s2.transpose());
        let m = s1 + s2 * t;

        // inverse of the constraint matrix [[0, 0, 2], [0, -1, 0], [2, 0, 0]] times m
        #[rustfmt::skip]
        let system = Matrix3::new(
            0.5 * m[(2, 0)], 0.5 * m[(2, 1)], 0.5 * m[(2, 2)],
                 -m[(1, 0)],      -m[(1, 1)],      -m[(1, 2)],
            0.5 * m[(0, 0)], 0.5 * m[(0, 1)], 0.5 * m[(0, 2)],
        );

        let quadratic = select_eigenvector(&system)
            .ok_or(FitError::DegenerateFit("no eigenvector satisfies the ellipse constraint"))?;
        let linear = t * quadratic;

        // back to input coordinates: x' = s*(x - mx), y' = s*(y - my)
        let (mx, my) = (centroid.x, centroid.y);
        let s2n = s * s;
        let (qa, qb, qc) = (quadratic[0] * s2n, quadratic[1] * s2n, quadratic[2] * s2n);
        let (ld, le, lf) = (linear[0] * s, linear[1] * s, linear[2]);
        let big_d = -2.0 * qa * mx - qb * my + ld;
        let big_e = -qb * mx - 2.0 * qc * my + le;
        let big_f = qa * mx * mx + qb * mx * my + qc * my * my - ld * mx - le * my + lf;

        let mut k = [qa, 0.5 * qb, qc, 0.5 * big_d, 0.5 * big_e, big_f];
        if k[0] < 0.0 || (k[0] == 0.0 && k[2] < 0.0) {
            k.iter_mut().for_each(|v| *v = -*v);
        }

        let geometry = Geometry::derive(&k);
        if !geometry.is_real() {
            return Err(FitError::DegenerateFit("conic is not a real ellipse"));
        }
        self.coefficients = k;
        self.geometry = geometry;
        Ok(())
    }

    fn distance_to(&self, point: &Point) -> f64 {
        match self.distance {
            ShapeDistance::Iterative { iterations } => self.iterative_distance(point, iterations),
            ShapeDistance::BruteForce { step } => brute_force_distance(self, point, step),
        }
    }

    fn evaluate(&self, x: f64, y: f64) -> f64 {
        let [a, b, c, d, e, f] = self.coefficients;
        a * x * x + 2.0 * b * x * y + c * y * y + 2.0 * d * x + 2.0 * e * y + f
    }

    fn cost(&self) -> f64 {
        self.cost
    }

    fn set_cost(&mut self, cost: f64) {
        self.cost = cost;
    }
}

impl ClosedShape for Ellipse {
    fn center(&self) -> Point {
        self.geometry.center
    }

    fn radius_at(&self, t: f64) -> f64 {
        polar_radius(&self.coefficients, self.geometry.g, t)
    }

    fn area(&self) -> f64 {
        PI * self.geometry.r_axis0 * self.geometry.r_axis1
    }

    fn ratio(&self) -> f64 {
        let (r0, r1) = self.semi_axes();
        r0.max(r1) / r0.min(r1)
    }

    fn intersects_at(&self, p: &Point) -> Point {
        let q = self.geometry.to_unit_circle * p;
        let len = q.coords.norm();
        let (r0, r1) = self.semi_axes();
        let on_axes = Point::new(q.x / len * r0, q.y / len * r1);
        self.geometry.to_axis_frame.inverse_transform_point(&on_axes)
    }
}

impl fmt::Display for Ellipse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, k] = self.coefficients;
        write!(
            f,
            "{}*x^2 + 2*{}*x*y + {}*y^2 + 2*{}*x + 2*{}*y + {} = 0",
            a, b, c, d, e, k
        )
    }
}
