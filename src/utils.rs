//! Numeric utilities shared by the model fits and distance strategies.
//!
//! - a seedable generator of unique random indices used by the samplers;
//! - closed-form 2×2 / 3×3 inversion with a relative singularity check;
//! - an SVD pseudo-inverse;
//! - a real cubic root solver and companion-matrix roots of general
//!   polynomials.

use std::marker::PhantomData;

use nalgebra::linalg::Schur;
use nalgebra::{DMatrix, Matrix2, Matrix3};
use rand::distributions::uniform::SampleUniform;
use rand::distributions::Uniform;
use rand::prelude::*;

/// Uniform integer random-number generator.
///
/// By default this uses an entropy-seeded RNG, but test code can construct
/// it from a fixed seed for reproducible behavior.
pub struct UniformRandomGenerator<T>
where
    T: Copy + SampleUniform + PartialOrd,
{
    rng: StdRng,
    _marker: PhantomData<T>,
}

impl<T> Default for UniformRandomGenerator<T>
where
    T: Copy + SampleUniform + PartialOrd,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> UniformRandomGenerator<T>
where
    T: Copy + SampleUniform + PartialOrd,
{
    /// Construct with a random seed (suitable for production use).
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            _marker: PhantomData,
        }
    }

    /// Construct with a fixed seed (useful for tests).
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            _marker: PhantomData,
        }
    }

    /// Fill `out` with distinct values from `[min, max]`.
    ///
    /// Draws are with replacement and repeated values are redrawn, so the
    /// range must hold at least `out.len()` values.
    pub fn gen_unique(&mut self, out: &mut [T], min: T, max: T) {
        let dist = Uniform::new_inclusive(min, max);
        for i in 0..out.len() {
            loop {
                let candidate = self.rng.sample(&dist);
                if out[..i].iter().all(|&v| v != candidate) {
                    out[i] = candidate;
                    break;
                }
            }
        }
    }
}

/// Relative threshold on `|det| / Π‖row‖` below which a matrix is singular.
///
/// The ratio lies in `[0, 1]` by Hadamard's inequality.
const SINGULARITY_TOLERANCE: f64 = 1e-12;

fn is_singular(det: f64, row_norm_product: f64) -> bool {
    !det.is_finite()
        || !row_norm_product.is_finite()
        || row_norm_product == 0.0
        || det.abs() <= SINGULARITY_TOLERANCE * row_norm_product
}

/// Invert a 2×2 matrix by its adjugate; `None` when singular.
pub fn invert_2x2(m: &Matrix2<f64>) -> Option<Matrix2<f64>> {
    let det = m[(0, 0)] * m[(1, 1)] - m[(0, 1)] * m[(1, 0)];
    if is_singular(det, m.row(0).norm() * m.row(1).norm()) {
        return None;
    }
    let inv = 1.0 / det;
    Some(Matrix2::new(
        m[(1, 1)] * inv,
        -m[(0, 1)] * inv,
        -m[(1, 0)] * inv,
        m[(0, 0)] * inv,
    ))
}

/// Determinant of a 3×3 matrix by cofactor expansion along the first row.
pub fn det_3x3(m: &Matrix3<f64>) -> f64 {
    m[(0, 0)] * (m[(1, 1)] * m[(2, 2)] - m[(1, 2)] * m[(2, 1)])
        - m[(0, 1)] * (m[(1, 0)] * m[(2, 2)] - m[(1, 2)] * m[(2, 0)])
        + m[(0, 2)] * (m[(1, 0)] * m[(2, 1)] - m[(1, 1)] * m[(2, 0)])
}

/// Invert a 3×3 matrix by its adjugate; `None` when singular.
pub fn invert_3x3(m: &Matrix3<f64>) -> Option<Matrix3<f64>> {
    let det = det_3x3(m);
    let bound = m.row(0).norm() * m.row(1).norm() * m.row(2).norm();
    if is_singular(det, bound) {
        return None;
    }
    let inv = 1.0 / det;
    let cof = |r0: usize, r1: usize, c0: usize, c1: usize| {
        m[(r0, c0)] * m[(r1, c1)] - m[(r0, c1)] * m[(r1, c0)]
    };
    Some(Matrix3::new(
        cof(1, 2, 1, 2) * inv,
        -cof(0, 2, 1, 2) * inv,
        cof(0, 1, 1, 2) * inv,
        -cof(1, 2, 0, 2) * inv,
        cof(0, 2, 0, 2) * inv,
        -cof(0, 1, 0, 2) * inv,
        cof(1, 2, 0, 1) * inv,
        -cof(0, 2, 0, 1) * inv,
        cof(0, 1, 0, 1) * inv,
    ))
}

/// Moore-Penrose pseudo-inverse via SVD.
///
/// Singular values below `threshold` are treated as zero.
pub fn pseudo_inverse(m: &DMatrix<f64>, threshold: f64) -> Option<DMatrix<f64>> {
    m.clone().svd(true, true).pseudo_inverse(threshold).ok()
}

/// Solve a cubic equation: x^3 + c2*x^2 + c1*x + c0 = 0
///
/// Returns the number of real roots found (1 or 3) and stores them in `roots`.
/// A repeated root is reported once per multiplicity in the three-root case.
pub fn solve_cubic_real(c2: f64, c1: f64, c0: f64, roots: &mut [f64; 3]) -> usize {
    let shift = c2 / 3.0;
    // Depressed cubic t^3 + p*t + q = 0 with x = t - c2/3.
    let p = c1 - c2 * c2 / 3.0;
    let q = (2.0 * c2 * c2 * c2 - 9.0 * c2 * c1) / 27.0 + c0;
    let disc = q * q / 4.0 + p * p * p / 27.0;

    let n_roots = if disc > 0.0 {
        let s = disc.sqrt();
        roots[0] = (-0.5 * q + s).cbrt() + (-0.5 * q - s).cbrt() - shift;
        1
    } else if p == 0.0 {
        // disc <= 0 with p == 0 forces q == 0: triple root.
        roots[0] = -shift;
        1
    } else {
        let arg = (3.0 * q / (2.0 * p) * (-3.0 / p).sqrt()).clamp(-1.0, 1.0);
        let d = 2.0 * (-p / 3.0).sqrt();
        let phi = arg.acos() / 3.0;
        for (k, root) in roots.iter_mut().enumerate() {
            let angle = phi - 2.0 * std::f64::consts::PI * k as f64 / 3.0;
            *root = d * angle.cos() - shift;
        }
        3
    };

    // Single Newton iteration for refinement
    for root in roots[..n_roots].iter_mut() {
        let x = *root;
        let f = ((x + c2) * x + c1) * x + c0;
        let df = (3.0 * x + 2.0 * c2) * x + c1;
        let dx = f / df;
        if dx.is_finite() {
            *root -= dx;
        }
    }

    n_roots
}

/// Real parts of all complex roots of `Σ coefficients[j] * x^j`.
///
/// Roots are the eigenvalues of the companion matrix. Leading coefficients
/// that are negligible relative to the largest one are dropped. Returns an
/// empty vector for constant or non-finite input.
pub fn polynomial_roots_real_parts(coefficients: &[f64]) -> Vec<f64> {
    if coefficients.iter().any(|c| !c.is_finite()) {
        return Vec::new();
    }
    let scale = coefficients.iter().fold(0.0f64, |m, c| m.max(c.abs()));
    let degree = match coefficients
        .iter()
        .rposition(|c| c.abs() > 1e-14 * scale)
    {
        Some(d) if d > 0 => d,
        _ => return Vec::new(),
    };

    let lead = coefficients[degree];
    let mut companion = DMatrix::<f64>::zeros(degree, degree);
    for i in 1..degree {
        companion[(i, i - 1)] = 1.0;
    }
    for i in 0..degree {
        companion[(i, degree - 1)] = -coefficients[i] / lead;
    }

    match Schur::try_new(companion, f64::EPSILON, 10_000) {
        Some(schur) => schur.complex_eigenvalues().iter().map(|z| z.re).collect(),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn unique_samples_within_bounds() {
        let mut rng = UniformRandomGenerator::<usize>::from_seed(1234);
        let mut buf = [0usize; 5];
        rng.gen_unique(&mut buf, 0, 10);

        assert!(buf.iter().all(|&v| v <= 10));
        for i in 0..buf.len() {
            for j in (i + 1)..buf.len() {
                assert_ne!(buf[i], buf[j]);
            }
        }
    }

    #[test]
    fn unique_samples_cover_exact_range() {
        let mut rng = UniformRandomGenerator::<usize>::from_seed(7);
        let mut buf = [0usize; 4];
        rng.gen_unique(&mut buf, 0, 3);
        let mut sorted = buf;
        sorted.sort_unstable();
        assert_eq!(sorted, [0, 1, 2, 3]);
    }

    #[test]
    fn deterministic_with_same_seed() {
        let mut rng1 = UniformRandomGenerator::<u32>::from_seed(42);
        let mut rng2 = UniformRandomGenerator::<u32>::from_seed(42);

        let draws1: Vec<[u32; 4]> = (0..10)
            .map(|_| {
                let mut buf = [0u32; 4];
                rng1.gen_unique(&mut buf, 0, 100);
                buf
            })
            .collect();
        let draws2: Vec<[u32; 4]> = (0..10)
            .map(|_| {
                let mut buf = [0u32; 4];
                rng2.gen_unique(&mut buf, 0, 100);
                buf
            })
            .collect();

        assert_eq!(draws1, draws2);
        // consecutive draws advance the stream
        assert!(draws1.windows(2).any(|w| w[0] != w[1]));
    }

    #[test]
    fn inverts_small_matrices() {
        let m2 = Matrix2::new(4.0, 7.0, 2.0, 6.0);
        let inv2 = invert_2x2(&m2).unwrap();
        assert_relative_eq!(m2 * inv2, Matrix2::identity(), epsilon = 1e-12);

        let m3 = Matrix3::new(2.0, -1.0, 0.0, -1.0, 2.0, -1.0, 0.0, -1.0, 2.0);
        let inv3 = invert_3x3(&m3).unwrap();
        assert_relative_eq!(m3 * inv3, Matrix3::identity(), epsilon = 1e-12);
        assert_relative_eq!(det_3x3(&m3), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn singular_matrices_are_rejected() {
        assert!(invert_2x2(&Matrix2::new(1.0, 2.0, 2.0, 4.0)).is_none());
        assert!(invert_3x3(&Matrix3::new(1.0, 2.0, 3.0, 2.0, 4.0, 6.0, 0.0, 1.0, 1.0)).is_none());
        assert!(invert_3x3(&Matrix3::zeros()).is_none());
    }

    #[test]
    fn pseudo_inverse_of_tall_matrix_is_left_inverse() {
        let m = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
        let pinv = pseudo_inverse(&m, 1e-12).unwrap();
        assert_relative_eq!(&pinv * &m, DMatrix::identity(2, 2), epsilon = 1e-10);
    }

    #[test]
    fn cubic_with_three_real_roots() {
        // (x - 1)(x - 2)(x + 3) = x^3 - 7x + 6
        let mut roots = [0.0; 3];
        let n = solve_cubic_real(0.0, -7.0, 6.0, &mut roots);
        assert_eq!(n, 3);
        let mut found = roots.to_vec();
        found.sort_by(|a, b| a.total_cmp(b));
        assert_relative_eq!(found[0], -3.0, epsilon = 1e-9);
        assert_relative_eq!(found[1], 1.0, epsilon = 1e-9);
        assert_relative_eq!(found[2], 2.0, epsilon = 1e-9);
    }

    #[test]
    fn cubic_with_single_real_root() {
        // (x - 2)(x^2 + 1) = x^3 - 2x^2 + x - 2
        let mut roots = [0.0; 3];
        let n = solve_cubic_real(-2.0, 1.0, -2.0, &mut roots);
        assert_eq!(n, 1);
        assert_relative_eq!(roots[0], 2.0, epsilon = 1e-9);
    }

    #[test]
    fn companion_roots_of_quartic() {
        // (x^2 - 1)(x^2 - 4) = x^4 - 5x^2 + 4
        let mut roots = polynomial_roots_real_parts(&[4.0, 0.0, -5.0, 0.0, 1.0]);
        roots.sort_by(|a, b| a.total_cmp(b));
        assert_eq!(roots.len(), 4);
        for (found, expected) in roots.iter().zip([-2.0, -1.0, 1.0, 2.0]) {
            assert_relative_eq!(*found, expected, epsilon = 1e-8);
        }
        // trailing zero leading coefficients are ignored
        let linear = polynomial_roots_real_parts(&[3.0, -1.5, 0.0]);
        assert_eq!(linear.len(), 1);
        assert_relative_eq!(linear[0], 2.0, epsilon = 1e-12);
        assert!(polynomial_roots_real_parts(&[5.0]).is_empty());
    }

    #[test]
    fn cubic_with_triple_root() {
        // (x - 1)^3 = x^3 - 3x^2 + 3x - 1
        let mut roots = [0.0; 3];
        let n = solve_cubic_real(-3.0, 3.0, -1.0, &mut roots);
        assert!(n >= 1);
        for root in &roots[..n] {
            assert_relative_eq!(*root, 1.0, epsilon = 1e-4);
        }
    }
}
