//! Core traits and the RANSAC pipeline.
//!
//! - [`Model`]: what every fittable shape provides (fit, distance, cost).
//! - [`Function1D`] and [`ClosedShape`]: capabilities of open curves
//!   `y = f(x)` and of closed boundaries.
//! - [`Sampler`]: draws minimal samples of candidate indices.
//! - [`InlierTest`]: classifies candidates and assigns the model's cost.
//! - [`Ransac`]: the generic loop tying these together.

use log::{debug, trace};

use crate::error::{FitError, Result};
use crate::settings::RansacSettings;
use crate::types::{Point, PointMatch};

/// A parametric model that can be fitted to points and measured against them.
///
/// Cloning yields an independent copy (coefficients, derived geometry and
/// cost). The cost is the outcome of the last inlier test; lower is better.
pub trait Model: Clone {
    /// Number of points needed for a determined fit.
    fn min_sample_size(&self) -> usize;

    /// Fit the model to `points` (exactly or in the least-squares sense).
    fn fit(&mut self, points: &[Point]) -> Result<()>;

    /// Non-negative distance from `point` to the nearest point of the model.
    fn distance_to(&self, point: &Point) -> f64;

    /// Signed algebraic value of the model's implicit form at `(x, y)`.
    fn evaluate(&self, x: f64, y: f64) -> f64;

    fn cost(&self) -> f64;

    fn set_cost(&mut self, cost: f64);

    /// Lower cost wins; a negative cost never wins.
    fn better_than(&self, other: &Self) -> bool {
        self.cost() >= 0.0 && self.cost() < other.cost()
    }

    /// Replace the whole state of `self` with that of `other`.
    fn set_from(&mut self, other: &Self) {
        self.clone_from(other);
    }
}

/// Open curve of the form `y = f(x)` with polynomial coefficients.
pub trait Function1D {
    fn degree(&self) -> usize;

    /// Coefficient of `x^j`; zero above the degree.
    fn coefficient(&self, j: usize) -> f64;

    /// Value of `f(x)` (Horner evaluation).
    fn predict(&self, x: f64) -> f64 {
        (0..=self.degree())
            .rev()
            .fold(0.0, |acc, j| acc * x + self.coefficient(j))
    }
}

/// Closed boundary parameterized by the polar angle around its center.
pub trait ClosedShape {
    fn center(&self) -> Point;

    /// Distance from the center to the boundary along angle `t`.
    fn radius_at(&self, t: f64) -> f64;

    /// Boundary point at polar angle `t`.
    fn point_at(&self, t: f64) -> Point {
        let c = self.center();
        let r = self.radius_at(t);
        Point::new(c.x + r * t.cos(), c.y + r * t.sin())
    }

    fn area(&self) -> f64;

    /// Long axis over short axis, always `>= 1`.
    fn ratio(&self) -> f64;

    /// Boundary point on the ray from the center through `p`.
    fn intersects_at(&self, p: &Point) -> Point {
        let c = self.center();
        self.point_at((p.y - c.y).atan2(p.x - c.x))
    }
}

/// Sampler responsible for drawing minimal samples from the candidate pool.
pub trait Sampler {
    /// Draw `sample_size` distinct indices in `0..pool_size` into `out_indices`.
    ///
    /// Returns `false` if a valid sample could not be drawn.
    fn sample(
        &mut self,
        pool_size: usize,
        sample_size: usize,
        out_indices: &mut [usize],
    ) -> bool;
}

/// Inlier classification and cost assignment for a model hypothesis.
pub trait InlierTest<M: Model> {
    /// Apply `model` to every candidate, collect the accepted inliers into
    /// `inliers` and store the resulting cost on the model.
    ///
    /// Returns whether the hypothesis passes the acceptance criteria.
    fn test(
        &self,
        model: &mut M,
        candidates: &mut [PointMatch],
        inliers: &mut Vec<PointMatch>,
        settings: &RansacSettings,
    ) -> bool;
}

/// Generic RANSAC over any [`Model`], sampler and inlier test.
pub struct Ransac<S, T> {
    pub settings: RansacSettings,
    pub sampler: S,
    pub test: T,
    /// Iterations performed by the last [`run`](Self::run).
    pub iteration: usize,
}

impl<S, T> Ransac<S, T>
where
    S: Sampler,
{
    pub fn new(settings: RansacSettings, sampler: S, test: T) -> Self {
        Self {
            settings,
            sampler,
            test,
            iteration: 0,
        }
    }

    /// Robustly fit `model` to `candidates`.
    ///
    /// On success `model` holds the best hypothesis and its inliers are
    /// returned in candidate order. The cached distances of `candidates`
    /// reflect the last hypothesis tested.
    pub fn run<M>(
        &mut self,
        model: &mut M,
        candidates: &mut [PointMatch],
    ) -> Result<Vec<PointMatch>>
    where
        M: Model,
        T: InlierTest<M>,
    {
        let sample_size = model.min_sample_size();
        let iterations = self.settings.iterations;
        self.iteration = 0;

        if candidates.len() < sample_size {
            debug!(
                "ransac: {} candidates cannot support a minimal sample of {}",
                candidates.len(),
                sample_size
            );
            return Err(FitError::NoModelFound { iterations: 0 });
        }

        let mut best = model.clone();
        best.set_cost(f64::MAX);
        let mut best_inliers: Vec<PointMatch> = Vec::new();

        let mut working = model.clone();
        let mut sample = vec![0usize; sample_size];
        let mut sample_points = Vec::with_capacity(sample_size);
        let mut inliers = Vec::new();

        while self.iteration < iterations {
            self.iteration += 1;

            if !self
                .sampler
                .sample(candidates.len(), sample_size, &mut sample)
            {
                continue;
            }
            sample_points.clear();
            sample_points.extend(sample.iter().map(|&i| *candidates[i].point()));

            if let Err(err) = working.fit(&sample_points) {
                trace!("ransac: iteration {} skipped: {}", self.iteration, err);
                continue;
            }

            let mut num_inliers = 0;
            let mut good = self
                .test
                .test(&mut working, candidates, &mut inliers, &self.settings);

            let mut refit_failed = false;
            while good && num_inliers < inliers.len() {
                num_inliers = inliers.len();
                sample_points.clear();
                sample_points.extend(inliers.iter().map(|m| *m.point()));
                if let Err(err) = working.fit(&sample_points) {
                    trace!("ransac: refit on {} inliers failed: {}", num_inliers, err);
                    refit_failed = true;
                    break;
                }
                good = self
                    .test
                    .test(&mut working, candidates, &mut inliers, &self.settings);
            }
            if refit_failed {
                continue;
            }

            if good
                && working.better_than(&best)
                && inliers.len() >= self.settings.min_num_inliers
            {
                debug!(
                    "ransac: iteration {} improved cost {:.4} -> {:.4} with {} inliers",
                    self.iteration,
                    best.cost(),
                    working.cost(),
                    inliers.len()
                );
                best.set_from(&working);
                best_inliers.clone_from(&inliers);
            }
        }

        if best_inliers.is_empty() {
            debug!("ransac: no model found in {} iterations", iterations);
            return Err(FitError::NoModelFound { iterations });
        }

        model.set_from(&best);
        Ok(best_inliers)
    }
}
