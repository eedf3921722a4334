//! High-level API: single and multi-instance extraction.
//!
//! [`find_all_functions`] repeatedly runs a [`Ransac`] over the points that
//! no earlier instance has claimed, so every point ends up in at most one
//! [`FitResult`]. [`fit_ellipses`] and [`fit_segments`] wire up the usual
//! sampler and inlier test for closed shapes and open curves.

use std::collections::HashSet;

use log::debug;

use crate::core::{InlierTest, Model, Ransac, Sampler};
use crate::distance::ShapeDistance;
use crate::error::{FitError, Result};
use crate::models::Ellipse;
use crate::samplers::UniformRandomSampler;
use crate::scoring::{GapSegmentedTest, ShapeConstrainedTest};
use crate::settings::{RansacSettings, ShapeBounds};
use crate::types::{matches_from, Point, PointMatch};

/// One extracted model instance.
#[derive(Debug, Clone, PartialEq)]
pub struct FitResult<M> {
    /// The accepted model, with the cost of its final inlier test.
    pub model: M,
    /// Inliers of `model`, in the order the test produced them.
    pub inliers: Vec<PointMatch>,
}

/// Key identifying a point by value; `-0.0` and `0.0` are the same point.
fn point_key(p: &Point) -> (u64, u64) {
    ((p.x + 0.0).to_bits(), (p.y + 0.0).to_bits())
}

/// Fit a single instance of `prototype` to `points`.
///
/// # Arguments
/// * `points` - Candidate points
/// * `prototype` - Model to clone as the starting hypothesis
/// * `ransac` - Configured RANSAC core
///
/// # Returns
/// The best model and its inliers, or [`FitError::NoModelFound`].
pub fn find_function<M, S, T>(
    points: &[Point],
    prototype: &M,
    ransac: &mut Ransac<S, T>,
) -> Result<FitResult<M>>
where
    M: Model,
    S: Sampler,
    T: InlierTest<M>,
{
    let mut model = prototype.clone();
    let mut candidates = matches_from(points);
    let inliers = ransac.run(&mut model, &mut candidates)?;
    Ok(FitResult { model, inliers })
}

/// Extract every instance of `prototype` from `points`.
///
/// Each pass fits a fresh clone of `prototype` to the points left over by
/// the previous passes and removes the new inliers (every copy of an inlier
/// point goes with it). Extraction stops when a pass finds no model or
/// claims no points. Results are in discovery order.
pub fn find_all_functions<M, S, T>(
    points: &[Point],
    prototype: &M,
    ransac: &mut Ransac<S, T>,
) -> Vec<FitResult<M>>
where
    M: Model,
    S: Sampler,
    T: InlierTest<M>,
{
    let mut remaining = points.to_vec();
    let mut results = Vec::new();

    loop {
        let found = match find_function(&remaining, prototype, ransac) {
            Ok(found) => found,
            Err(FitError::NoModelFound { iterations }) => {
                debug!(
                    "extract: stopping after {} instances, nothing found in {} iterations",
                    results.len(),
                    iterations
                );
                break;
            }
            Err(err) => {
                debug!("extract: stopping after {} instances: {}", results.len(), err);
                break;
            }
        };
        if found.inliers.is_empty() {
            break;
        }

        let claimed: HashSet<(u64, u64)> =
            found.inliers.iter().map(|m| point_key(m.point())).collect();
        let before = remaining.len();
        remaining.retain(|p| !claimed.contains(&point_key(p)));
        debug!(
            "extract: instance {} claimed {} of {} points (cost {:.4})",
            results.len(),
            before - remaining.len(),
            before,
            found.model.cost()
        );
        results.push(found);
    }

    results
}

/// Extract ellipses whose area and axis ratio lie within `bounds`.
///
/// # Arguments
/// * `points` - Candidate points
/// * `settings` - RANSAC settings
/// * `bounds` - Accepted area and axis-ratio window
/// * `distance` - Point-to-ellipse distance algorithm
/// * `seed` - Sampler seed; `None` seeds from entropy
pub fn fit_ellipses(
    points: &[Point],
    settings: RansacSettings,
    bounds: ShapeBounds,
    distance: ShapeDistance,
    seed: Option<u64>,
) -> Vec<FitResult<Ellipse>> {
    let mut ransac = Ransac::new(
        settings,
        sampler_from(seed),
        ShapeConstrainedTest::new(bounds),
    );
    find_all_functions(points, &Ellipse::new(distance), &mut ransac)
}

/// Extract gap-free segments of an open curve.
///
/// # Arguments
/// * `points` - Candidate points
/// * `prototype` - Curve model, e.g. `Linear::new()` or `Polynomial::new(3)`
/// * `settings` - RANSAC settings
/// * `max_gap` - Largest x spacing allowed between neighbouring inliers
/// * `seed` - Sampler seed; `None` seeds from entropy
pub fn fit_segments<M: Model>(
    points: &[Point],
    prototype: &M,
    settings: RansacSettings,
    max_gap: f64,
    seed: Option<u64>,
) -> Vec<FitResult<M>> {
    let mut ransac = Ransac::new(
        settings,
        sampler_from(seed),
        GapSegmentedTest::new(max_gap),
    );
    find_all_functions(points, prototype, &mut ransac)
}

fn sampler_from(seed: Option<u64>) -> UniformRandomSampler {
    match seed {
        Some(seed) => UniformRandomSampler::from_seed(seed),
        None => UniformRandomSampler::new(),
    }
}
