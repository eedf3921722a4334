//! Inlier tests plugged into [`Ransac`](crate::core::Ransac).
//!
//! All three share the same counting rule: a candidate is an inlier iff its
//! distance is strictly below `max_error`, the cost is the outlier ratio, and
//! a hypothesis passes iff the inlier count and ratio satisfy
//! [`RansacSettings::accepts`].
//!
//! - [`InlierCountTest`]: plain unordered counting.
//! - [`GapSegmentedTest`]: open curves; keeps the largest run of inliers
//!   without gaps along x.
//! - [`ShapeConstrainedTest`]: closed shapes; rejects shapes outside an
//!   area/ratio window before counting.

use crate::core::{ClosedShape, InlierTest, Model};
use crate::settings::{RansacSettings, ShapeBounds};
use crate::types::PointMatch;

fn collect_inliers<M: Model>(
    model: &M,
    candidates: &mut [PointMatch],
    inliers: &mut Vec<PointMatch>,
    max_error: f64,
) {
    inliers.clear();
    for candidate in candidates.iter_mut() {
        candidate.apply(model);
        if candidate.distance() < max_error {
            inliers.push(*candidate);
        }
    }
}

fn assign_cost<M: Model>(
    model: &mut M,
    num_inliers: usize,
    num_candidates: usize,
    settings: &RansacSettings,
) -> bool {
    if num_candidates == 0 {
        return false;
    }
    let ratio = num_inliers as f64 / num_candidates as f64;
    model.set_cost((1.0 - ratio).clamp(0.0, 1.0));
    settings.accepts(num_inliers, num_candidates)
}

/// Unordered inlier counting.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlierCountTest;

impl<M: Model> InlierTest<M> for InlierCountTest {
    fn test(
        &self,
        model: &mut M,
        candidates: &mut [PointMatch],
        inliers: &mut Vec<PointMatch>,
        settings: &RansacSettings,
    ) -> bool {
        collect_inliers(model, candidates, inliers, settings.max_error);
        assign_cost(model, inliers.len(), candidates.len(), settings)
    }
}

/// Inlier counting restricted to the largest gap-free run along x.
///
/// Inliers are sorted by x and split wherever two consecutive x values are
/// more than `max_gap` apart. Only the largest run survives; on a tie the
/// later (larger-x) run is kept.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GapSegmentedTest {
    pub max_gap: f64,
}

impl GapSegmentedTest {
    pub fn new(max_gap: f64) -> Self {
        Self { max_gap }
    }

    /// Reduce `inliers` to its largest gap-free run, sorted by x.
    pub fn keep_largest_run(&self, inliers: &mut Vec<PointMatch>) {
        if inliers.len() <= 1 {
            return;
        }
        inliers.sort_by(|a, b| a.point().x.total_cmp(&b.point().x));

        let len = inliers.len();
        let mut best = (0, 0);
        let mut start = 0;
        for i in 1..=len {
            let closes_run =
                i == len || inliers[i].point().x - inliers[i - 1].point().x > self.max_gap;
            if closes_run {
                if i - start >= best.1 - best.0 {
                    best = (start, i);
                }
                start = i;
            }
        }

        inliers.truncate(best.1);
        inliers.drain(..best.0);
    }
}

impl<M: Model> InlierTest<M> for GapSegmentedTest {
    fn test(
        &self,
        model: &mut M,
        candidates: &mut [PointMatch],
        inliers: &mut Vec<PointMatch>,
        settings: &RansacSettings,
    ) -> bool {
        collect_inliers(model, candidates, inliers, settings.max_error);
        self.keep_largest_run(inliers);
        assign_cost(model, inliers.len(), candidates.len(), settings)
    }
}

/// Inlier counting for closed shapes inside an area/ratio window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeConstrainedTest {
    pub bounds: ShapeBounds,
}

impl ShapeConstrainedTest {
    pub fn new(bounds: ShapeBounds) -> Self {
        Self { bounds }
    }
}

impl<M: Model + ClosedShape> InlierTest<M> for ShapeConstrainedTest {
    fn test(
        &self,
        model: &mut M,
        candidates: &mut [PointMatch],
        inliers: &mut Vec<PointMatch>,
        settings: &RansacSettings,
    ) -> bool {
        if !self.bounds.contains(model.area(), model.ratio()) {
            inliers.clear();
            return false;
        }
        InlierCountTest.test(model, candidates, inliers, settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Circle, Linear};
    use crate::types::{matches_from, Point};

    fn xs(inliers: &[PointMatch]) -> Vec<f64> {
        inliers.iter().map(|m| m.point().x).collect()
    }

    #[test]
    fn inlier_count_uses_strict_threshold() {
        let mut model = Linear::from_coefficients(0.0, 0.0);
        let mut candidates = matches_from(&[
            Point::new(0.0, 0.5),
            Point::new(1.0, 1.0),
            Point::new(2.0, -0.2),
            Point::new(3.0, 4.0),
        ]);
        let mut inliers = Vec::new();
        let settings = RansacSettings::new(1, 1.0, 0.0, 1);

        let good = InlierCountTest.test(&mut model, &mut candidates, &mut inliers, &settings);

        assert!(good);
        assert_eq!(xs(&inliers), vec![0.0, 2.0]);
        assert!((model.cost() - 0.5).abs() < 1e-12);
        assert!((candidates[3].distance() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn gap_segmentation_keeps_largest_run() {
        let test = GapSegmentedTest::new(1.5);
        let mut inliers = matches_from(&[
            Point::new(10.0, 0.0),
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(11.0, 0.0),
        ]);
        test.keep_largest_run(&mut inliers);
        assert_eq!(xs(&inliers), vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn gap_segmentation_tie_keeps_later_run() {
        let test = GapSegmentedTest::new(1.0);
        let mut inliers = matches_from(&[
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(5.0, 0.0),
            Point::new(6.0, 0.0),
            Point::new(20.0, 0.0),
        ]);
        test.keep_largest_run(&mut inliers);
        assert_eq!(xs(&inliers), vec![5.0, 6.0]);
    }

    #[test]
    fn gap_segmented_cost_counts_kept_run_only() {
        let mut model = Linear::from_coefficients(0.0, 0.0);
        let mut candidates = matches_from(&[
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(50.0, 0.0),
        ]);
        let mut inliers = Vec::new();
        let settings = RansacSettings::new(1, 0.5, 0.5, 3);

        let good =
            GapSegmentedTest::new(5.0).test(&mut model, &mut candidates, &mut inliers, &settings);

        assert!(good);
        assert_eq!(inliers.len(), 3);
        assert!((model.cost() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn shape_outside_bounds_is_rejected() {
        let mut circle = Circle::from_parameters(Point::new(0.0, 0.0), 10.0);
        let mut candidates = matches_from(&[
            Point::new(10.0, 0.0),
            Point::new(0.0, 10.0),
            Point::new(-10.0, 0.0),
        ]);
        let mut inliers = Vec::new();
        let settings = RansacSettings::new(1, 0.5, 0.0, 1);

        let too_small = ShapeConstrainedTest::new(ShapeBounds::new(0.0, 100.0, 1.0, 2.0));
        assert!(!too_small.test(&mut circle, &mut candidates, &mut inliers, &settings));
        assert!(inliers.is_empty());

        let fits = ShapeConstrainedTest::new(ShapeBounds::new(100.0, 1000.0, 1.0, 2.0));
        assert!(fits.test(&mut circle, &mut candidates, &mut inliers, &settings));
        assert_eq!(inliers.len(), 3);
        assert_eq!(circle.cost(), 0.0);
    }
}
