//! RANSAC configuration types.
//!
//! Everything the robust fit depends on is supplied by the caller; there is
//! no hidden default epsilon or iteration count. Both structs derive serde
//! so they can be read from whatever configuration file the caller keeps.

use serde::{Deserialize, Serialize};

/// Acceptance parameters of a single RANSAC run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RansacSettings {
    /// Number of sampling iterations.
    pub iterations: usize,
    /// Inlier threshold: a point is an inlier iff its distance is strictly below.
    pub max_error: f64,
    /// The inlier ratio must strictly exceed this value.
    pub min_inlier_ratio: f64,
    /// Minimum absolute number of inliers.
    pub min_num_inliers: usize,
}

impl RansacSettings {
    pub fn new(
        iterations: usize,
        max_error: f64,
        min_inlier_ratio: f64,
        min_num_inliers: usize,
    ) -> Self {
        Self {
            iterations,
            max_error,
            min_inlier_ratio,
            min_num_inliers,
        }
    }

    /// Whether `num_inliers` out of `num_candidates` is an acceptable consensus.
    pub fn accepts(&self, num_inliers: usize, num_candidates: usize) -> bool {
        if num_candidates == 0 {
            return false;
        }
        let ratio = num_inliers as f64 / num_candidates as f64;
        num_inliers >= self.min_num_inliers && ratio > self.min_inlier_ratio
    }
}

/// Area and aspect-ratio window a closed shape must fall in to be tested.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeBounds {
    pub min_area: f64,
    pub max_area: f64,
    pub min_ratio: f64,
    pub max_ratio: f64,
}

impl ShapeBounds {
    pub fn new(min_area: f64, max_area: f64, min_ratio: f64, max_ratio: f64) -> Self {
        Self {
            min_area,
            max_area,
            min_ratio,
            max_ratio,
        }
    }

    /// Bounds that accept any shape with a finite area and ratio.
    pub fn unbounded() -> Self {
        Self::new(0.0, f64::MAX, 1.0, f64::MAX)
    }

    /// Inclusive check of both windows. NaN never passes.
    pub fn contains(&self, area: f64, ratio: f64) -> bool {
        area >= self.min_area
            && area <= self.max_area
            && ratio >= self.min_ratio
            && ratio <= self.max_ratio
    }
}
