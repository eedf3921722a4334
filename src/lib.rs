//! # Shapefit - Robust Curve and Shape Fitting with RANSAC
//!
//! `shapefit` finds the lines, polynomials, circles and ellipses that best
//! explain subsets of a noisy 2D point set. Every model is fitted through the
//! same generic RANSAC core, and a multi-instance extractor repeatedly peels
//! off the inliers of each model found.
//!
//! ## Quick Start
//!
//! ```rust
//! use shapefit::{find_function, Circle, ClosedShape, InlierCountTest, Point, Ransac,
//!                RansacSettings, UniformRandomSampler};
//!
//! // A circle of radius 10 around (5, 5) plus two stray points
//! let mut points: Vec<Point> = (0..24)
//!     .map(|k| {
//!         let t = k as f64 * std::f64::consts::TAU / 24.0;
//!         Point::new(5.0 + 10.0 * t.cos(), 5.0 + 10.0 * t.sin())
//!     })
//!     .collect();
//! points.push(Point::new(40.0, -3.0));
//! points.push(Point::new(5.0, 5.5));
//!
//! let settings = RansacSettings::new(200, 0.1, 0.5, 10);
//! let mut ransac = Ransac::new(
//!     settings,
//!     UniformRandomSampler::from_seed(42),
//!     InlierCountTest,
//! );
//! let found = find_function(&points, &Circle::new(), &mut ransac).unwrap();
//!
//! assert_eq!(found.inliers.len(), 24);
//! assert!((found.model.radius() - 10.0).abs() < 1e-9);
//! assert!((found.model.center().x - 5.0).abs() < 1e-9);
//! ```
//!
//! ## Extending the Library
//!
//! The core is generic over three traits, each of which can be implemented
//! outside the crate:
//!
//! - **[`Model`](core::Model)**: fit, distance, algebraic value and cost
//! - **[`Sampler`](core::Sampler)**: draws the minimal samples
//! - **[`InlierTest<M>`](core::InlierTest)**: classifies candidates and scores the model
//!
//! Models additionally implement [`Function1D`](core::Function1D) (open
//! curves `y = f(x)`) or [`ClosedShape`](core::ClosedShape) (boundaries
//! parameterized by polar angle), which the gap-segmented and
//! shape-constrained tests rely on.
//!
//! ### Example: Custom Sampler
//!
//! ```rust
//! use shapefit::core::Sampler;
//!
//! /// Always draws the first indices of the pool.
//! struct FirstIndices;
//!
//! impl Sampler for FirstIndices {
//!     fn sample(&mut self, pool_size: usize, sample_size: usize, out: &mut [usize]) -> bool {
//!         if sample_size > pool_size || out.len() < sample_size {
//!             return false;
//!         }
//!         for (i, slot) in out.iter_mut().take(sample_size).enumerate() {
//!             *slot = i;
//!         }
//!         true
//!     }
//! }
//! ```
//!
//! ## Modules
//!
//! - **[`api`](api)**: Single and multi-instance extraction
//! - **[`core`](core)**: Core traits and the generic `Ransac` loop
//! - **[`distance`](distance)**: Point-to-curve and point-to-shape distances
//! - **[`error`](error)**: The `FitError` type
//! - **[`models`](models)**: Lines, polynomials, circles, ellipses and blends
//! - **[`samplers`](samplers)**: Built-in sampling strategies
//! - **[`scoring`](scoring)**: Built-in inlier tests
//! - **[`settings`](settings)**: Configuration types
//! - **[`types`](types)**: Points and point matches
//! - **[`utils`](utils)**: Small numeric helpers

pub mod api;
pub mod core;
pub mod distance;
pub mod error;
pub mod models;
pub mod samplers;
pub mod scoring;
pub mod settings;
pub mod types;
pub mod utils;

// Re-export high-level API
pub use api::{find_all_functions, find_function, fit_ellipses, fit_segments, FitResult};

// Re-export core traits and the RANSAC loop
pub use core::{ClosedShape, Function1D, InlierTest, Model, Ransac, Sampler};

pub use distance::{NewtonRaphson, ShapeDistance};
pub use error::{FitError, Result};
pub use models::{Circle, Ellipse, Interpolated, LeastSquares, Linear, Polynomial, Quadratic};
pub use samplers::UniformRandomSampler;
pub use scoring::{GapSegmentedTest, InlierCountTest, ShapeConstrainedTest};
pub use settings::{RansacSettings, ShapeBounds};
pub use types::{Point, PointMatch};
