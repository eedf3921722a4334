//! Integration tests for the public API.
//!
//! These tests run the full RANSAC pipeline on seeded synthetic data and
//! check the recovered models and inlier sets.

use std::collections::HashSet;
use std::f64::consts::TAU;

use approx::assert_abs_diff_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shapefit::*;

fn ellipse_samples(
    rng: &mut StdRng,
    center: (f64, f64),
    axes: (f64, f64),
    angle: f64,
    n: usize,
    noise: f64,
) -> Vec<Point> {
    let (sin, cos) = angle.sin_cos();
    (0..n)
        .map(|k| {
            let t = k as f64 * TAU / n as f64;
            let (u, v) = (axes.0 * t.cos(), axes.1 * t.sin());
            Point::new(
                center.0 + u * cos - v * sin + rng.gen_range(-noise..=noise),
                center.1 + u * sin + v * cos + rng.gen_range(-noise..=noise),
            )
        })
        .collect()
}

fn uniform_outliers(rng: &mut StdRng, n: usize, half_width: f64) -> Vec<Point> {
    (0..n)
        .map(|_| {
            Point::new(
                rng.gen_range(-half_width..half_width),
                rng.gen_range(-half_width..half_width),
            )
        })
        .collect()
}

fn keys(inliers: &[PointMatch]) -> HashSet<(u64, u64)> {
    inliers
        .iter()
        .map(|m| (m.point().x.to_bits(), m.point().y.to_bits()))
        .collect()
}

#[test]
fn test_eight_point_tilted_ellipse() {
    let points = [
        Point::new(0.0, 17.0),
        Point::new(377.0, 377.0),
        Point::new(507.0, 350.0),
        Point::new(640.0, 378.0),
        Point::new(694.0, 444.0),
        Point::new(639.0, 511.0),
        Point::new(508.0, 538.0),
        Point::new(376.0, 511.0),
    ];
    let mut ellipse = Ellipse::default();
    ellipse.fit(&points).unwrap();

    assert!(ellipse.is_ellipse());
    assert!(ellipse.area() > 0.0);
    assert!(ellipse.ratio() >= 1.0);
    assert!(ellipse.g() > 0.0);
}

#[test]
fn test_collinear_points_never_yield_an_ellipse() {
    let mut ellipse = Ellipse::default();
    let three = [
        Point::new(0.0, 0.0),
        Point::new(1.0, 2.0),
        Point::new(2.0, 4.0),
    ];
    assert!(ellipse.fit(&three).is_err());

    let five: Vec<Point> = (0..5).map(|i| Point::new(i as f64, 2.0 * i as f64)).collect();
    assert!(matches!(ellipse.fit(&five), Err(FitError::DegenerateFit(_))));
    assert!(!ellipse.is_ellipse());
}

#[test]
fn test_circle_recovered_among_outliers() {
    let mut rng = StdRng::seed_from_u64(2024);
    let mut points = ellipse_samples(&mut rng, (4.0, -7.0), (25.0, 25.0), 0.0, 40, 0.05);
    points.extend(uniform_outliers(&mut rng, 20, 50.0));

    let settings = RansacSettings::new(300, 0.5, 0.3, 20);
    let mut ransac = Ransac::new(
        settings,
        UniformRandomSampler::from_seed(7),
        InlierCountTest,
    );
    let found = find_function(&points, &Circle::new(), &mut ransac).unwrap();

    assert!(found.inliers.len() >= 40);
    assert_abs_diff_eq!(found.model.radius(), 25.0, epsilon = 0.1);
    assert_abs_diff_eq!(found.model.center().x, 4.0, epsilon = 0.1);
    assert_abs_diff_eq!(found.model.center().y, -7.0, epsilon = 0.1);
    assert!(found.model.cost() <= 1.0 - 40.0 / 60.0 + 1e-12);
}

#[test]
fn test_ellipses_extracted_with_disjoint_inliers() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut points = ellipse_samples(&mut rng, (0.0, 0.0), (20.0, 10.0), 0.4, 40, 0.02);
    points.extend(ellipse_samples(&mut rng, (100.0, 50.0), (15.0, 12.0), -0.2, 30, 0.02));
    points.extend([
        Point::new(50.0, 25.0),
        Point::new(-40.0, 60.0),
        Point::new(70.0, -30.0),
    ]);

    let settings = RansacSettings::new(1500, 0.3, 0.1, 15);
    let results = fit_ellipses(
        &points,
        settings,
        ShapeBounds::unbounded(),
        ShapeDistance::default(),
        Some(1234),
    );

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].inliers.len(), 40);
    assert_eq!(results[1].inliers.len(), 30);
    assert!(keys(&results[0].inliers).is_disjoint(&keys(&results[1].inliers)));

    let first = &results[0].model;
    assert!(first.is_ellipse());
    assert_abs_diff_eq!(first.center().x, 0.0, epsilon = 0.1);
    assert_abs_diff_eq!(first.area(), 200.0 * std::f64::consts::PI, epsilon = 5.0);
    let second = &results[1].model;
    assert_abs_diff_eq!(second.center().x, 100.0, epsilon = 0.1);
    assert_abs_diff_eq!(second.center().y, 50.0, epsilon = 0.1);
}

#[test]
fn test_shape_bounds_filter_ellipses() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut points = ellipse_samples(&mut rng, (0.0, 0.0), (20.0, 10.0), 0.0, 40, 0.0);
    points.extend(ellipse_samples(&mut rng, (100.0, 0.0), (5.0, 5.0), 0.0, 30, 0.0));

    let settings = RansacSettings::new(300, 0.2, 0.1, 15);
    // only the small round shape fits in the window
    let bounds = ShapeBounds::new(10.0, 200.0, 1.0, 1.5);
    let results = fit_ellipses(&points, settings, bounds, ShapeDistance::default(), Some(8));

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].inliers.len(), 30);
    assert_abs_diff_eq!(results[0].model.center().x, 100.0, epsilon = 1e-6);
}

#[test]
fn test_iterative_and_brute_force_distances_agree() {
    let mut rng = StdRng::seed_from_u64(17);
    let points = ellipse_samples(&mut rng, (10.0, 20.0), (30.0, 12.0), 1.1, 50, 0.1);
    let mut iterative = Ellipse::new(ShapeDistance::iterative());
    iterative.fit(&points).unwrap();
    let brute = Ellipse::from_coefficients(
        iterative.coefficients(),
        ShapeDistance::BruteForce { step: 0.0005 },
    );

    let queries = [
        Point::new(13.0, 18.0),
        Point::new(15.0, 25.0),
        Point::new(60.0, 20.0),
        Point::new(-30.0, -10.0),
        Point::new(10.0, 60.0),
    ];
    for p in queries {
        assert_abs_diff_eq!(iterative.distance_to(&p), brute.distance_to(&p), epsilon = 1e-2);
    }
}

#[test]
fn test_gap_segmentation_splits_collinear_segments() {
    let mut points: Vec<Point> = (0..=20).map(|i| Point::new(i as f64, i as f64)).collect();
    points.extend((40..=60).map(|i| Point::new(i as f64, i as f64)));

    let settings = RansacSettings::new(50, 0.1, 0.2, 10);
    let results = fit_segments(&points, &Linear::new(), settings, 2.0, Some(3));

    assert_eq!(results.len(), 2);
    // equally long runs: the later one is taken first
    assert_eq!(results[0].inliers.len(), 21);
    assert_eq!(results[0].inliers[0].point().x, 40.0);
    assert_eq!(results[1].inliers.len(), 21);
    assert_eq!(results[1].inliers[0].point().x, 0.0);
    assert_abs_diff_eq!(results[1].model.slope(), 1.0, epsilon = 1e-9);
}

#[test]
fn test_cubic_recovered_among_outliers() {
    let mut rng = StdRng::seed_from_u64(31);
    let mut points: Vec<Point> = (0..61)
        .map(|i| {
            let x = -3.0 + 0.1 * i as f64;
            let y = 0.5 * x * x * x - x + 1.0 + rng.gen_range(-0.01..0.01);
            Point::new(x, y)
        })
        .collect();
    points.extend(uniform_outliers(&mut rng, 15, 10.0).into_iter().map(|p| {
        Point::new(p.x * 0.3, p.y + 5.0)
    }));

    let settings = RansacSettings::new(60, 0.1, 0.5, 30);
    let mut ransac = Ransac::new(
        settings,
        UniformRandomSampler::from_seed(4),
        InlierCountTest,
    );
    let found = find_function(&points, &Polynomial::new(3), &mut ransac).unwrap();

    assert!(found.inliers.len() >= 61);
    assert_abs_diff_eq!(found.model.coefficient(3), 0.5, epsilon = 0.02);
    assert_abs_diff_eq!(found.model.coefficient(1), -1.0, epsilon = 0.05);
    assert_abs_diff_eq!(found.model.coefficient(0), 1.0, epsilon = 0.05);
}

#[test]
fn test_clone_preserves_distances() {
    let queries = [Point::new(0.3, 2.0), Point::new(-4.0, 1.0), Point::new(7.0, -3.0)];

    let poly = Polynomial::from_coefficients(vec![0.0, -1.0, 0.0, 1.0]);
    let ellipse = Ellipse::from_geometry(
        Point::new(1.0, 1.0),
        6.0,
        3.0,
        0.7,
        ShapeDistance::default(),
    );
    let line = Linear::from_coefficients(0.5, 2.0);

    for p in &queries {
        assert_eq!(poly.clone().distance_to(p), poly.distance_to(p));
        assert_eq!(ellipse.clone().distance_to(p), ellipse.distance_to(p));
        assert_eq!(line.clone().distance_to(p), line.distance_to(p));
        // repeated queries are pure
        assert_eq!(poly.distance_to(p), poly.distance_to(p));
    }
}

#[test]
fn test_interpolated_model_in_ransac() {
    let mut points: Vec<Point> = (0..30)
        .map(|i| {
            let x = i as f64 * 0.2;
            Point::new(x, 0.25 * x * x + 1.0)
        })
        .collect();
    points.push(Point::new(2.0, 40.0));
    points.push(Point::new(3.0, -25.0));

    let prototype = Interpolated::new(Quadratic::new(), Polynomial::new(2), 0.5);
    let settings = RansacSettings::new(100, 0.05, 0.5, 20);
    let mut ransac = Ransac::new(
        settings,
        UniformRandomSampler::from_seed(12),
        InlierCountTest,
    );
    let found = find_function(&points, &prototype, &mut ransac).unwrap();

    assert_eq!(found.inliers.len(), 30);
    assert_abs_diff_eq!(found.model.predict(2.0), 2.0, epsilon = 1e-8);
}

#[test]
fn test_settings_round_trip_through_json() {
    let json = r#"{
        "iterations": 250,
        "max_error": 1.5,
        "min_inlier_ratio": 0.1,
        "min_num_inliers": 12
    }"#;
    let settings: RansacSettings = serde_json::from_str(json).unwrap();
    assert_eq!(settings, RansacSettings::new(250, 1.5, 0.1, 12));

    let strategy: ShapeDistance =
        serde_json::from_str(r#"{ "BruteForce": { "step": 0.02 } }"#).unwrap();
    assert_eq!(strategy, ShapeDistance::BruteForce { step: 0.02 });
}
