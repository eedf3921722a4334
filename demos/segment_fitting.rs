//! Example: Extracting line segments and a parabola with gap segmentation
//!
//! This example fits lines to two separated segments of noisy samples and a
//! parabola to a third, using `fit_segments` for multi-instance extraction.

use rand::seq::SliceRandom;
use rand::Rng;
use shapefit::{fit_segments, Function1D, Linear, Point, Quadratic, RansacSettings};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Segment Fitting Example ===\n");

    let mut rng = rand::thread_rng();
    let mut points = Vec::new();

    // Two segments of y = 0.5x + 2, separated by a gap of 30 in x
    for i in 0..40 {
        let x = i as f64 * 0.5;
        points.push(Point::new(x, 0.5 * x + 2.0 + rng.gen_range(-0.1..0.1)));
    }
    for i in 0..25 {
        let x = 50.0 + i as f64 * 0.5;
        points.push(Point::new(x, 0.5 * x + 2.0 + rng.gen_range(-0.1..0.1)));
    }

    // Background outliers
    for _ in 0..20 {
        points.push(Point::new(rng.gen_range(0.0..65.0), rng.gen_range(-10.0..50.0)));
    }
    points.shuffle(&mut rng);

    println!("Generated {} points (two collinear segments plus outliers)\n", points.len());

    let settings = RansacSettings::new(500, 0.3, 0.1, 10);
    let max_gap = 2.0;
    let segments = fit_segments(&points, &Linear::new(), settings, max_gap, None);

    println!("Linear segments:");
    for (k, segment) in segments.iter().enumerate() {
        let first = segment.inliers.first().map(|m| m.point().x).unwrap_or(f64::NAN);
        let last = segment.inliers.last().map(|m| m.point().x).unwrap_or(f64::NAN);
        println!(
            "  #{}: {} with {} inliers spanning x in [{:.1}, {:.1}]",
            k,
            segment.model,
            segment.inliers.len(),
            first,
            last
        );
    }

    // A single parabola in its own point set
    let parabola: Vec<Point> = (0..50)
        .map(|i| {
            let x = -5.0 + i as f64 * 0.2;
            Point::new(x, 0.3 * x * x - x + 1.0 + rng.gen_range(-0.05..0.05))
        })
        .collect();
    let settings = RansacSettings::new(200, 0.2, 0.5, 20);
    let curves = fit_segments(&parabola, &Quadratic::new(), settings, 1.0, Some(42));

    println!("\nQuadratic fit:");
    for curve in &curves {
        println!(
            "  {} ({} inliers), f(0) = {:.3}",
            curve.model,
            curve.inliers.len(),
            curve.model.predict(0.0)
        );
    }

    Ok(())
}
