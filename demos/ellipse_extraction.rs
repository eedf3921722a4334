//! Example: Extracting several ellipses from a cluttered point cloud
//!
//! Three noisy ellipses of different size are hidden among uniform
//! outliers. `fit_ellipses` peels them off one at a time; the shape bounds
//! reject hypotheses that are implausibly small, large or elongated.

use std::f64::consts::TAU;

use rand::Rng;
use shapefit::{fit_ellipses, ClosedShape, Point, RansacSettings, ShapeBounds, ShapeDistance};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Ellipse Extraction Example ===\n");

    let mut rng = rand::thread_rng();
    let shapes = [
        ((120.0, 80.0), (40.0, 25.0), 0.3, 80),
        ((300.0, 120.0), (30.0, 30.0), 0.0, 60),
        ((200.0, 260.0), (50.0, 20.0), -0.8, 90),
    ];

    let mut points = Vec::new();
    for &((cx, cy), (a, b), angle, n) in &shapes {
        let (sin, cos) = f64::sin_cos(angle);
        for k in 0..n {
            let t = k as f64 * TAU / n as f64;
            let (u, v) = (a * t.cos(), b * t.sin());
            points.push(Point::new(
                cx + u * cos - v * sin + rng.gen_range(-0.3..0.3),
                cy + u * sin + v * cos + rng.gen_range(-0.3..0.3),
            ));
        }
        println!(
            "True ellipse: center ({:.1}, {:.1}), semi-axes {:.1} x {:.1}, angle {:.2}",
            cx, cy, a, b, angle
        );
    }
    for _ in 0..60 {
        points.push(Point::new(rng.gen_range(0.0..400.0), rng.gen_range(0.0..350.0)));
    }
    println!("\nTotal points: {}\n", points.len());

    let settings = RansacSettings::new(3000, 1.0, 0.05, 30);
    let bounds = ShapeBounds::new(500.0, 20_000.0, 1.0, 4.0);
    let ellipses = fit_ellipses(&points, settings, bounds, ShapeDistance::iterative(), None);

    println!("Found {} ellipses:", ellipses.len());
    for (k, found) in ellipses.iter().enumerate() {
        let e = &found.model;
        let (r0, r1) = e.semi_axes();
        let c = e.center();
        println!(
            "  #{}: center ({:.1}, {:.1}), semi-axes {:.1} x {:.1}, area {:.0}, ratio {:.2}, \
             {} inliers",
            k,
            c.x,
            c.y,
            r0.max(r1),
            r0.min(r1),
            e.area(),
            e.ratio(),
            found.inliers.len()
        );
    }

    Ok(())
}
