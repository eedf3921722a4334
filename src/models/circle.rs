//! Circle `(x - u)^2 + (y - v)^2 = r^2`.

use std::f64::consts::PI;
use std::fmt;

use crate::core::{ClosedShape, Model};
use crate::error::{ensure_points, FitError, Result};
use crate::types::Point;

/// Circle fitted in closed form from centered second and third moments.
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    center: Point,
    radius: f64,
    cost: f64,
}

impl Default for Circle {
    fn default() -> Self {
        Self::new()
    }
}

impl Circle {
    pub const MIN_NUM_POINTS: usize = 3;

    pub fn new() -> Self {
        Self::from_parameters(Point::origin(), 0.0)
    }

    pub fn from_parameters(center: Point, radius: f64) -> Self {
        Self {
            center,
            radius,
            cost: f64::MAX,
        }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl Model for Circle {
    fn min_sample_size(&self) -> usize {
        Self::MIN_NUM_POINTS
    }

    fn fit(&mut self, points: &[Point]) -> Result<()> {
        ensure_points(Self::MIN_NUM_POINTS, points.len())?;
        let n = points.len() as f64;
        let centroid = points.iter().fold(Point::origin(), |acc, p| acc + p.coords / n);

        let (mut uu, mut uv, mut vv) = (0.0, 0.0, 0.0);
        let (mut uuu, mut uuv, mut uvv, mut vvv) = (0.0, 0.0, 0.0, 0.0);
        for p in points {
            let u = p.x - centroid.x;
            let v = p.y - centroid.y;
            uu += u * u;
            uv += u * v;
            vv += v * v;
            uuu += u * u * u;
            uuv += u * u * v;
            uvv += u * v * v;
            vvv += v * v * v;
        }

        let denom = uu * vv - uv * uv;
        if !(denom > 1e-12 * uu * vv) {
            return Err(FitError::DegenerateFit("points are collinear"));
        }

        let su = uuu + uvv;
        let sv = uuv + vvv;
        let f = 0.5 / denom;
        let u = (vv * su - uv * sv) * f;
        let v = (uu * sv - uv * su) * f;

        self.radius = (u * u + v * v + (uu + vv) / n).sqrt();
        self.center = Point::new(centroid.x + u, centroid.y + v);
        Ok(())
    }

    fn distance_to(&self, point: &Point) -> f64 {
        ((point - self.center).norm() - self.radius).abs()
    }

    fn evaluate(&self, x: f64, y: f64) -> f64 {
        self.radius * self.radius - (Point::new(x, y) - self.center).norm_squared()
    }

    fn cost(&self) -> f64 {
        self.cost
    }

    fn set_cost(&mut self, cost: f64) {
        self.cost = cost;
    }
}

impl ClosedShape for Circle {
    fn center(&self) -> Point {
        self.center
    }

    fn radius_at(&self, _t: f64) -> f64 {
        self.radius
    }

    fn area(&self) -> f64 {
        PI * self.radius * self.radius
    }

    fn ratio(&self) -> f64 {
        1.0
    }
}

impl fmt::Display for Circle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(x-{})^2 + (y-{})^2 = {}^2",
            self.center.x, self.center.y, self.radius
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn three_points_define_the_circle() {
        let mut circle = Circle::new();
        circle
            .fit(&[
                Point::new(6.0, 2.0),
                Point::new(1.0, 7.0),
                Point::new(-4.0, 2.0),
            ])
            .unwrap();
        assert_abs_diff_eq!(circle.center().x, 1.0, epsilon = 1e-10);
        assert_abs_diff_eq!(circle.center().y, 2.0, epsilon = 1e-10);
        assert_abs_diff_eq!(circle.radius(), 5.0, epsilon = 1e-10);
    }

    #[test]
    fn fits_samples_on_a_pixel_scale_circle() {
        let center = Point::new(512.0, 384.0);
        let points: Vec<Point> = (0..20)
            .map(|k| {
                let t = 0.3 * k as f64;
                Point::new(center.x + 40.0 * t.cos(), center.y + 40.0 * t.sin())
            })
            .collect();
        let mut circle = Circle::new();
        circle.fit(&points).unwrap();
        assert_abs_diff_eq!(circle.radius(), 40.0, epsilon = 1e-8);
        for p in &points {
            assert!(circle.distance_to(p) < 1e-8);
        }
    }

    #[test]
    fn collinear_points_are_degenerate() {
        let mut circle = Circle::new();
        let points = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(3.0, 3.0),
        ];
        assert!(matches!(circle.fit(&points), Err(FitError::DegenerateFit(_))));
    }

    #[test]
    fn geometry_and_distance() {
        let circle = Circle::from_parameters(Point::new(1.0, 1.0), 2.0);
        assert_abs_diff_eq!(circle.distance_to(&Point::new(1.0, 1.0)), 2.0);
        assert_abs_diff_eq!(circle.distance_to(&Point::new(6.0, 1.0)), 3.0);
        assert_abs_diff_eq!(circle.evaluate(1.0, 1.0), 4.0);
        assert_abs_diff_eq!(circle.evaluate(1.0, 4.0), -5.0);
        assert_abs_diff_eq!(circle.area(), 4.0 * PI);
        assert_eq!(circle.ratio(), 1.0);

        let hit = circle.intersects_at(&Point::new(1.0, 10.0));
        assert_abs_diff_eq!(hit.x, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(hit.y, 3.0, epsilon = 1e-12);
    }
}
