//! Closest point on an axis-aligned ellipse.
//!
//! Works in the first quadrant on `|p|`: the parameter `t` of
//! `(a cos t, b sin t)` is corrected by locally approximating the ellipse
//! with its osculating circle, centered on the evolute. A handful of
//! iterations reaches double precision for all but the most eccentric
//! ellipses.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use crate::types::Point;

/// Foot point of `p` on the ellipse `(x/a)^2 + (y/b)^2 = 1`.
///
/// `a` and `b` are the semi-axes along x and y; `p` is given in the
/// ellipse's axis-aligned, centered frame.
pub fn closest_point_axis_aligned(a: f64, b: f64, p: &Point, iterations: usize) -> Point {
    let px = p.x.abs();
    let py = p.y.abs();
    let a2 = a * a;
    let b2 = b * b;

    let mut t = FRAC_PI_4;
    for _ in 0..iterations {
        let (sin, cos) = t.sin_cos();
        let x = a * cos;
        let y = b * sin;

        let ex = (a2 - b2) * cos.powi(3) / a;
        let ey = (b2 - a2) * sin.powi(3) / b;

        let rx = x - ex;
        let ry = y - ey;
        let qx = px - ex;
        let qy = py - ey;

        let r = ry.hypot(rx);
        let q = qy.hypot(qx);

        let arc = r * ((rx * qy - ry * qx) / (r * q)).clamp(-1.0, 1.0).asin();
        let dt = arc / (a2 + b2 - x * x - y * y).sqrt();

        let next = (t + dt).clamp(0.0, FRAC_PI_2);
        if !next.is_finite() {
            break;
        }
        t = next;
    }

    let (sin, cos) = t.sin_cos();
    Point::new((a * cos).copysign(p.x), (b * sin).copysign(p.y))
}
