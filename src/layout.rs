use std::f64::consts::{FRAC_PI_2, TAU};

use serde::{Deserialize, Serialize};

use crate::store::AppEntry;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

impl Canvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Point {
        Point {
            x: self.width / 2.0,
            y: self.height / 2.0,
        }
    }

    fn short_side(&self) -> f64 {
        self.width.min(self.height)
    }
}

/// How far buttons sit from the center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Radius {
    /// `ratio * min(width, height) - margin`
    Fraction { ratio: f64, margin: f64 },
    Fixed(f64),
}

impl Default for Radius {
    fn default() -> Self {
        Radius::Fraction {
            ratio: 1.0 / 3.0,
            margin: 0.0,
        }
    }
}

impl Radius {
    pub fn resolve(&self, canvas: Canvas) -> f64 {
        let r = match *self {
            Radius::Fraction { ratio, margin } => ratio * canvas.short_side() - margin,
            Radius::Fixed(r) => r,
        };
        r.max(0.0)
    }
}

/// Angle of slot `index` out of `count`: slot 0 at twelve o'clock, then clockwise
/// (screen y grows downwards).
pub fn slot_angle(index: usize, count: usize) -> f64 {
    TAU * index as f64 / count as f64 - FRAC_PI_2
}

/// Top-left anchors for `count` buttons of `diameter` evenly spaced on a circle.
pub fn layout(count: usize, canvas: Canvas, diameter: f64, radius: Radius) -> Vec<Point> {
    if count == 0 {
        return Vec::new();
    }
    let center = canvas.center();
    let r = radius.resolve(canvas);
    let half = diameter / 2.0;

    (0..count)
        .map(|i| {
            let angle = slot_angle(i, count);
            Point {
                x: center.x + r * angle.cos() - half,
                y: center.y + r * angle.sin() - half,
            }
        })
        .collect()
}

pub fn layout_entries(
    entries: &[&AppEntry],
    canvas: Canvas,
    diameter: f64,
    radius: Radius,
) -> Vec<Point> {
    layout(entries.len(), canvas, diameter, radius)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;
    const CANVAS: Canvas = Canvas {
        width: 900.0,
        height: 700.0,
    };

    fn centers(points: &[Point], diameter: f64) -> Vec<Point> {
        points
            .iter()
            .map(|p| Point {
                x: p.x + diameter / 2.0,
                y: p.y + diameter / 2.0,
            })
            .collect()
    }

    #[test]
    fn zero_entries_is_empty() {
        assert!(layout(0, CANVAS, 90.0, Radius::default()).is_empty());
        assert!(layout_entries(&[], CANVAS, 90.0, Radius::default()).is_empty());
    }

    #[test]
    fn one_point_per_entry() {
        for n in 1..=12 {
            assert_eq!(layout(n, CANVAS, 90.0, Radius::default()).len(), n);
        }
    }

    #[test]
    fn first_point_is_straight_above_center() {
        let points = layout(5, CANVAS, 90.0, Radius::default());
        let first = centers(&points, 90.0)[0];
        let r = 700.0 / 3.0;
        assert!((first.x - 450.0).abs() < EPS);
        assert!((first.y - (350.0 - r)).abs() < EPS);
        assert!((points[0].x - (450.0 - 45.0)).abs() < EPS);
    }

    #[test]
    fn spacing_is_even_and_clockwise() {
        let n = 7;
        let center = CANVAS.center();
        let points = centers(&layout(n, CANVAS, 80.0, Radius::default()), 80.0);
        let step = TAU / n as f64;

        for (i, p) in points.iter().enumerate() {
            let angle = (p.y - center.y).atan2(p.x - center.x);
            let expected = slot_angle(i, n);
            let diff = (angle - expected).rem_euclid(TAU);
            assert!(diff < 1e-9 || TAU - diff < 1e-9, "slot {i}");
        }
        for pair in points.windows(2) {
            let a = (pair[0].y - center.y).atan2(pair[0].x - center.x);
            let b = (pair[1].y - center.y).atan2(pair[1].x - center.x);
            let delta = (b - a).rem_euclid(TAU);
            assert!((delta - step).abs() < 1e-9);
        }
        // second slot is to the right of the first
        assert!(points[1].x > points[0].x);
    }

    #[test]
    fn all_points_lie_on_the_radius() {
        let radius = Radius::Fixed(120.0);
        let center = CANVAS.center();
        for p in centers(&layout(9, CANVAS, 60.0, radius), 60.0) {
            let dist = ((p.x - center.x).powi(2) + (p.y - center.y).powi(2)).sqrt();
            assert!((dist - 120.0).abs() < 1e-9);
        }
    }

    #[test]
    fn radius_policies() {
        let canvas = Canvas::new(800.0, 600.0);
        assert!((Radius::default().resolve(canvas) - 200.0).abs() < EPS);
        let inset = Radius::Fraction {
            ratio: 1.0 / 2.5,
            margin: 40.0,
        };
        assert!((inset.resolve(canvas) - 200.0).abs() < EPS);
        assert_eq!(Radius::Fixed(150.0).resolve(canvas), 150.0);
        assert_eq!(Radius::Fixed(-5.0).resolve(canvas), 0.0);
    }

    #[test]
    fn resize_changes_positions() {
        let small = layout(3, Canvas::new(400.0, 400.0), 50.0, Radius::default());
        let large = layout(3, Canvas::new(800.0, 800.0), 50.0, Radius::default());
        assert_ne!(small, large);
    }
}
