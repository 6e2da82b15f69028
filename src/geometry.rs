use std::f64::consts::PI;
use std::ops::Add;

/// A point in the engine's uniform coordinate space (hundredths of a
/// display unit on the input side, display units after scaling at the
/// sink boundary).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Rotates this point clockwise by `angle` radians about `center`.
    ///
    /// The current polar angle is recovered with `atan`, which needs an
    /// explicit branch when the point sits on the vertical through the
    /// center (`x == center.x`).
    pub fn rotated_about(self, center: Point, angle: f64) -> Self {
        let r = ((self.x - center.x).powi(2) + (self.y - center.y).powi(2)).sqrt();
        let old_angle = if self.x != center.x {
            ((self.y - center.y) / (self.x - center.x)).atan()
                + if self.x > center.x { 0.0 } else { PI }
        } else {
            (if self.y <= center.y { -1.0 } else { 1.0 }) * PI / 2.0
        };
        Self {
            x: center.x + r * (old_angle - angle).cos(),
            y: center.y + r * (old_angle - angle).sin(),
        }
    }

    /// Scales both coordinates by the given factor
    pub fn scale(self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, other: Point) -> Point {
        Point {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_close(p: Point, x: f64, y: f64) {
        assert!(
            (p.x - x).abs() < EPS && (p.y - y).abs() < EPS,
            "expected ({x}, {y}), got ({}, {})",
            p.x,
            p.y
        );
    }

    #[test]
    fn test_point_new() {
        let point = Point::new(3.5, 4.2);
        assert_eq!(point.x, 3.5);
        assert_eq!(point.y, 4.2);
    }

    #[test]
    fn test_point_add() {
        let result = Point::new(1.0, 2.0) + Point::new(3.0, 4.0);
        assert_eq!(result.x, 4.0);
        assert_eq!(result.y, 6.0);
    }

    #[test]
    fn test_point_scale() {
        let scaled = Point::new(2.0, 3.0).scale(2.5);
        assert_eq!(scaled.x, 5.0);
        assert_eq!(scaled.y, 7.5);
    }

    #[test]
    fn test_rotation_by_zero_is_identity() {
        let p = Point::new(7.0, -3.0);
        assert_close(p.rotated_about(Point::new(1.0, 1.0), 0.0), 7.0, -3.0);
    }

    #[test]
    fn test_rotation_quarter_turn() {
        // Clockwise quarter turn in a y-down coordinate system maps the
        // point east of the center onto the point north of it.
        let center = Point::new(2.0, 2.0);
        let p = Point::new(4.0, 2.0);
        assert_close(p.rotated_about(center, PI / 2.0), 2.0, 0.0);
    }

    #[test]
    fn test_rotation_half_turn() {
        let center = Point::new(0.0, 0.0);
        assert_close(Point::new(3.0, 4.0).rotated_about(center, PI), -3.0, -4.0);
    }

    #[test]
    fn test_rotation_on_vertical_axis() {
        // x == center.x exercises the atan-free branch.
        let center = Point::new(1.0, 1.0);
        assert_close(Point::new(1.0, 3.0).rotated_about(center, PI / 2.0), 3.0, 1.0);
        assert_close(Point::new(1.0, -1.0).rotated_about(center, PI / 2.0), -1.0, 1.0);
    }

    #[test]
    fn test_rotation_of_center_is_center() {
        let center = Point::new(5.0, 5.0);
        assert_close(center.rotated_about(center, 1.234), 5.0, 5.0);
    }

    #[test]
    fn test_rotation_preserves_radius() {
        let center = Point::new(1.0, -2.0);
        let p = Point::new(4.0, 2.0);
        let q = p.rotated_about(center, 0.7);
        let r_before = ((p.x - center.x).powi(2) + (p.y - center.y).powi(2)).sqrt();
        let r_after = ((q.x - center.x).powi(2) + (q.y - center.y).powi(2)).sqrt();
        assert!((r_before - r_after).abs() < EPS);
    }
}
