use std::f64::consts::PI;

use crate::cell::Geometry;
use crate::geometry::Point;
use crate::sink::PathStep;
use crate::style::{Direction, Style};

/// Accumulates path steps for one vertex, mapping every submitted point
/// from the shape's local frame into display-unit world coordinates.
///
/// The local frame is always "as if EAST": for north/south facing shapes
/// the width and height are swapped and the origin reflected along the
/// diagonal, and the facing is folded into the rotation angle.
#[derive(Debug)]
pub struct PathBuilder {
    steps: Vec<PathStep>,
    origin: Point,
    center: Point,
    width: f64,
    height: f64,
    angle: f64,
}

impl PathBuilder {
    pub fn new(geometry: &Geometry, style: &Style) -> Self {
        let mut origin = Point::new(geometry.x / 100.0, geometry.y / 100.0);
        let mut width = geometry.width / 100.0;
        let mut height = geometry.height / 100.0;
        let mut center = Point::new(width / 2.0, height / 2.0);
        let mut angle = -style.rotation * PI / 180.0;
        if style.direction.is_vertical() {
            origin.x += (width - height) / 2.0;
            origin.y += (height - width) / 2.0;
            std::mem::swap(&mut width, &mut height);
            center = Point::new(center.y, center.x);
        }
        angle += match style.direction {
            Direction::East => 0.0,
            Direction::South => -PI / 2.0,
            Direction::West => -PI,
            Direction::North => PI / 2.0,
        };
        Self {
            steps: Vec::new(),
            origin,
            center,
            width,
            height,
            angle,
        }
    }

    /// Local-frame width (already swapped for vertical facings).
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Local-frame height (already swapped for vertical facings).
    pub fn height(&self) -> f64 {
        self.height
    }

    fn place(&self, x: f64, y: f64) -> Point {
        self.origin + Point::new(x, y).rotated_about(self.center, self.angle)
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        let to = self.place(x, y);
        self.steps.push(PathStep::MoveTo(to));
    }

    pub fn line_to(&mut self, x: f64, y: f64) {
        let to = self.place(x, y);
        self.steps.push(PathStep::LineTo(to));
    }

    pub fn quad_to(&mut self, x1: f64, y1: f64, x: f64, y: f64) {
        let ctrl = self.place(x1, y1);
        let to = self.place(x, y);
        self.steps.push(PathStep::QuadTo { ctrl, to });
    }

    pub fn curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) {
        let ctrl1 = self.place(x1, y1);
        let ctrl2 = self.place(x2, y2);
        let to = self.place(x, y);
        self.steps.push(PathStep::CurveTo { ctrl1, ctrl2, to });
    }

    pub fn close(&mut self) {
        self.steps.push(PathStep::Close);
    }

    /// Moves to the first point, draws lines through the rest, and
    /// optionally closes the subpath.
    pub fn add_points(&mut self, points: &[(f64, f64)], close_path: bool) {
        let mut points = points.iter();
        let Some(&(x, y)) = points.next() else {
            return;
        };
        self.move_to(x, y);
        for &(x, y) in points {
            self.line_to(x, y);
        }
        if close_path {
            self.close();
        }
    }

    pub fn into_steps(self) -> Vec<PathStep> {
        self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn geometry(x: f64, y: f64, width: f64, height: f64) -> Geometry {
        Geometry {
            x,
            y,
            width,
            height,
            ..Geometry::default()
        }
    }

    fn style(direction: Direction, rotation: f64) -> Style {
        Style {
            direction,
            rotation,
            ..Style::default()
        }
    }

    fn assert_step_at(step: &PathStep, x: f64, y: f64) {
        let point = match step {
            PathStep::MoveTo(p) | PathStep::LineTo(p) => *p,
            other => panic!("unexpected step {other:?}"),
        };
        assert!(
            (point.x - x).abs() < EPS && (point.y - y).abs() < EPS,
            "expected ({x}, {y}), got ({}, {})",
            point.x,
            point.y
        );
    }

    #[test]
    fn test_east_unrotated_is_pure_translation() {
        let mut builder = PathBuilder::new(
            &geometry(1000.0, 500.0, 2000.0, 1000.0),
            &style(Direction::East, 0.0),
        );
        assert_eq!(builder.width(), 20.0);
        assert_eq!(builder.height(), 10.0);
        builder.move_to(0.0, 0.0);
        builder.line_to(20.0, 10.0);
        let steps = builder.into_steps();
        assert_step_at(&steps[0], 10.0, 5.0);
        assert_step_at(&steps[1], 30.0, 15.0);
    }

    #[test]
    fn test_south_facing_swaps_and_turns_clockwise() {
        let mut builder = PathBuilder::new(
            &geometry(0.0, 0.0, 1000.0, 500.0),
            &style(Direction::South, 0.0),
        );
        // Local frame sees the swapped dimensions.
        assert_eq!(builder.width(), 5.0);
        assert_eq!(builder.height(), 10.0);
        builder.move_to(0.0, 0.0);
        builder.line_to(5.0, 0.0);
        builder.line_to(0.0, 10.0);
        let steps = builder.into_steps();
        // Local top-left lands on the world top-right corner.
        assert_step_at(&steps[0], 10.0, 0.0);
        assert_step_at(&steps[1], 10.0, 5.0);
        assert_step_at(&steps[2], 0.0, 0.0);
    }

    #[test]
    fn test_north_facing_turns_counter_clockwise() {
        let mut builder = PathBuilder::new(
            &geometry(0.0, 0.0, 1000.0, 500.0),
            &style(Direction::North, 0.0),
        );
        builder.move_to(0.0, 0.0);
        let steps = builder.into_steps();
        // Local top-left lands on the world bottom-left corner.
        assert_step_at(&steps[0], 0.0, 5.0);
    }

    #[test]
    fn test_west_facing_is_half_turn() {
        let mut builder = PathBuilder::new(
            &geometry(0.0, 0.0, 1000.0, 500.0),
            &style(Direction::West, 0.0),
        );
        builder.move_to(0.0, 0.0);
        let steps = builder.into_steps();
        assert_step_at(&steps[0], 10.0, 5.0);
    }

    #[test]
    fn test_rotation_spins_about_the_center() {
        // 180° rotation maps the local origin onto the far corner.
        let mut builder = PathBuilder::new(
            &geometry(0.0, 0.0, 1000.0, 500.0),
            &style(Direction::East, 180.0),
        );
        builder.move_to(0.0, 0.0);
        let steps = builder.into_steps();
        assert_step_at(&steps[0], 10.0, 5.0);
    }

    #[test]
    fn test_curve_steps_carry_transformed_controls() {
        let mut builder = PathBuilder::new(
            &geometry(100.0, 200.0, 1000.0, 1000.0),
            &style(Direction::East, 0.0),
        );
        builder.quad_to(10.0, 0.0, 10.0, 5.0);
        builder.curve_to(0.0, 0.0, 1.0, 1.0, 2.0, 2.0);
        let steps = builder.into_steps();
        match steps[0] {
            PathStep::QuadTo { ctrl, to } => {
                assert!((ctrl.x - 11.0).abs() < EPS && (ctrl.y - 2.0).abs() < EPS);
                assert!((to.x - 11.0).abs() < EPS && (to.y - 7.0).abs() < EPS);
            }
            ref other => panic!("unexpected step {other:?}"),
        }
        match steps[1] {
            PathStep::CurveTo { ctrl1, ctrl2, to } => {
                assert!((ctrl1.x - 1.0).abs() < EPS && (ctrl1.y - 2.0).abs() < EPS);
                assert!((ctrl2.x - 2.0).abs() < EPS && (ctrl2.y - 3.0).abs() < EPS);
                assert!((to.x - 3.0).abs() < EPS && (to.y - 4.0).abs() < EPS);
            }
            ref other => panic!("unexpected step {other:?}"),
        }
    }

    #[test]
    fn test_add_points_open_and_closed() {
        let mut builder = PathBuilder::new(
            &geometry(0.0, 0.0, 1000.0, 1000.0),
            &style(Direction::East, 0.0),
        );
        builder.add_points(&[], true);
        assert!(builder.steps.is_empty());
        builder.add_points(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)], true);
        let closed: Vec<_> = builder.into_steps();
        assert_eq!(closed.len(), 4);
        assert!(matches!(closed[0], PathStep::MoveTo(_)));
        assert!(matches!(closed[3], PathStep::Close));

        let mut builder = PathBuilder::new(
            &geometry(0.0, 0.0, 1000.0, 1000.0),
            &style(Direction::East, 0.0),
        );
        builder.add_points(&[(0.0, 0.0), (1.0, 1.0)], false);
        let open = builder.into_steps();
        assert_eq!(open.len(), 2);
        assert!(matches!(open[1], PathStep::LineTo(_)));
    }
}
