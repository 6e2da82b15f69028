//! Resolves concrete edge endpoints on shape perimeters.
//!
//! The input stores bound edges abstractly (shape ids plus optional
//! fixed exit/entry ratios); the concrete points only exist after the
//! source and target rotation, facing and perimeter are applied. An
//! edge whose id names a cell missing from the table keeps its stored
//! endpoint untouched.

use std::f64::consts::PI;

use log::warn;

use crate::cell::{Cell, CellTable};
use crate::geometry::Point;
use crate::render::perimeter::PerimeterModel;
use crate::style::{Direction, EdgeStyle};

/// The outgoing stub directions chosen for an orthogonal edge; `None`
/// for straight edges, which have no routing to feed.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EdgeAnchors {
    pub start_dir: Option<Direction>,
    pub end_dir: Option<Direction>,
}

/// Overwrites the edge's `source_point`/`target_point` with concrete
/// perimeter points, and returns the stub directions for the router.
pub(crate) fn set_end_points(cell: &mut Cell, cells: &CellTable) -> EdgeAnchors {
    if !cell.edge {
        return EdgeAnchors::default();
    }
    let source = cells.lookup(cell.source_id.as_deref());
    let target = cells.lookup(cell.target_id.as_deref());
    if cell.source_id.is_some() && source.is_none() {
        warn!(edge_id = cell.id.as_str(); "edge source shape not in cell table");
    }
    if cell.target_id.is_some() && target.is_none() {
        warn!(edge_id = cell.id.as_str(); "edge target shape not in cell table");
    }

    if cell.style.start_fixed {
        if let (Some(source), Some(exit_x), Some(exit_y)) =
            (source, cell.style.exit_x, cell.style.exit_y)
        {
            cell.geometry.source_point = endpoint_in_shape(
                exit_x,
                exit_y,
                source,
                cell.style.exit_dx,
                cell.style.exit_dy,
            );
        }
    }
    if cell.style.end_fixed {
        if let (Some(target), Some(entry_x), Some(entry_y)) =
            (target, cell.style.entry_x, cell.style.entry_y)
        {
            cell.geometry.target_point = endpoint_in_shape(
                entry_x,
                entry_y,
                target,
                cell.style.entry_dx,
                cell.style.entry_dy,
            );
        }
    }

    let mut anchors = EdgeAnchors::default();
    match cell.style.edge_style {
        EdgeStyle::Straight => {
            // With both sides pinned there is nothing left to resolve,
            // and the endpoints stay in the edge's own frame.
            if cell.style.start_fixed && cell.style.end_fixed {
                return anchors;
            }
            resolve_straight(cell, source, target);
        }
        EdgeStyle::Orthogonal => anchors = resolve_orthogonal(cell, source, target),
    }

    // A shape nested in a group stores coordinates relative to its
    // parent; shift the finished endpoint into the parent's frame.
    if let Some(parent) = source.and_then(|s| cells.lookup(s.parent_id.as_deref())) {
        cell.geometry.source_point.x += parent.geometry.x;
        cell.geometry.source_point.y += parent.geometry.y;
    }
    if let Some(parent) = target.and_then(|t| cells.lookup(t.parent_id.as_deref())) {
        cell.geometry.target_point.x += parent.geometry.x;
        cell.geometry.target_point.y += parent.geometry.y;
    }
    anchors
}

fn resolve_straight(cell: &mut Cell, source: Option<&Cell>, target: Option<&Cell>) {
    // An endpoint whose shape is missing from the table degrades to a
    // fixed one: the stored point is used as-is.
    let start_fixed = cell.style.start_fixed || source.is_none();
    let end_fixed = cell.style.end_fixed || target.is_none();
    if start_fixed && end_fixed {
        return;
    }
    let (start_x, start_y) = match source {
        Some(source) if !start_fixed => (
            source.geometry.x + source.geometry.width / 2.0,
            source.geometry.y + source.geometry.height / 2.0,
        ),
        _ => (cell.geometry.source_point.x, cell.geometry.source_point.y),
    };
    let (end_x, end_y) = match target {
        Some(target) if !end_fixed => (
            target.geometry.x + target.geometry.width / 2.0,
            target.geometry.y + target.geometry.height / 2.0,
        ),
        _ => (cell.geometry.target_point.x, cell.geometry.target_point.y),
    };
    if let (false, Some(source)) = (start_fixed, source) {
        let (in_x, in_y) = match cell.geometry.waypoints.front() {
            None => (end_x, end_y),
            Some(p) => (p.x, p.y),
        };
        let mut angle = (in_y - start_y).atan2(in_x - start_x);
        angle -= source.style.direction.facing_angle();
        angle -= source.style.rotation * PI / 180.0;
        let m = angle.tan();
        let (out_x, out_y) = if m.abs() > 1.0 {
            let out_y = if in_y < start_y { 0.0 } else { 1.0 };
            (0.5 + (if in_y < start_y { -0.5 } else { 0.5 }) / m, out_y)
        } else {
            let out_x = if in_x < start_x { 0.0 } else { 1.0 };
            (out_x, 0.5 + m * (if in_x < start_x { -0.5 } else { 0.5 }))
        };
        cell.geometry.source_point = endpoint_in_shape(out_x, out_y, source, 0.0, 0.0);
    }
    if let (false, Some(target)) = (end_fixed, target) {
        let (in_x, in_y) = match cell.geometry.waypoints.back() {
            None => (start_x, start_y),
            Some(p) => (p.x, p.y),
        };
        let mut angle = (end_y - in_y).atan2(end_x - in_x);
        angle += PI;
        angle -= target.style.direction.facing_angle();
        angle -= target.style.rotation * PI / 180.0;
        let m = angle.tan();
        let (out_x, out_y) = if m.abs() > 1.0 {
            let out_y = if end_y < in_y { 1.0 } else { 0.0 };
            (0.5 + (if end_y < in_y { 0.5 } else { -0.5 }) / m, out_y)
        } else {
            let out_x = if end_x < in_x { 1.0 } else { 0.0 };
            (out_x, 0.5 + m * (if end_x < in_x { 0.5 } else { -0.5 }))
        };
        cell.geometry.target_point = endpoint_in_shape(out_x, out_y, target, 0.0, 0.0);
    }
}

fn resolve_orthogonal(
    cell: &mut Cell,
    source: Option<&Cell>,
    target: Option<&Cell>,
) -> EdgeAnchors {
    let (mut start_x, mut start_y, mut start_w, mut start_h) = match source {
        Some(source) => (
            source.geometry.x,
            source.geometry.y,
            source.geometry.width,
            source.geometry.height,
        ),
        None => (
            cell.geometry.source_point.x,
            cell.geometry.source_point.y,
            0.0,
            0.0,
        ),
    };
    let (mut end_x, mut end_y, mut end_w, mut end_h) = match target {
        Some(target) => (
            target.geometry.x,
            target.geometry.y,
            target.geometry.width,
            target.geometry.height,
        ),
        None => (
            cell.geometry.target_point.x,
            cell.geometry.target_point.y,
            0.0,
            0.0,
        ),
    };

    let mut start_dir = if end_x + end_w < start_x {
        Direction::West
    } else if end_x > start_x + start_w {
        Direction::East
    } else if end_y <= start_y {
        Direction::North
    } else {
        Direction::South
    };
    let mut end_dir = if end_y + end_h < start_y {
        Direction::South
    } else if end_y > start_y + start_h {
        Direction::North
    } else if end_x + end_w < start_x {
        Direction::East
    } else if end_x > start_x + start_w {
        Direction::West
    } else if end_x > start_x {
        start_dir
    } else if start_dir == Direction::North {
        Direction::South
    } else {
        Direction::North
    };

    if cell.style.start_fixed {
        start_x = cell.geometry.source_point.x;
        start_y = cell.geometry.source_point.y;
        start_w = 0.0;
        start_h = 0.0;
    }
    if cell.style.end_fixed {
        end_x = cell.geometry.target_point.x;
        end_y = cell.geometry.target_point.y;
        end_w = 0.0;
        end_h = 0.0;
    }

    if let (Some(p), Some(q)) = (
        cell.geometry.waypoints.front().copied(),
        cell.geometry.waypoints.back().copied(),
    ) {
        let size = cell.geometry.waypoints.len();
        let new_start = (p.x < start_x || p.x > start_x + start_w)
            && (p.y < start_y || p.y > start_y + start_h);
        let new_end =
            (q.x < end_x || q.x > end_x + end_w) && (q.y < end_y || q.y > end_y + end_h);
        if !new_start {
            start_dir = if p.x < start_x {
                Direction::West
            } else if p.y < start_y {
                Direction::North
            } else if p.x > start_x + start_w {
                Direction::East
            } else {
                Direction::South
            };
        }
        if !new_end {
            end_dir = if q.x < end_x {
                Direction::West
            } else if q.y < end_y {
                Direction::North
            } else if q.x > end_x + end_w {
                Direction::East
            } else {
                Direction::South
            };
        }
        if new_start {
            if !new_end && (end_dir.is_horizontal() == (size % 2 == 1)) {
                start_dir = if p.x < start_x {
                    Direction::West
                } else {
                    Direction::East
                };
                cell.geometry
                    .waypoints
                    .push_front(Point::new(p.x, start_y + start_h / 2.0));
            } else {
                start_dir = if p.y < start_y {
                    Direction::North
                } else {
                    Direction::South
                };
                cell.geometry
                    .waypoints
                    .push_front(Point::new(start_x + start_w / 2.0, p.y));
            }
            if new_end {
                if size % 2 == 0 {
                    end_dir = if q.y < end_y {
                        Direction::North
                    } else {
                        Direction::South
                    };
                    cell.geometry
                        .waypoints
                        .push_back(Point::new(end_x + end_w / 2.0, q.y));
                } else {
                    end_dir = if q.x < end_x {
                        Direction::West
                    } else {
                        Direction::East
                    };
                    cell.geometry
                        .waypoints
                        .push_back(Point::new(q.x, end_y + end_h / 2.0));
                }
            }
        } else if new_end || size == 1 {
            if (size % 2 == 1) == start_dir.is_horizontal() {
                end_dir = if q.x < end_x {
                    Direction::West
                } else {
                    Direction::East
                };
                cell.geometry
                    .waypoints
                    .push_back(Point::new(q.x, end_y + end_h / 2.0));
            } else {
                end_dir = if q.y < end_y {
                    Direction::North
                } else {
                    Direction::South
                };
                cell.geometry
                    .waypoints
                    .push_back(Point::new(end_x + end_w / 2.0, q.y));
            }
        }
    }

    if !cell.style.start_fixed {
        if let Some(source) = source {
            let mut angle = start_dir.facing_angle();
            angle -= source.style.direction.facing_angle();
            angle -= source.style.rotation * PI / 180.0;
            let m = angle.tan();
            let (out_x, out_y) = if m.abs() > 1.0 {
                let out_y = if start_dir == Direction::North { 0.0 } else { 1.0 };
                (
                    0.5 + (if start_dir == Direction::North { -0.5 } else { 0.5 }) / m,
                    out_y,
                )
            } else {
                let out_x = if start_dir == Direction::West { 0.0 } else { 1.0 };
                (
                    out_x,
                    0.5 + m * (if start_dir == Direction::West { -0.5 } else { 0.5 }),
                )
            };
            cell.geometry.source_point = endpoint_in_shape(out_x, out_y, source, 0.0, 0.0);
            if source.style.rotation == 0.0 {
                if let Some(p) = cell.geometry.waypoints.front() {
                    if start_dir.is_vertical() {
                        cell.geometry.source_point.x = p.x;
                    } else {
                        cell.geometry.source_point.y = p.y;
                    }
                }
            }
        }
    } else if let Some(source) = source {
        if let Some(snapped) = snap_direction(cell.geometry.source_point, source) {
            start_dir = snapped;
        }
    }

    if !cell.style.end_fixed {
        if let Some(target) = target {
            let mut angle = end_dir.facing_angle();
            angle -= target.style.direction.facing_angle();
            angle -= target.style.rotation * PI / 180.0;
            let m = angle.tan();
            let (out_x, out_y) = if m.abs() > 1.0 {
                let out_y = if end_dir == Direction::North { 0.0 } else { 1.0 };
                (
                    0.5 + (if end_dir == Direction::North { -0.5 } else { 0.5 }) / m,
                    out_y,
                )
            } else {
                let out_x = if end_dir == Direction::West { 0.0 } else { 1.0 };
                (
                    out_x,
                    0.5 + m * (if end_dir == Direction::West { -0.5 } else { 0.5 }),
                )
            };
            cell.geometry.target_point = endpoint_in_shape(out_x, out_y, target, 0.0, 0.0);
            if target.style.rotation == 0.0 {
                if let Some(q) = cell.geometry.waypoints.back() {
                    if end_dir.is_vertical() {
                        cell.geometry.target_point.x = q.x;
                    } else {
                        cell.geometry.target_point.y = q.y;
                    }
                }
            }
        }
    } else if let Some(target) = target {
        if let Some(snapped) = snap_direction(cell.geometry.target_point, target) {
            end_dir = snapped;
        }
    }

    EdgeAnchors {
        start_dir: Some(start_dir),
        end_dir: Some(end_dir),
    }
}

/// For a fixed endpoint on a shape rotated by a multiple of 90°, detects
/// which side of the (possibly turned) box the point sits on.
fn snap_direction(point: Point, shape: &Cell) -> Option<Direction> {
    if shape.style.rotation % 90.0 != 0.0 {
        return None;
    }
    let mut rx = shape.geometry.width / 2.0;
    let mut ry = shape.geometry.height / 2.0;
    let cx = shape.geometry.x + rx;
    let cy = shape.geometry.y + ry;
    if (shape.style.rotation / 90.0).floor() % 2.0 == 1.0 {
        std::mem::swap(&mut rx, &mut ry);
    }
    if point.y == cy + ry {
        Some(Direction::South)
    } else if point.y == cy - ry {
        Some(Direction::North)
    } else if point.x == cx - rx {
        Some(Direction::West)
    } else if point.x == cx + rx {
        Some(Direction::East)
    } else {
        None
    }
}

/// Maps a normalized box position into a world point on `shape`, going
/// through the perimeter projector when the position lies on the unit
/// box edge, then un-rotating about the shape center.
fn endpoint_in_shape(out_x: f64, out_y: f64, shape: &Cell, dx: f64, dy: f64) -> Point {
    let on_box_edge = out_x == 0.0 || out_x == 1.0 || out_y == 0.0 || out_y == 1.0;
    let geo = &shape.geometry;
    let (mut out_x, mut out_y) = (out_x, out_y);
    if shape.style.direction.is_horizontal() {
        out_x += dx / geo.width;
        out_y += dy / geo.height;
    } else {
        out_x += dx / geo.height;
        out_y += dy / geo.width;
    }
    if on_box_edge {
        let model = PerimeterModel::of(&shape.style, geo);
        (out_x, out_y) = model.project(out_x, out_y);
    }
    let (x, y) = match shape.style.direction {
        Direction::East => (geo.x + out_x * geo.width, geo.y + out_y * geo.height),
        Direction::West => (
            geo.x + (1.0 - out_x) * geo.width,
            geo.y + (1.0 - out_y) * geo.height,
        ),
        Direction::North => (
            geo.x + out_y * geo.width,
            geo.y + (1.0 - out_x) * geo.height,
        ),
        Direction::South => (
            geo.x + (1.0 - out_y) * geo.width,
            geo.y + out_x * geo.height,
        ),
    };
    let center = Point::new(geo.x + geo.width / 2.0, geo.y + geo.height / 2.0);
    let angle = -shape.style.rotation * PI / 180.0;
    Point::new(x, y).rotated_about(center, angle)
}
