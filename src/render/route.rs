//! Manhattan routing for orthogonal edges without explicit waypoints.
//!
//! The path starts with a mandatory 20-unit stub in the start direction
//! and then walks case by case: each step writes the coordinate the
//! path is currently traveling along, appends the turn point, and
//! rotates the travel direction, detouring around whichever shape the
//! path is currently hugging.

use log::warn;

use crate::cell::{Cell, CellTable};
use crate::geometry::Point;
use crate::render::endpoint::EdgeAnchors;
use crate::style::{Direction, EdgeStyle};

/// Stub length and obstruction margin, in input units.
const STUB: f64 = 20.0;

/// Turn budget; the walk is bounded by direction transitions and never
/// gets near this for well-formed inputs.
const MAX_STEPS: usize = 64;

/// True when traveling from `p` in `dir` reduces the distance to `q`.
fn points_to(p: Point, q: Point, dir: Direction) -> bool {
    match dir {
        Direction::North => q.y < p.y,
        Direction::East => q.x > p.x,
        Direction::South => q.y > p.y,
        Direction::West => q.x < p.x,
    }
}

/// Synthesizes waypoints for an orthogonal edge whose geometry carries
/// none, walking from `source_point` toward `target_point` while
/// avoiding the two endpoint boxes.
pub(crate) fn set_waypoints(cell: &mut Cell, anchors: EdgeAnchors, cells: &CellTable) {
    if !cell.edge {
        return;
    }
    if cell.style.edge_style != EdgeStyle::Orthogonal || !cell.geometry.waypoints.is_empty() {
        return;
    }
    let (Some(mut p_dir), Some(mut q_dir)) = (anchors.start_dir, anchors.end_dir) else {
        return;
    };

    let (mut source_x, mut source_y, source_w, source_h) =
        match cells.lookup(cell.source_id.as_deref()) {
            Some(source) => {
                let mut x = source.geometry.x;
                let mut y = source.geometry.y;
                if let Some(parent) = cells.lookup(source.parent_id.as_deref()) {
                    x += parent.geometry.x;
                    y += parent.geometry.y;
                }
                (x, y, source.geometry.width, source.geometry.height)
            }
            None => (
                cell.geometry.source_point.x,
                cell.geometry.source_point.y,
                0.0,
                0.0,
            ),
        };
    let (target_x, target_y, target_w, target_h) = match cells.lookup(cell.target_id.as_deref()) {
        Some(target) => {
            if let Some(parent) = cells.lookup(target.parent_id.as_deref()) {
                source_x += parent.geometry.x;
                source_y += parent.geometry.y;
            }
            (
                target.geometry.x,
                target.geometry.y,
                target.geometry.width,
                target.geometry.height,
            )
        }
        None => (
            cell.geometry.target_point.x,
            cell.geometry.target_point.y,
            0.0,
            0.0,
        ),
    };

    let mut p = cell.geometry.source_point;
    let q = cell.geometry.target_point;
    if p == q {
        return;
    }
    match p_dir {
        Direction::North => p.y -= STUB,
        Direction::East => p.x += STUB,
        Direction::South => p.y += STUB,
        Direction::West => p.x -= STUB,
    }

    // The walk keeps the target in reach by checking whether the point
    // already sits inside the target box; that test reuses the target
    // height on the x axis.
    let inside_target = |p: Point| {
        target_x <= p.x && p.x <= target_x + target_h && target_y <= p.y && p.y <= target_y + target_h
    };
    let stub_past = |dir: Direction, x: f64, y: f64, width: f64, height: f64| match dir {
        Direction::North => y - STUB,
        Direction::East => x + width + STUB,
        Direction::South => y + height + STUB,
        Direction::West => x - STUB,
    };
    let midpoint = |dir: Direction| match dir {
        Direction::North => (source_y + target_y + target_h) / 2.0,
        Direction::East => (source_x + target_x + source_w) / 2.0,
        Direction::South => (source_y + target_y + source_h) / 2.0,
        Direction::West => (source_x + target_x + target_w) / 2.0,
    };
    let axis_gap = |dir: Direction| {
        if dir.is_vertical() {
            (target_y + target_h - source_y)
                .abs()
                .min((source_y + source_h - target_y).abs())
        } else {
            (target_x + target_w - source_x)
                .abs()
                .min((source_x + source_w - target_x).abs())
        }
    };
    let toward_q = |dir: Direction, p: Point| {
        if dir.is_vertical() {
            if q.x < p.x {
                Direction::West
            } else {
                Direction::East
            }
        } else if q.y < p.y {
            Direction::North
        } else {
            Direction::South
        }
    };
    let toward_source = |dir: Direction, p: Point| {
        if dir.is_vertical() {
            if source_x < p.x {
                Direction::West
            } else {
                Direction::East
            }
        } else if source_y < p.y {
            Direction::North
        } else {
            Direction::South
        }
    };
    let between_centers = |dir: Direction| {
        if dir.is_vertical() {
            if target_x + target_w / 2.0 < source_x + source_w / 2.0 {
                Direction::West
            } else {
                Direction::East
            }
        } else if target_y + target_h / 2.0 < source_y + source_h / 2.0 {
            Direction::North
        } else {
            Direction::South
        }
    };

    let mut start = true;
    let mut hug_source = true;
    let mut steps = 0;
    while p_dir != q_dir.opposite()
        || !points_to(p, q, p_dir)
        || (p.x != q.x && p_dir.is_vertical())
        || (p.y != q.y && p_dir.is_horizontal())
    {
        steps += 1;
        if steps > MAX_STEPS {
            warn!(edge_id = cell.id.as_str(), steps = steps; "routing step limit reached");
            break;
        }
        let x = if hug_source { source_x } else { target_x };
        let y = if hug_source { source_y } else { target_y };
        let width = if hug_source { source_w } else { target_w };
        let height = if hug_source { source_h } else { target_h };
        let overlap = if p_dir.is_vertical() {
            (target_y < source_y && source_y < target_y + target_h)
                || (source_y < target_y && target_y < source_y + source_h)
        } else {
            (target_x < source_x && source_x < target_x + target_w)
                || (source_x < target_x && target_x < source_x + source_w)
        };
        let vertical = p_dir.is_vertical();
        let change;
        if p_dir.perpendicular(q_dir) && points_to(p, q, p_dir) && points_to(q, p, q_dir) {
            let mut obstruction_s = false;
            if p_dir.is_horizontal() {
                if source_x - STUB < q.x && q.x < source_x + source_w + STUB {
                    if p.y < source_y {
                        obstruction_s = source_y + source_h / 2.0 < target_y + target_h / 2.0;
                    } else if p.y > source_y + source_h {
                        obstruction_s = source_y + source_h / 2.0 > target_y + target_h / 2.0;
                    }
                } else if source_y - STUB < p.y && p.y < source_y + source_h + STUB {
                    if q.x < source_x {
                        obstruction_s = source_x + source_w / 2.0 < target_x + target_w / 2.0;
                    } else if q.x > source_x + source_w {
                        obstruction_s = source_x + source_w / 2.0 > target_x + target_w / 2.0;
                    }
                }
            } else if source_x - STUB < p.x && p.x < source_x + source_w + STUB {
                if q.y < source_y {
                    obstruction_s = source_y + source_h / 2.0 < target_y + target_h / 2.0;
                } else if q.y > source_y + source_h {
                    obstruction_s = source_y + source_h / 2.0 > target_y + target_h / 2.0;
                }
            } else if source_y - STUB < q.y && q.y < source_y + source_h + STUB {
                if p.x < source_x {
                    obstruction_s = source_x + source_w / 2.0 < target_x + target_w / 2.0;
                } else if p.x > source_x + source_w {
                    obstruction_s = source_x + source_w / 2.0 > target_x + target_w / 2.0;
                }
            }
            let mut obstruction_t = if p_dir.is_horizontal() {
                target_y - STUB < p.y && p.y < target_y + target_h + STUB
            } else {
                target_x - STUB < p.x && p.x < target_x + target_w + STUB
            };
            if inside_target(p) {
                obstruction_t = false;
            }
            if obstruction_s {
                change = stub_past(p_dir, x, y, width, height);
                p_dir = toward_q(p_dir, p);
            } else if obstruction_t {
                change = midpoint(p_dir);
                p_dir = toward_source(p_dir, p);
                hug_source = false;
            } else {
                change = if p_dir.is_horizontal() { q.x } else { q.y };
                p_dir = q_dir.opposite();
            }
        } else if p_dir == q_dir.opposite() && points_to(p, q, p_dir) {
            if axis_gap(p_dir) >= 2.0 * STUB {
                change = midpoint(p_dir);
                p_dir = toward_q(p_dir, p);
                hug_source = false;
            } else {
                change = stub_past(p_dir, x, y, width, height);
                p_dir = toward_q(p_dir, p);
            }
        } else if p_dir.perpendicular(q_dir) {
            if inside_target(p) {
                q_dir = q_dir.opposite();
                continue;
            }
            if points_to(p, q, p_dir) && axis_gap(p_dir) >= 2.0 * STUB && !overlap {
                change = midpoint(p_dir);
                p_dir = toward_q(p_dir, p);
                hug_source = false;
            } else {
                change = stub_past(p_dir, x, y, width, height);
                p_dir = if start {
                    between_centers(p_dir)
                } else {
                    toward_q(p_dir, p)
                };
            }
        } else if p_dir == q_dir.opposite() {
            change = stub_past(p_dir, x, y, width, height);
            p_dir = if start {
                between_centers(p_dir)
            } else {
                toward_q(p_dir, p)
            };
        } else {
            // Same direction.
            let test = if vertical { p.x } else { p.y };
            let goal = if vertical { q.x } else { q.y };
            if test == goal {
                q_dir = q_dir.opposite();
                continue;
            }
            if inside_target(p) {
                q_dir = q_dir.opposite();
                continue;
            }
            let mut obstruction_s = false;
            if vertical && source_x - STUB < q.x && q.x < source_x + source_w + STUB {
                if p.y < source_y {
                    obstruction_s = source_y + source_h / 2.0 < target_y + target_h / 2.0;
                } else if p.y > source_y + source_h {
                    obstruction_s = source_y + source_h / 2.0 > target_y + target_h / 2.0;
                }
            } else if !vertical
                && source_y - STUB < q.y
                && q.y < source_y + source_h + 2.0
                && source_y - STUB < p.y
                && p.y < source_y + source_h + STUB
            {
                if p.x < source_x {
                    obstruction_s = source_x + source_w / 2.0 < target_x + target_w / 2.0;
                } else if p.x > source_x + source_w {
                    obstruction_s = source_x + source_w / 2.0 > target_x + target_w / 2.0;
                }
            }
            let mut obstruction_t = false;
            if vertical && target_x - STUB < p.x && p.x < target_x + target_w + STUB {
                if p.y < source_y {
                    obstruction_t = source_y + source_h / 2.0 > target_y + target_h / 2.0;
                } else if p.y > source_y + source_h {
                    obstruction_t = source_y + source_h / 2.0 < target_y + target_h / 2.0;
                }
            } else if !vertical && target_y - STUB < p.y && p.y < target_y + target_h + STUB {
                if p.x < source_x {
                    obstruction_t = source_x + source_w / 2.0 > target_x + target_w / 2.0;
                } else if p.x > source_x + source_w {
                    obstruction_t = source_x + source_w / 2.0 < target_x + target_w / 2.0;
                }
            }
            if inside_target(p) {
                obstruction_t = false;
            }
            if !obstruction_t || obstruction_s {
                let current = if vertical { p.y } else { p.x };
                change = match p_dir {
                    Direction::North => current.min(target_y - STUB),
                    Direction::East => current.max(target_x + target_w + STUB),
                    Direction::South => current.max(target_y + target_h + STUB),
                    Direction::West => current.min(target_x - STUB),
                };
                p_dir = toward_q(p_dir, p);
            } else {
                change = midpoint(p_dir);
                p_dir = toward_source(p_dir, p);
                hug_source = false;
            }
        }
        if vertical {
            p.y = change;
        } else {
            p.x = change;
        }
        cell.geometry.waypoints.push_back(p);
        start = false;
    }
}
