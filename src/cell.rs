//! The cell table the engine renders from.
//!
//! Cells arrive fully constructed from the parsing collaborator; the
//! engine only fills in derived geometry (edge endpoints, waypoints,
//! bounds) while drawing.

use std::collections::hash_map::Values;
use std::collections::{HashMap, VecDeque};

use crate::geometry::Point;
use crate::style::{self, Style, TextStyle};

/// Position and size of a cell, plus the derived edge geometry.
///
/// Coordinates are in hundredths of a display unit. `source_point`,
/// `target_point` and `waypoints` are only meaningful for edges and are
/// overwritten during endpoint resolution and routing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub source_point: Point,
    pub target_point: Point,
    pub waypoints: VecDeque<Point>,
    pub offset: f64,
    pub relative: bool,
}

/// Integer bounding box used for view-box reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// A single diagram element: a vertex (shape), an edge (connector), or a
/// structural cell that is neither (layers, the root).
#[derive(Debug, Clone, Default)]
pub struct Cell {
    pub id: String,
    pub parent_id: Option<String>,
    pub source_id: Option<String>,
    pub target_id: Option<String>,
    pub vertex: bool,
    pub edge: bool,
    pub style_str: String,
    pub style: Style,
    pub text_style: TextStyle,
    pub geometry: Geometry,
    pub label: String,
    pub bounds: Bounds,
}

impl Cell {
    /// Parses `style_str` into the typed style records.
    ///
    /// Called once after construction; the bound-ness of the two edge
    /// endpoints feeds the `start_fixed`/`end_fixed` flags.
    pub fn resolve_style(&mut self) {
        let (style, text_style) = style::parse::parse_style(
            &self.style_str,
            self.source_id.is_some(),
            self.target_id.is_some(),
            &self.geometry,
        );
        self.style = style;
        self.text_style = text_style;
    }

    /// Recomputes `bounds`: vertices get the fixed drawing box, edges the
    /// box spanned by their two endpoints.
    pub fn calculate_bounds(&mut self) {
        if self.vertex {
            self.bounds = Bounds {
                x: 0,
                y: 0,
                width: 21600,
                height: 21600,
            };
        } else {
            let geo = &self.geometry;
            self.bounds = Bounds {
                x: geo.source_point.x.min(geo.target_point.x) as i32,
                y: geo.source_point.y.min(geo.target_point.y) as i32,
                width: ((geo.source_point.x - geo.target_point.x) as i32).abs(),
                height: ((geo.source_point.y - geo.target_point.y) as i32).abs(),
            };
        }
    }

    pub fn view_box(&self) -> String {
        format!(
            "{} {} {} {}",
            self.bounds.x, self.bounds.y, self.bounds.width, self.bounds.height
        )
    }
}

/// Cells keyed by id. Iteration order is irrelevant; draw order is the
/// caller's concern.
#[derive(Debug, Clone, Default)]
pub struct CellTable {
    cells: HashMap<String, Cell>,
}

impl CellTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a cell, replacing any previous cell with the same id.
    pub fn insert(&mut self, cell: Cell) {
        self.cells.insert(cell.id.clone(), cell);
    }

    pub fn get(&self, id: &str) -> Option<&Cell> {
        self.cells.get(id)
    }

    /// Looks up an optional reference, treating a dangling id the same as
    /// an absent one.
    pub fn lookup(&self, id: Option<&str>) -> Option<&Cell> {
        id.and_then(|id| self.cells.get(id))
    }

    pub fn remove(&mut self, id: &str) -> Option<Cell> {
        self.cells.remove(id)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> Values<'_, String, Cell> {
        self.cells.values()
    }
}
