//! Geometry and rendering engine for diagrams authored in the draw.io
//! box-and-arrow format.
//!
//! The engine consumes a populated [`CellTable`] (built by a parsing
//! collaborator) and emits concrete drawing calls through the
//! [`DrawingSink`] capability trait: vertices become primitives or
//! paths under their direction/rotation transform, and edges get their
//! endpoints resolved onto shape perimeters and, for orthogonal edges,
//! a synthesized Manhattan route.
//!
//! ```
//! use sextant::{Cell, CellTable, Geometry, RecordingSink, Renderer};
//!
//! let mut cell = Cell {
//!     id: "a".to_string(),
//!     vertex: true,
//!     style_str: "ellipse;fillColor=#c0ffee".to_string(),
//!     geometry: Geometry {
//!         width: 8000.0,
//!         height: 4000.0,
//!         ..Geometry::default()
//!     },
//!     ..Cell::default()
//! };
//! cell.resolve_style();
//!
//! let mut sink = RecordingSink::new();
//! Renderer::new().draw_cell(&mut cell, &CellTable::new(), &mut sink);
//! assert!(!sink.events.is_empty());
//! ```

pub mod cell;
pub mod color;
pub mod error;
pub mod export;
pub mod geometry;
pub mod render;
pub mod sink;
pub mod style;

pub use cell::{Bounds, Cell, CellTable, Geometry};
pub use color::Color;
pub use error::SextantError;
pub use export::svg::SvgSink;
pub use geometry::Point;
pub use render::Renderer;
pub use sink::{DrawingSink, RecordingSink, SinkEvent};
pub use style::{Style, TextStyle};
