//! Turns cells into drawing-sink calls.
//!
//! A [`Renderer`] owns the per-session draw counter that numbers the
//! registered styles (`gr_0`, `gr_1`, ...). Cells are drawn in whatever
//! order the caller chooses; only the edge being drawn has its geometry
//! mutated (endpoints, waypoints, bounds).

pub mod endpoint;
pub mod path;
pub mod perimeter;
pub mod route;
pub mod shape;

use log::debug;

use crate::cell::{Cell, CellTable, Geometry};
use crate::sink::{
    CharacterStyle, ConnectorElement, DrawingSink, EllipseElement, GraphicStyle, MarkerProps,
    PathElement, PathStep, RectangleElement, TextArea,
};
use crate::render::shape::{ShapeDescriptor, ShapeOutline};

/// A rendering session with its own style-name counter.
#[derive(Debug, Default)]
pub struct Renderer {
    draw_count: usize,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cells drawn so far in this session.
    pub fn draw_count(&self) -> usize {
        self.draw_count
    }

    /// Draws one cell. Edges get their endpoints resolved and, for
    /// orthogonal ones without explicit waypoints, routed first.
    ///
    /// `cell` must be the caller's own copy; the table is only consulted
    /// to look up the shapes an edge refers to.
    pub fn draw_cell(&mut self, cell: &mut Cell, cells: &CellTable, sink: &mut dyn DrawingSink) {
        debug!(cell_id = cell.id.as_str(), vertex = cell.vertex, edge = cell.edge; "drawing cell");
        let style_name = format!("gr_{}", self.draw_count);
        let graphic_style = self.graphic_style(cell, &style_name);
        sink.set_style(&graphic_style);
        sink.open_group();

        let id = (!cell.id.is_empty()).then(|| cell.id.clone());

        if cell.edge {
            let anchors = endpoint::set_end_points(cell, cells);
            route::set_waypoints(cell, anchors, cells);
            cell.calculate_bounds();
            sink.draw_connector(&ConnectorElement {
                id: id.clone(),
                style_name: style_name.clone(),
                source_shape: cell.source_id.clone(),
                target_shape: cell.target_id.clone(),
                start: display_units(cell.geometry.source_point),
                end: display_units(cell.geometry.target_point),
                steps: edge_path(&cell.geometry),
            });
        }

        let mut geometry = cell.geometry.clone();
        if cell.vertex {
            if let Some(parent) = cells.lookup(cell.parent_id.as_deref()) {
                geometry.x += parent.geometry.x;
                geometry.y += parent.geometry.y;
            }
            let descriptor = ShapeDescriptor::from_style(&cell.style);
            match descriptor.outline(&geometry, &cell.style) {
                ShapeOutline::Rectangle {
                    x,
                    y,
                    width,
                    height,
                    transform,
                } => sink.draw_rectangle(&RectangleElement {
                    id: id.clone(),
                    style_name: style_name.clone(),
                    x,
                    y,
                    width,
                    height,
                    transform,
                }),
                ShapeOutline::Ellipse {
                    cx,
                    cy,
                    rx,
                    ry,
                    rotation,
                } => sink.draw_ellipse(&EllipseElement {
                    id: id.clone(),
                    style_name: style_name.clone(),
                    cx,
                    cy,
                    rx,
                    ry,
                    rotation,
                }),
                ShapeOutline::Path(steps) => sink.draw_path(&PathElement {
                    id: id.clone(),
                    style_name: style_name.clone(),
                    steps,
                }),
            }
        }

        // The label offsets reuse the label-position enums as plain
        // integers, stepping in whole box widths and heights.
        let text_area = TextArea {
            span_id: self.draw_count,
            x: (geometry.x + (cell.style.position as i32 as f64) * geometry.width) / 100.0,
            y: (geometry.y + (cell.style.vertical_position as i32 as f64) * geometry.height)
                / 100.0,
            width: geometry.width / 100.0,
            height: geometry.height / 100.0,
            align: cell.style.align,
            vertical_align: cell.style.vertical_align,
        };
        sink.set_style(&graphic_style);
        sink.start_text_object(&text_area);
        if !cell.label.is_empty() {
            sink.define_character_style(&self.character_style(cell));
            sink.open_paragraph();
            sink.open_span();
            sink.insert_text(&strip_tags(&cell.label));
            sink.close_span();
            sink.close_paragraph();
        }
        sink.end_text_object();
        sink.close_group();
        self.draw_count += 1;
    }

    fn graphic_style(&self, cell: &Cell, name: &str) -> GraphicStyle {
        let mut fill = cell.style.fill_color;
        let stroke = cell.style.stroke_color;
        // An edge with a filled marker paints the marker with the stroke
        // color.
        if stroke.is_some() && cell.edge && (cell.style.end_fill || cell.style.start_fill) {
            fill = stroke;
        }
        let marker = |arrow: Option<crate::style::Marker>, size: f64| {
            if !cell.edge {
                return None;
            }
            arrow.map(|marker| MarkerProps {
                view_box: marker.view_box(),
                path: marker.path(),
                width: size / 100.0,
            })
        };
        GraphicStyle {
            name: name.to_string(),
            fill,
            stroke,
            marker_start: marker(cell.style.start_arrow, cell.style.start_size),
            marker_end: marker(cell.style.end_arrow, cell.style.end_size),
        }
    }

    fn character_style(&self, cell: &Cell) -> CharacterStyle {
        CharacterStyle {
            span_id: self.draw_count,
            font_name: cell.text_style.font_family.clone(),
            font_size_pt: cell.text_style.font_size * 0.75,
            color: cell.text_style.font_color,
            background_color: cell.text_style.background_color,
            bold: cell.text_style.bold,
            italic: cell.text_style.italic,
            underline: cell.text_style.underline,
        }
    }
}

fn display_units(point: crate::geometry::Point) -> crate::geometry::Point {
    crate::geometry::Point::new(point.x / 100.0, point.y / 100.0)
}

/// The connector path: source point, then each waypoint, then the
/// target point, all scaled to display units.
fn edge_path(geometry: &Geometry) -> Vec<PathStep> {
    let mut steps = Vec::with_capacity(geometry.waypoints.len() + 2);
    steps.push(PathStep::MoveTo(display_units(geometry.source_point)));
    for point in &geometry.waypoints {
        steps.push(PathStep::LineTo(display_units(*point)));
    }
    steps.push(PathStep::LineTo(display_units(geometry.target_point)));
    steps
}

/// Removes markup tags from a label, character-wise.
pub fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut skipping = false;
    for c in input.chars() {
        if c == '<' {
            skipping = true;
        }
        if !skipping {
            out.push(c);
        }
        if c == '>' {
            skipping = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::sink::{RecordingSink, SinkEvent};

    fn vertex(id: &str, style_str: &str, label: &str) -> Cell {
        let mut cell = Cell {
            id: id.to_string(),
            vertex: true,
            style_str: style_str.to_string(),
            label: label.to_string(),
            ..Cell::default()
        };
        cell.geometry = Geometry {
            width: 10000.0,
            height: 5000.0,
            ..Geometry::default()
        };
        cell.resolve_style();
        cell
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("hello <b>world</b>!"), "hello world!");
        assert_eq!(strip_tags("no tags"), "no tags");
        assert_eq!(strip_tags("<br>"), "");
        assert_eq!(strip_tags("a < b"), "a ");
        assert_eq!(strip_tags(""), "");
    }

    #[test]
    fn test_style_names_count_up() {
        let cells = CellTable::new();
        let mut sink = RecordingSink::new();
        let mut renderer = Renderer::new();
        for id in ["a", "b", "c"] {
            let mut cell = vertex(id, "", "");
            renderer.draw_cell(&mut cell, &cells, &mut sink);
        }
        let names: Vec<&str> = sink
            .events
            .iter()
            .filter_map(|event| match event {
                SinkEvent::SetStyle(style) => Some(style.name.as_str()),
                _ => None,
            })
            .collect();
        // Each cell pushes its style twice: once before the shape, once
        // before the text block.
        assert_eq!(names, ["gr_0", "gr_0", "gr_1", "gr_1", "gr_2", "gr_2"]);
        assert_eq!(renderer.draw_count(), 3);
    }

    #[test]
    fn test_vertex_call_sequence() {
        let cells = CellTable::new();
        let mut sink = RecordingSink::new();
        let mut cell = vertex("a", "", "hi");
        Renderer::new().draw_cell(&mut cell, &cells, &mut sink);
        let kinds: Vec<&SinkEvent> = sink.events.iter().collect();
        assert!(matches!(kinds[0], SinkEvent::SetStyle(_)));
        assert!(matches!(kinds[1], SinkEvent::OpenGroup));
        assert!(matches!(kinds[2], SinkEvent::Rectangle(_)));
        assert!(matches!(kinds[3], SinkEvent::SetStyle(_)));
        assert!(matches!(kinds[4], SinkEvent::StartTextObject(_)));
        assert!(matches!(kinds[5], SinkEvent::CharacterStyle(_)));
        assert!(matches!(kinds[6], SinkEvent::OpenParagraph));
        assert!(matches!(kinds[7], SinkEvent::OpenSpan));
        assert!(matches!(kinds[8], SinkEvent::Text(_)));
        assert!(matches!(kinds[9], SinkEvent::CloseSpan));
        assert!(matches!(kinds[10], SinkEvent::CloseParagraph));
        assert!(matches!(kinds[11], SinkEvent::EndTextObject));
        assert!(matches!(kinds[12], SinkEvent::CloseGroup));
        assert_eq!(kinds.len(), 13);
    }

    #[test]
    fn test_empty_label_skips_paragraph() {
        let cells = CellTable::new();
        let mut sink = RecordingSink::new();
        let mut cell = vertex("a", "", "");
        Renderer::new().draw_cell(&mut cell, &cells, &mut sink);
        assert!(sink.texts().is_empty());
        assert!(sink
            .events
            .iter()
            .all(|event| !matches!(event, SinkEvent::OpenParagraph)));
        // The text object itself is still opened.
        assert!(sink
            .events
            .iter()
            .any(|event| matches!(event, SinkEvent::StartTextObject(_))));
    }

    #[test]
    fn test_structural_cell_emits_only_text_block() {
        let cells = CellTable::new();
        let mut sink = RecordingSink::new();
        let mut cell = Cell {
            id: "layer".to_string(),
            ..Cell::default()
        };
        cell.resolve_style();
        Renderer::new().draw_cell(&mut cell, &cells, &mut sink);
        assert!(sink.events.iter().all(|event| !matches!(
            event,
            SinkEvent::Rectangle(_) | SinkEvent::Connector(_) | SinkEvent::Path(_)
        )));
        assert!(sink
            .events
            .iter()
            .any(|event| matches!(event, SinkEvent::StartTextObject(_))));
    }

    #[test]
    fn test_label_position_steps_in_whole_boxes() {
        let cells = CellTable::new();
        let mut sink = RecordingSink::new();
        let mut cell = vertex("a", "labelPosition=right;verticalLabelPosition=top", "x");
        Renderer::new().draw_cell(&mut cell, &cells, &mut sink);
        let area = sink
            .events
            .iter()
            .find_map(|event| match event {
                SinkEvent::StartTextObject(area) => Some(area.clone()),
                _ => None,
            })
            .unwrap();
        // Right is index 2: two whole widths to the right. Top is index
        // 0: no vertical offset.
        assert_eq!(area.x, 200.0);
        assert_eq!(area.y, 0.0);
        assert_eq!(area.width, 100.0);
        assert_eq!(area.height, 50.0);
    }

    #[test]
    fn test_font_size_reaches_sink_in_points() {
        let cells = CellTable::new();
        let mut sink = RecordingSink::new();
        let mut cell = vertex("a", "fontSize=16;fontStyle=3", "x");
        Renderer::new().draw_cell(&mut cell, &cells, &mut sink);
        let character = sink
            .events
            .iter()
            .find_map(|event| match event {
                SinkEvent::CharacterStyle(style) => Some(style.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(character.font_size_pt, 12.0);
        assert!(character.bold && character.italic && !character.underline);
    }

    #[test]
    fn test_edge_markers_and_fill_adoption() {
        let mut cells = CellTable::new();
        let mut a = vertex("a", "", "");
        a.geometry.x = 0.0;
        cells.insert(a);
        let mut b = vertex("b", "", "");
        b.geometry.x = 20000.0;
        cells.insert(b);
        let mut cell = Cell {
            id: "e".to_string(),
            edge: true,
            source_id: Some("a".to_string()),
            target_id: Some("b".to_string()),
            style_str: "strokeColor=#ff0000;endSize=12".to_string(),
            ..Cell::default()
        };
        cell.resolve_style();
        let mut sink = RecordingSink::new();
        Renderer::new().draw_cell(&mut cell, &cells, &mut sink);
        let style = sink
            .events
            .iter()
            .find_map(|event| match event {
                SinkEvent::SetStyle(style) => Some(style.clone()),
                _ => None,
            })
            .unwrap();
        // The default classic end arrow is filled, so the fill adopts
        // the stroke color.
        assert_eq!(style.stroke, Some(Color::rgb(255, 0, 0)));
        assert_eq!(style.fill, Some(Color::rgb(255, 0, 0)));
        assert!(style.marker_start.is_none());
        let end = style.marker_end.unwrap();
        assert_eq!(end.view_box, "0 0 40 40");
        assert_eq!(end.width, 0.12);
        let connector = sink
            .events
            .iter()
            .find_map(|event| match event {
                SinkEvent::Connector(connector) => Some(connector.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(connector.source_shape.as_deref(), Some("a"));
        assert_eq!(connector.target_shape.as_deref(), Some("b"));
        assert_eq!(connector.steps.len(), 2);
    }

    #[test]
    fn test_vertex_markers_are_suppressed() {
        let cells = CellTable::new();
        let mut sink = RecordingSink::new();
        let mut cell = vertex("a", "startArrow=classic", "");
        Renderer::new().draw_cell(&mut cell, &cells, &mut sink);
        let style = sink
            .events
            .iter()
            .find_map(|event| match event {
                SinkEvent::SetStyle(style) => Some(style.clone()),
                _ => None,
            })
            .unwrap();
        assert!(style.marker_start.is_none());
        assert!(style.marker_end.is_none());
        // And a vertex keeps its own fill.
        assert_eq!(style.fill, Some(Color::WHITE));
    }

    #[test]
    fn test_parent_offset_moves_vertex_and_text() {
        let mut cells = CellTable::new();
        let mut group = Cell {
            id: "g".to_string(),
            ..Cell::default()
        };
        group.geometry.x = 1000.0;
        group.geometry.y = 2000.0;
        cells.insert(group);
        let mut cell = vertex("a", "", "x");
        cell.parent_id = Some("g".to_string());
        let mut sink = RecordingSink::new();
        Renderer::new().draw_cell(&mut cell, &cells, &mut sink);
        let rect = sink
            .events
            .iter()
            .find_map(|event| match event {
                SinkEvent::Rectangle(rect) => Some(rect.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(rect.x, 10.0);
        assert_eq!(rect.y, 20.0);
        let area = sink
            .events
            .iter()
            .find_map(|event| match event {
                SinkEvent::StartTextObject(area) => Some(area.clone()),
                _ => None,
            })
            .unwrap();
        // Center position steps one whole box from the offset origin.
        assert_eq!(area.x, 110.0);
        assert_eq!(area.y, 70.0);
    }
}
