//! The drawing-sink capability the engine renders into.
//!
//! The engine keeps a strongly-typed step representation internally;
//! implementations convert to their own property bags (or SVG attributes)
//! at this boundary. All coordinates handed to a sink are in display
//! units, already divided down from the input's hundredths.

use crate::color::Color;
use crate::geometry::Point;
use crate::style::{AlignH, AlignV};

/// One step of a path, in display units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathStep {
    MoveTo(Point),
    LineTo(Point),
    QuadTo { ctrl: Point, to: Point },
    CurveTo { ctrl1: Point, ctrl2: Point, to: Point },
    Close,
}

/// Arrow marker geometry pushed with a graphic style.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerProps {
    pub view_box: &'static str,
    pub path: &'static str,
    pub width: f64,
}

/// A registered graphic style; referenced by name from the elements that
/// follow it.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphicStyle {
    pub name: String,
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub marker_start: Option<MarkerProps>,
    pub marker_end: Option<MarkerProps>,
}

/// The transform chain that keeps a rotated rectangle anchored at its
/// original top-left corner: translate to the origin, rotate, translate
/// back with the rotation-dependent correction folded in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectTransform {
    pub pre_translate: Point,
    pub angle: f64,
    pub post_translate: Point,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RectangleElement {
    pub id: Option<String>,
    pub style_name: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub transform: RectTransform,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EllipseElement {
    pub id: Option<String>,
    pub style_name: String,
    pub cx: f64,
    pub cy: f64,
    pub rx: f64,
    pub ry: f64,
    /// Rotation in degrees, counter-clockwise.
    pub rotation: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathElement {
    pub id: Option<String>,
    pub style_name: String,
    pub steps: Vec<PathStep>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConnectorElement {
    pub id: Option<String>,
    pub style_name: String,
    pub source_shape: Option<String>,
    pub target_shape: Option<String>,
    pub start: Point,
    pub end: Point,
    pub steps: Vec<PathStep>,
}

/// The box a cell's label is laid out in.
#[derive(Debug, Clone, PartialEq)]
pub struct TextArea {
    pub span_id: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub align: AlignH,
    pub vertical_align: AlignV,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CharacterStyle {
    pub span_id: usize,
    pub font_name: String,
    /// Already scaled to points.
    pub font_size_pt: f64,
    pub color: Option<Color>,
    pub background_color: Option<Color>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

/// The capability set the engine depends on. Calls arrive in a fixed
/// discipline per cell: style, group open, zero or one drawable, the text
/// block, group close.
pub trait DrawingSink {
    fn set_style(&mut self, style: &GraphicStyle);
    fn open_group(&mut self);
    fn close_group(&mut self);
    fn draw_rectangle(&mut self, rect: &RectangleElement);
    fn draw_ellipse(&mut self, ellipse: &EllipseElement);
    fn draw_path(&mut self, path: &PathElement);
    fn draw_connector(&mut self, connector: &ConnectorElement);
    fn define_character_style(&mut self, style: &CharacterStyle);
    fn start_text_object(&mut self, area: &TextArea);
    fn end_text_object(&mut self);
    fn open_paragraph(&mut self);
    fn close_paragraph(&mut self);
    fn open_span(&mut self);
    fn close_span(&mut self);
    fn insert_text(&mut self, text: &str);
}

/// Everything a [`RecordingSink`] saw, in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    SetStyle(GraphicStyle),
    OpenGroup,
    CloseGroup,
    Rectangle(RectangleElement),
    Ellipse(EllipseElement),
    Path(PathElement),
    Connector(ConnectorElement),
    CharacterStyle(CharacterStyle),
    StartTextObject(TextArea),
    EndTextObject,
    OpenParagraph,
    CloseParagraph,
    OpenSpan,
    CloseSpan,
    Text(String),
}

/// A sink that records every call, so rendering can be asserted on
/// without a real output backend.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<SinkEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All inserted text fragments, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                SinkEvent::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl DrawingSink for RecordingSink {
    fn set_style(&mut self, style: &GraphicStyle) {
        self.events.push(SinkEvent::SetStyle(style.clone()));
    }

    fn open_group(&mut self) {
        self.events.push(SinkEvent::OpenGroup);
    }

    fn close_group(&mut self) {
        self.events.push(SinkEvent::CloseGroup);
    }

    fn draw_rectangle(&mut self, rect: &RectangleElement) {
        self.events.push(SinkEvent::Rectangle(rect.clone()));
    }

    fn draw_ellipse(&mut self, ellipse: &EllipseElement) {
        self.events.push(SinkEvent::Ellipse(ellipse.clone()));
    }

    fn draw_path(&mut self, path: &PathElement) {
        self.events.push(SinkEvent::Path(path.clone()));
    }

    fn draw_connector(&mut self, connector: &ConnectorElement) {
        self.events.push(SinkEvent::Connector(connector.clone()));
    }

    fn define_character_style(&mut self, style: &CharacterStyle) {
        self.events.push(SinkEvent::CharacterStyle(style.clone()));
    }

    fn start_text_object(&mut self, area: &TextArea) {
        self.events.push(SinkEvent::StartTextObject(area.clone()));
    }

    fn end_text_object(&mut self) {
        self.events.push(SinkEvent::EndTextObject);
    }

    fn open_paragraph(&mut self) {
        self.events.push(SinkEvent::OpenParagraph);
    }

    fn close_paragraph(&mut self) {
        self.events.push(SinkEvent::CloseParagraph);
    }

    fn open_span(&mut self) {
        self.events.push(SinkEvent::OpenSpan);
    }

    fn close_span(&mut self) {
        self.events.push(SinkEvent::CloseSpan);
    }

    fn insert_text(&mut self, text: &str) {
        self.events.push(SinkEvent::Text(text.to_string()));
    }
}
