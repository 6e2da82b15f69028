//! An SVG rendition of the drawing-sink capability.
//!
//! Groups become `<g>` elements, primitives and paths carry the fill
//! and stroke of the most recently registered style, and arrow markers
//! are collected into `<defs>` keyed by style name.

use std::collections::HashSet;
use std::fs::File;
use std::io::Write as _;
use std::path::Path;

use log::{debug, info};
use svg::node::element as svg_element;
use svg::Document;

use crate::error::SextantError;
use crate::sink::{
    CharacterStyle, ConnectorElement, DrawingSink, EllipseElement, GraphicStyle, MarkerProps,
    PathElement, PathStep, RectangleElement, TextArea,
};
use crate::style::{AlignH, AlignV};

/// A [`DrawingSink`] that assembles an [`svg::Document`].
pub struct SvgSink {
    document: Document,
    defs: svg_element::Definitions,
    defined_markers: HashSet<String>,
    groups: Vec<svg_element::Group>,
    style: Option<GraphicStyle>,
    area: Option<TextArea>,
    character: Option<CharacterStyle>,
}

impl SvgSink {
    pub fn new() -> Self {
        Self {
            document: Document::new(),
            defs: svg_element::Definitions::new(),
            defined_markers: HashSet::new(),
            groups: Vec::new(),
            style: None,
            area: None,
            character: None,
        }
    }

    /// Sets the document view box, in display units.
    pub fn set_view_box(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let document = std::mem::replace(&mut self.document, Document::new());
        self.document = document.set("viewBox", format!("{x} {y} {width} {height}"));
    }

    /// Closes any groups left open and returns the finished document.
    pub fn finish(mut self) -> Document {
        while !self.groups.is_empty() {
            self.close_group();
        }
        let document = self.document;
        document.add(self.defs)
    }

    /// Finishes the document and writes it to `path`.
    pub fn write<P: AsRef<Path>>(self, path: P) -> Result<(), SextantError> {
        let path = path.as_ref();
        info!(file_name = path.display().to_string().as_str(); "Creating SVG file");
        let document = self.finish();
        let file = File::create(path)?;
        write!(&file, "{document}")?;
        debug!("SVG document written");
        Ok(())
    }

    fn attach(&mut self, node: Box<dyn svg::Node>) {
        if let Some(group) = self.groups.pop() {
            self.groups.push(group.add(node));
        } else {
            let document = std::mem::replace(&mut self.document, Document::new());
            self.document = document.add(node);
        }
    }

    fn fill_value(&self) -> String {
        match self.style.as_ref().and_then(|style| style.fill) {
            Some(color) => color.to_string(),
            None => "none".to_string(),
        }
    }

    fn stroke_value(&self) -> String {
        match self.style.as_ref().and_then(|style| style.stroke) {
            Some(color) => color.to_string(),
            None => "none".to_string(),
        }
    }

    fn define_marker(&mut self, id: String, props: &MarkerProps) {
        if !self.defined_markers.insert(id.clone()) {
            return;
        }
        let marker = svg_element::Marker::new()
            .set("id", id)
            .set("viewBox", props.view_box)
            .set("refX", 20)
            .set("refY", 20)
            .set("markerWidth", props.width * 100.0)
            .set("markerHeight", props.width * 100.0)
            .set("orient", "auto")
            .add(
                svg_element::Path::new()
                    .set("d", props.path)
                    .set("fill", self.fill_value()),
            );
        let defs = std::mem::replace(&mut self.defs, svg_element::Definitions::new());
        self.defs = defs.add(marker);
    }
}

impl Default for SvgSink {
    fn default() -> Self {
        Self::new()
    }
}

fn path_data(steps: &[PathStep]) -> String {
    let mut data = String::new();
    for step in steps {
        if !data.is_empty() {
            data.push(' ');
        }
        match *step {
            PathStep::MoveTo(p) => data.push_str(&format!("M {} {}", p.x, p.y)),
            PathStep::LineTo(p) => data.push_str(&format!("L {} {}", p.x, p.y)),
            PathStep::QuadTo { ctrl, to } => {
                data.push_str(&format!("Q {} {} {} {}", ctrl.x, ctrl.y, to.x, to.y))
            }
            PathStep::CurveTo { ctrl1, ctrl2, to } => data.push_str(&format!(
                "C {} {} {} {} {} {}",
                ctrl1.x, ctrl1.y, ctrl2.x, ctrl2.y, to.x, to.y
            )),
            PathStep::Close => data.push('Z'),
        }
    }
    data
}

impl DrawingSink for SvgSink {
    fn set_style(&mut self, style: &GraphicStyle) {
        // Marker fills depend on the style being registered, so keep the
        // style current before building the defs.
        self.style = Some(style.clone());
        if let Some(props) = style.marker_start.clone() {
            self.define_marker(format!("{}-start", style.name), &props);
        }
        if let Some(props) = style.marker_end.clone() {
            self.define_marker(format!("{}-end", style.name), &props);
        }
    }

    fn open_group(&mut self) {
        self.groups.push(svg_element::Group::new());
    }

    fn close_group(&mut self) {
        if let Some(group) = self.groups.pop() {
            self.attach(Box::new(group));
        }
    }

    fn draw_rectangle(&mut self, rect: &RectangleElement) {
        let mut node = svg_element::Rectangle::new()
            .set("x", rect.x)
            .set("y", rect.y)
            .set("width", rect.width)
            .set("height", rect.height)
            .set("fill", self.fill_value())
            .set("stroke", self.stroke_value());
        if let Some(id) = &rect.id {
            node = node.set("id", id.clone());
        }
        if rect.transform.angle != 0.0 {
            let t = rect.transform;
            node = node.set(
                "transform",
                format!(
                    "translate({} {}) rotate({}) translate({} {})",
                    t.pre_translate.x,
                    t.pre_translate.y,
                    t.angle.to_degrees(),
                    t.post_translate.x,
                    t.post_translate.y,
                ),
            );
        }
        self.attach(Box::new(node));
    }

    fn draw_ellipse(&mut self, ellipse: &EllipseElement) {
        let mut node = svg_element::Ellipse::new()
            .set("cx", ellipse.cx)
            .set("cy", ellipse.cy)
            .set("rx", ellipse.rx)
            .set("ry", ellipse.ry)
            .set("fill", self.fill_value())
            .set("stroke", self.stroke_value());
        if let Some(id) = &ellipse.id {
            node = node.set("id", id.clone());
        }
        if ellipse.rotation != 0.0 {
            node = node.set(
                "transform",
                format!(
                    "rotate({} {} {})",
                    ellipse.rotation, ellipse.cx, ellipse.cy
                ),
            );
        }
        self.attach(Box::new(node));
    }

    fn draw_path(&mut self, path: &PathElement) {
        let mut node = svg_element::Path::new()
            .set("d", path_data(&path.steps))
            .set("fill", self.fill_value())
            .set("stroke", self.stroke_value());
        if let Some(id) = &path.id {
            node = node.set("id", id.clone());
        }
        self.attach(Box::new(node));
    }

    fn draw_connector(&mut self, connector: &ConnectorElement) {
        let mut node = svg_element::Path::new()
            .set("d", path_data(&connector.steps))
            .set("fill", "none")
            .set("stroke", self.stroke_value());
        if let Some(id) = &connector.id {
            node = node.set("id", id.clone());
        }
        if let Some(style) = &self.style {
            if style.marker_start.is_some() {
                node = node.set("marker-start", format!("url(#{}-start)", style.name));
            }
            if style.marker_end.is_some() {
                node = node.set("marker-end", format!("url(#{}-end)", style.name));
            }
        }
        self.attach(Box::new(node));
    }

    fn define_character_style(&mut self, style: &CharacterStyle) {
        self.character = Some(style.clone());
    }

    fn start_text_object(&mut self, area: &TextArea) {
        self.area = Some(area.clone());
    }

    fn end_text_object(&mut self) {
        self.area = None;
        self.character = None;
    }

    fn open_paragraph(&mut self) {}

    fn close_paragraph(&mut self) {}

    fn open_span(&mut self) {}

    fn close_span(&mut self) {}

    fn insert_text(&mut self, text: &str) {
        let Some(area) = self.area.clone() else {
            return;
        };
        let (x, anchor) = match area.align {
            AlignH::Left => (area.x, "start"),
            AlignH::Center => (area.x + area.width / 2.0, "middle"),
            AlignH::Right => (area.x + area.width, "end"),
        };
        let y = match area.vertical_align {
            AlignV::Top => area.y,
            AlignV::Middle => area.y + area.height / 2.0,
            AlignV::Bottom => area.y + area.height,
        };
        let mut node = svg_element::Text::new(text)
            .set("x", x)
            .set("y", y)
            .set("text-anchor", anchor)
            .set("dominant-baseline", "middle");
        if let Some(character) = &self.character {
            node = node
                .set("font-family", character.font_name.clone())
                .set("font-size", format!("{}pt", character.font_size_pt));
            if let Some(color) = character.color {
                node = node.set("fill", color.to_string());
            }
            if character.bold {
                node = node.set("font-weight", "bold");
            }
            if character.italic {
                node = node.set("font-style", "italic");
            }
            if character.underline {
                node = node.set("text-decoration", "underline");
            }
        }
        self.attach(Box::new(node));
    }
}
