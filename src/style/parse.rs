//! Parser for the semicolon-separated `key=value` style strings.
//!
//! Unknown keys and unrecognized values are ignored without error;
//! diagrams in the wild routinely carry vendor extensions, and a bad
//! token must never lose the rest of the style.

use std::collections::HashMap;
use std::str::FromStr;

use crate::cell::Geometry;
use crate::color::Color;
use crate::style::{
    AlignH, AlignV, Direction, EdgeStyle, Marker, PerimeterKind, ShapeKind, Style, TextStyle,
};

/// What a color-valued token asks for: keep the attribute's default,
/// clear it, or set a concrete color.
enum ColorToken {
    Default,
    None,
    Value(Color),
}

fn color_token(value: &str) -> ColorToken {
    match value {
        "none" => ColorToken::None,
        "default" => ColorToken::Default,
        other => match other.parse::<Color>() {
            Ok(color) => ColorToken::Value(color),
            Err(_) => ColorToken::Default,
        },
    }
}

fn apply_color(slot: &mut Option<Color>, value: &str) {
    match color_token(value) {
        ColorToken::Default => {}
        ColorToken::None => *slot = None,
        ColorToken::Value(color) => *slot = Some(color),
    }
}

fn number(tokens: &HashMap<&str, &str>, key: &str) -> Option<f64> {
    tokens.get(key).and_then(|v| v.parse::<f64>().ok())
}

fn boolean(tokens: &HashMap<&str, &str>, key: &str) -> Option<bool> {
    tokens.get(key).and_then(|v| match *v {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    })
}

fn direction(tokens: &HashMap<&str, &str>, key: &str) -> Option<Direction> {
    tokens.get(key).and_then(|v| Direction::from_str(v).ok())
}

fn marker(slot: &mut Option<Marker>, value: &str) {
    match value {
        "none" => *slot = None,
        "classic" => *slot = Some(Marker::Classic),
        _ => {}
    }
}

/// Parses a style string into the style and text-style records.
///
/// `source_bound`/`target_bound` report whether the cell names a source
/// or target shape; they feed the fixed-endpoint flags. `geometry` is
/// consulted only for proportional shape sizes.
pub fn parse_style(
    style_str: &str,
    source_bound: bool,
    target_bound: bool,
    geometry: &Geometry,
) -> (Style, TextStyle) {
    let mut style = Style::default();
    let mut text = TextStyle::default();

    let mut tokens: HashMap<&str, &str> = HashMap::new();
    for token in style_str.split(';') {
        let (key, value) = match token.split_once('=') {
            Some((key, value)) => (key, value),
            None => (token, ""),
        };
        tokens.insert(key, value);
    }

    style.entry_x = number(&tokens, "entryX").or(style.entry_x);
    style.entry_y = number(&tokens, "entryY").or(style.entry_y);
    style.exit_x = number(&tokens, "exitX").or(style.exit_x);
    style.exit_y = number(&tokens, "exitY").or(style.exit_y);
    if let Some(v) = number(&tokens, "entryDx") {
        style.entry_dx = v;
    }
    if let Some(v) = number(&tokens, "entryDy") {
        style.entry_dy = v;
    }
    if let Some(v) = number(&tokens, "exitDx") {
        style.exit_dx = v;
    }
    if let Some(v) = number(&tokens, "exitDy") {
        style.exit_dy = v;
    }
    style.start_fixed = (style.exit_x.is_some() && style.exit_y.is_some()) || !source_bound;
    style.end_fixed = (style.entry_x.is_some() && style.entry_y.is_some()) || !target_bound;

    style.source_port_constraint =
        direction(&tokens, "sourcePortConstraint").or(style.source_port_constraint);
    style.target_port_constraint =
        direction(&tokens, "targetPortConstraint").or(style.target_port_constraint);
    style.port_constraint = direction(&tokens, "PortConstraint").or(style.port_constraint);

    if tokens.contains_key("ellipse") {
        style.shape = ShapeKind::Ellipse;
        style.perimeter = PerimeterKind::Ellipse;
    }
    if tokens.contains_key("triangle") {
        style.shape = ShapeKind::Triangle;
        style.perimeter = PerimeterKind::Triangle;
    }
    if tokens.contains_key("rhombus") {
        style.shape = ShapeKind::Rhombus;
        style.perimeter = PerimeterKind::Rhombus;
    }
    if let Some(value) = tokens.get("shape") {
        match *value {
            "callout" => style.shape = ShapeKind::Callout,
            "process" => style.shape = ShapeKind::Process,
            "parallelogram" => style.shape = ShapeKind::Parallelogram,
            "hexagon" => style.shape = ShapeKind::Hexagon,
            "step" => style.shape = ShapeKind::Step,
            "trapezoid" => style.shape = ShapeKind::Trapezoid,
            "card" => style.shape = ShapeKind::Card,
            "internalStorage" => style.shape = ShapeKind::InternalStorage,
            "or" => style.shape = ShapeKind::Or,
            "xor" => style.shape = ShapeKind::Xor,
            "document" => style.shape = ShapeKind::Document,
            "tape" => style.shape = ShapeKind::Tape,
            "dataStorage" => style.shape = ShapeKind::DataStorage,
            _ => {}
        }
    }
    if let Some(value) = tokens.get("perimeter") {
        match *value {
            "rectanglePerimeter" => style.perimeter = PerimeterKind::Rectangle,
            "ellipsePerimeter" => style.perimeter = PerimeterKind::Ellipse,
            "trianglePerimeter" => style.perimeter = PerimeterKind::Triangle,
            "calloutPerimeter" => style.perimeter = PerimeterKind::Callout,
            "rhombusPerimeter" => style.perimeter = PerimeterKind::Rhombus,
            "parallelogramPerimeter" => style.perimeter = PerimeterKind::Parallelogram,
            "hexagonPerimeter2" => style.perimeter = PerimeterKind::Hexagon,
            "stepPerimeter" => style.perimeter = PerimeterKind::Step,
            "trapezoidPerimeter" => style.perimeter = PerimeterKind::Trapezoid,
            _ => {}
        }
    }
    if let Some(dir) = direction(&tokens, "direction") {
        style.direction = dir;
    }
    if let Some(fixed) = boolean(&tokens, "fixedSize") {
        style.fixed_size = fixed;
    }

    if let Some(size) = number(&tokens, "size") {
        match style.shape {
            ShapeKind::Callout => style.callout_length = size,
            ShapeKind::Process => style.process_bar_size = size,
            ShapeKind::Parallelogram => style.parallelogram_size = size,
            ShapeKind::Hexagon => style.hexagon_size = size,
            ShapeKind::Step => {
                style.step_size = size;
                if !style.fixed_size {
                    // A proportional step size scales by the dimension the
                    // shape points along.
                    style.step_size *= if style.direction.is_vertical() {
                        geometry.height
                    } else {
                        geometry.width
                    };
                }
            }
            ShapeKind::Trapezoid => style.trapezoid_size = size,
            ShapeKind::Card => style.card_size = size,
            ShapeKind::Document => style.document_size = size,
            ShapeKind::Tape => style.tape_size = size,
            ShapeKind::DataStorage => style.data_storage_size = size,
            _ => {}
        }
    }
    if let Some(base) = number(&tokens, "base") {
        if style.shape == ShapeKind::Callout {
            style.callout_width = base;
        }
    }
    if let Some(position) = number(&tokens, "position") {
        if style.shape == ShapeKind::Callout {
            style.callout_position = position;
        }
    }
    if let Some(position) = number(&tokens, "position2") {
        if style.shape == ShapeKind::Callout {
            style.callout_tip_position = position;
        }
    }
    if let Some(dx) = number(&tokens, "dx") {
        if style.shape == ShapeKind::InternalStorage {
            style.storage_x = dx;
        }
    }
    if let Some(dy) = number(&tokens, "dy") {
        if style.shape == ShapeKind::InternalStorage {
            style.storage_y = dy;
        }
    }

    if let Some(value) = tokens.get("fillColor") {
        apply_color(&mut style.fill_color, value);
    }
    if let Some(value) = tokens.get("strokeColor") {
        apply_color(&mut style.stroke_color, value);
    }
    if let Some(value) = tokens.get("startArrow") {
        marker(&mut style.start_arrow, value);
    }
    if let Some(fill) = boolean(&tokens, "startFill") {
        style.start_fill = fill;
    }
    if let Some(size) = number(&tokens, "startSize") {
        style.start_size = size;
    }
    if let Some(value) = tokens.get("endArrow") {
        marker(&mut style.end_arrow, value);
    }
    if let Some(fill) = boolean(&tokens, "endFill") {
        style.end_fill = fill;
    }
    if let Some(size) = number(&tokens, "endSize") {
        style.end_size = size;
    }
    if let Some(rotation) = number(&tokens, "rotation") {
        style.rotation = rotation.rem_euclid(360.0);
    }
    if let Some(opacity) = number(&tokens, "opacity") {
        style.opacity = opacity.clamp(0.0, 100.0);
    }
    if let Some(value) = tokens.get("edgeStyle") {
        if *value == "orthogonalEdgeStyle" {
            style.edge_style = EdgeStyle::Orthogonal;
        }
    }
    if let Some(value) = tokens.get("align") {
        if let Ok(align) = AlignH::from_str(value) {
            style.align = align;
        }
    }
    if let Some(value) = tokens.get("verticalAlign") {
        if let Ok(align) = AlignV::from_str(value) {
            style.vertical_align = align;
        }
    }
    if let Some(value) = tokens.get("labelPosition") {
        if let Ok(align) = AlignH::from_str(value) {
            style.position = align;
        }
    }
    if let Some(value) = tokens.get("verticalLabelPosition") {
        if let Ok(align) = AlignV::from_str(value) {
            style.vertical_position = align;
        }
    }

    if let Some(family) = tokens.get("fontFamily") {
        text.font_family = family.to_string();
    }
    if let Some(size) = number(&tokens, "fontSize") {
        text.font_size = size;
    }
    if let Some(bits) = number(&tokens, "fontStyle") {
        let bits = bits as i64;
        text.bold = bits & 1 != 0;
        text.italic = bits & 2 != 0;
        text.underline = bits & 4 != 0;
    }
    if let Some(value) = tokens.get("fontColor") {
        apply_color(&mut text.font_color, value);
    }
    if let Some(value) = tokens.get("labelBackgroundColor") {
        apply_color(&mut text.background_color, value);
    }
    if let Some(value) = tokens.get("labelBorderColor") {
        apply_color(&mut text.border_color, value);
    }

    (style, text)
}
