//! The resolved visual attributes of a cell.
//!
//! [`Style`] and [`TextStyle`] are wide records populated once per cell by
//! [`parse::parse_style`]; every field has the format's documented default
//! so a missing or malformed token simply leaves the default in place.

pub mod parse;

use std::f64::consts::PI;
use std::str::FromStr;

use crate::color::Color;

/// One of the four cardinal orientations, used both as a shape's facing
/// and as an edge stub's outgoing direction.
///
/// The discriminants are chosen so that the opposite direction is two
/// steps away and horizontal directions are the odd ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Direction {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl Direction {
    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    pub fn is_horizontal(self) -> bool {
        self.index() % 2 == 1
    }

    pub fn is_vertical(self) -> bool {
        !self.is_horizontal()
    }

    pub fn perpendicular(self, other: Direction) -> bool {
        (self.index() as i8 - other.index() as i8).unsigned_abs() % 2 == 1
    }

    /// The rotation an east-facing canonical shape has been turned
    /// through to face this direction.
    pub fn facing_angle(self) -> f64 {
        PI * (self.index() as f64 - 1.0) / 2.0
    }
}

impl FromStr for Direction {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "north" => Ok(Self::North),
            "east" => Ok(Self::East),
            "south" => Ok(Self::South),
            "west" => Ok(Self::West),
            _ => Err("invalid direction"),
        }
    }
}

/// Horizontal alignment of a label within its text area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AlignH {
    Left = 0,
    Center = 1,
    Right = 2,
}

impl AlignH {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

impl FromStr for AlignH {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Self::Left),
            "center" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            _ => Err("invalid horizontal alignment"),
        }
    }
}

/// Vertical alignment of a label within its text area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AlignV {
    Top = 0,
    Middle = 1,
    Bottom = 2,
}

impl AlignV {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Middle => "middle",
            Self::Bottom => "bottom",
        }
    }
}

impl FromStr for AlignV {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top" => Ok(Self::Top),
            "middle" => Ok(Self::Middle),
            "bottom" => Ok(Self::Bottom),
            _ => Err("invalid vertical alignment"),
        }
    }
}

/// The closed set of vertex shape families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Rectangle,
    Ellipse,
    Triangle,
    Callout,
    Process,
    Rhombus,
    Parallelogram,
    Hexagon,
    Step,
    Trapezoid,
    Card,
    InternalStorage,
    Or,
    Xor,
    Document,
    Tape,
    DataStorage,
}

/// The perimeter model used for edge attachment; a subset of the shape
/// families has a dedicated one, everything else projects as a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerimeterKind {
    Rectangle,
    Ellipse,
    Triangle,
    Callout,
    Rhombus,
    Parallelogram,
    Hexagon,
    Step,
    Trapezoid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeStyle {
    Straight,
    Orthogonal,
}

/// Arrow marker families. `Classic` is the only kind the format defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Classic,
}

impl Marker {
    pub fn view_box(self) -> &'static str {
        match self {
            Self::Classic => "0 0 40 40",
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Self::Classic => "M 20 0 L 40 40 L 20 30 L 0 40 Z",
        }
    }
}

/// The full resolved styling for one cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub opacity: f64,
    pub entry_x: Option<f64>,
    pub entry_y: Option<f64>,
    pub exit_x: Option<f64>,
    pub exit_y: Option<f64>,
    pub entry_dx: f64,
    pub entry_dy: f64,
    pub exit_dx: f64,
    pub exit_dy: f64,
    pub rotation: f64,
    pub fill_color: Option<Color>,
    pub stroke_color: Option<Color>,
    pub port_constraint: Option<Direction>,
    pub source_port_constraint: Option<Direction>,
    pub target_port_constraint: Option<Direction>,
    pub shape: ShapeKind,
    pub perimeter: PerimeterKind,
    pub edge_style: EdgeStyle,
    pub direction: Direction,
    pub start_fixed: bool,
    pub end_fixed: bool,
    pub callout_length: f64,
    pub callout_width: f64,
    pub callout_position: f64,
    pub callout_tip_position: f64,
    pub process_bar_size: f64,
    pub parallelogram_size: f64,
    pub hexagon_size: f64,
    pub step_size: f64,
    pub trapezoid_size: f64,
    pub card_size: f64,
    pub storage_x: f64,
    pub storage_y: f64,
    pub document_size: f64,
    pub tape_size: f64,
    pub data_storage_size: f64,
    pub fixed_size: bool,
    pub start_arrow: Option<Marker>,
    pub start_fill: bool,
    pub start_size: f64,
    pub end_arrow: Option<Marker>,
    pub end_fill: bool,
    pub end_size: f64,
    pub align: AlignH,
    pub vertical_align: AlignV,
    pub position: AlignH,
    pub vertical_position: AlignV,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            opacity: 100.0,
            entry_x: None,
            entry_y: None,
            exit_x: None,
            exit_y: None,
            entry_dx: 0.0,
            entry_dy: 0.0,
            exit_dx: 0.0,
            exit_dy: 0.0,
            rotation: 0.0,
            fill_color: Some(Color::WHITE),
            stroke_color: Some(Color::BLACK),
            port_constraint: None,
            source_port_constraint: None,
            target_port_constraint: None,
            shape: ShapeKind::Rectangle,
            perimeter: PerimeterKind::Rectangle,
            edge_style: EdgeStyle::Straight,
            direction: Direction::East,
            start_fixed: false,
            end_fixed: false,
            callout_length: 30.0,
            callout_width: 20.0,
            callout_position: 0.5,
            callout_tip_position: 0.5,
            process_bar_size: 0.1,
            parallelogram_size: 20.0,
            hexagon_size: 20.0,
            step_size: 20.0,
            trapezoid_size: 20.0,
            card_size: 20.0,
            storage_x: 20.0,
            storage_y: 20.0,
            document_size: 0.3,
            tape_size: 0.4,
            data_storage_size: 20.0,
            fixed_size: true,
            start_arrow: None,
            start_fill: true,
            start_size: 6.0,
            end_arrow: Some(Marker::Classic),
            end_fill: true,
            end_size: 6.0,
            align: AlignH::Center,
            vertical_align: AlignV::Middle,
            position: AlignH::Center,
            vertical_position: AlignV::Middle,
        }
    }
}

/// Resolved character formatting for a cell's label.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: f64,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub font_color: Option<Color>,
    pub background_color: Option<Color>,
    pub border_color: Option<Color>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "Helvetica".to_string(),
            font_size: 12.0,
            bold: false,
            italic: false,
            underline: false,
            font_color: Some(Color::BLACK),
            background_color: None,
            border_color: None,
        }
    }
}
