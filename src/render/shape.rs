//! Realizes a vertex as a drawable primitive or path.
//!
//! Every shape family becomes one [`ShapeDescriptor`] variant carrying
//! its typed size parameters; dispatch happens once per cell when the
//! descriptor is built from the style record.

use std::f64::consts::PI;

use crate::cell::Geometry;
use crate::geometry::Point;
use crate::render::path::PathBuilder;
use crate::sink::{PathStep, RectTransform};
use crate::style::{ShapeKind, Style};

/// A shape family plus the size parameters its outline needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeDescriptor {
    Rectangle,
    Ellipse,
    Triangle,
    Callout {
        length: f64,
        width: f64,
        position: f64,
        tip_position: f64,
    },
    Process {
        bar_size: f64,
    },
    Rhombus,
    Parallelogram {
        size: f64,
    },
    Hexagon {
        size: f64,
    },
    Step {
        size: f64,
    },
    Trapezoid {
        size: f64,
    },
    Card {
        size: f64,
    },
    InternalStorage {
        dx: f64,
        dy: f64,
    },
    Or,
    Xor,
    Document {
        size: f64,
    },
    Tape {
        size: f64,
    },
    DataStorage {
        size: f64,
    },
}

/// What a realized shape asks the sink for.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeOutline {
    Rectangle {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        transform: RectTransform,
    },
    Ellipse {
        cx: f64,
        cy: f64,
        rx: f64,
        ry: f64,
        rotation: f64,
    },
    Path(Vec<PathStep>),
}

impl ShapeDescriptor {
    pub fn from_style(style: &Style) -> Self {
        match style.shape {
            ShapeKind::Rectangle => Self::Rectangle,
            ShapeKind::Ellipse => Self::Ellipse,
            ShapeKind::Triangle => Self::Triangle,
            ShapeKind::Callout => Self::Callout {
                length: style.callout_length,
                width: style.callout_width,
                position: style.callout_position,
                tip_position: style.callout_tip_position,
            },
            ShapeKind::Process => Self::Process {
                bar_size: style.process_bar_size,
            },
            ShapeKind::Rhombus => Self::Rhombus,
            ShapeKind::Parallelogram => Self::Parallelogram {
                size: style.parallelogram_size,
            },
            ShapeKind::Hexagon => Self::Hexagon {
                size: style.hexagon_size,
            },
            ShapeKind::Step => Self::Step {
                size: style.step_size,
            },
            ShapeKind::Trapezoid => Self::Trapezoid {
                size: style.trapezoid_size,
            },
            ShapeKind::Card => Self::Card {
                size: style.card_size,
            },
            ShapeKind::InternalStorage => Self::InternalStorage {
                dx: style.storage_x,
                dy: style.storage_y,
            },
            ShapeKind::Or => Self::Or,
            ShapeKind::Xor => Self::Xor,
            ShapeKind::Document => Self::Document {
                size: style.document_size,
            },
            ShapeKind::Tape => Self::Tape {
                size: style.tape_size,
            },
            ShapeKind::DataStorage => Self::DataStorage {
                size: style.data_storage_size,
            },
        }
    }

    /// Realizes the outline for a vertex whose geometry has already been
    /// offset into world coordinates.
    pub fn outline(&self, geometry: &Geometry, style: &Style) -> ShapeOutline {
        match *self {
            Self::Rectangle => rectangle_outline(geometry, style),
            Self::Ellipse => ShapeOutline::Ellipse {
                cx: geometry.x / 100.0 + geometry.width / 200.0,
                cy: geometry.y / 100.0 + geometry.height / 200.0,
                rx: geometry.width / 200.0,
                ry: geometry.height / 200.0,
                rotation: -style.rotation,
            },
            _ => {
                let mut path = PathBuilder::new(geometry, style);
                self.emit(&mut path);
                ShapeOutline::Path(path.into_steps())
            }
        }
    }

    /// Emits the local-frame outline for the path-drawn families.
    fn emit(&self, c: &mut PathBuilder) {
        let w = c.width();
        let h = c.height();
        match *self {
            Self::Rectangle | Self::Ellipse => {}
            Self::Triangle => {
                c.add_points(&[(0.0, 0.0), (w, h / 2.0), (0.0, h)], true);
            }
            Self::Callout {
                length,
                width,
                position,
                tip_position,
            } => {
                let s = (length / 100.0).max(0.0);
                let dx = w * position.clamp(0.0, 1.0);
                let dx2 = w * tip_position.clamp(0.0, 1.0);
                let base = (width / 100.0).max(0.0);
                c.add_points(
                    &[
                        (0.0, 0.0),
                        (w, 0.0),
                        (w, h - s),
                        (dx + base, h - s),
                        (dx2, h),
                        (dx, h - s),
                        (0.0, h - s),
                    ],
                    true,
                );
            }
            Self::Process { bar_size } => {
                let inset = w * bar_size.clamp(0.0, 1.0);
                c.move_to(inset, 0.0);
                c.line_to(inset, h);
                c.close();
                c.move_to(w - inset, 0.0);
                c.line_to(w - inset, h);
                c.close();
                c.add_points(&[(0.0, 0.0), (w, 0.0), (w, h), (0.0, h)], true);
            }
            Self::Rhombus => {
                c.add_points(
                    &[(w / 2.0, 0.0), (w, h / 2.0), (w / 2.0, h), (0.0, h / 2.0)],
                    true,
                );
            }
            Self::Parallelogram { size } => {
                let dx = size / 100.0;
                c.add_points(&[(0.0, h), (dx, 0.0), (w, 0.0), (w - dx, h)], true);
            }
            Self::Hexagon { size } => {
                let s = size / 100.0;
                c.add_points(
                    &[
                        (s, 0.0),
                        (w - s, 0.0),
                        (w, h / 2.0),
                        (w - s, h),
                        (s, h),
                        (0.0, h / 2.0),
                    ],
                    true,
                );
            }
            Self::Step { size } => {
                let s = size / 100.0;
                c.add_points(
                    &[
                        (0.0, 0.0),
                        (w - s, 0.0),
                        (w, h / 2.0),
                        (w - s, h),
                        (0.0, h),
                        (s, h / 2.0),
                    ],
                    true,
                );
            }
            Self::Trapezoid { size } => {
                let dx = size / 100.0;
                c.add_points(&[(0.0, h), (dx, 0.0), (w - dx, 0.0), (w, h)], true);
            }
            Self::Card { size } => {
                let s = size / 100.0;
                c.add_points(&[(s, 0.0), (w, 0.0), (w, h), (0.0, h), (0.0, s)], true);
            }
            Self::InternalStorage { dx, dy } => {
                let dx = dx / 100.0;
                let dy = dy / 100.0;
                c.move_to(0.0, dy);
                c.line_to(w, dy);
                c.close();
                c.move_to(dx, 0.0);
                c.line_to(dx, h);
                c.close();
                c.add_points(&[(0.0, 0.0), (w, 0.0), (w, h), (0.0, h)], true);
            }
            Self::Or => {
                c.move_to(0.0, 0.0);
                c.quad_to(w, 0.0, w, h / 2.0);
                c.quad_to(w, h, 0.0, h);
                c.close();
            }
            Self::Xor => {
                c.move_to(0.0, 0.0);
                c.quad_to(w, 0.0, w, h / 2.0);
                c.quad_to(w, h, 0.0, h);
                c.quad_to(w / 2.0, h / 2.0, 0.0, 0.0);
                c.close();
            }
            Self::Document { size } => {
                let dy = h * size;
                let fy = 1.4;
                c.move_to(0.0, 0.0);
                c.line_to(w, 0.0);
                c.line_to(w, h - dy / 2.0);
                c.quad_to(w * 3.0 / 4.0, h - dy * fy, w / 2.0, h - dy / 2.0);
                c.quad_to(w / 4.0, h - dy * (1.0 - fy), 0.0, h - dy / 2.0);
                c.close();
            }
            Self::Tape { size } => {
                let dy = h * size;
                let fy = 1.4;
                c.move_to(0.0, dy / 2.0);
                c.quad_to(w / 4.0, dy * fy, w / 2.0, dy / 2.0);
                c.quad_to(w * 3.0 / 4.0, dy * (1.0 - fy), w, dy / 2.0);
                c.line_to(w, h - dy / 2.0);
                c.quad_to(w * 3.0 / 4.0, h - dy * fy, w / 2.0, h - dy / 2.0);
                c.quad_to(w / 4.0, h - dy * (1.0 - fy), 0.0, h - dy / 2.0);
                c.close();
            }
            Self::DataStorage { size } => {
                let s = size / 100.0;
                c.move_to(s, 0.0);
                c.line_to(w, 0.0);
                c.quad_to(w - 2.0 * s, h / 2.0, w, h);
                c.line_to(s, h);
                c.quad_to(-s, h / 2.0, s, 0.0);
                c.close();
            }
        }
    }
}

/// A rectangle stays a sink primitive; rotation is expressed as a
/// transform chain that keeps the rotated box anchored at the original
/// top-left corner.
fn rectangle_outline(geometry: &Geometry, style: &Style) -> ShapeOutline {
    let rx = geometry.width / 200.0;
    let ry = geometry.height / 200.0;
    let cx = geometry.x / 100.0 + rx;
    let cy = geometry.y / 100.0 + ry;
    let angle = -style.rotation * PI / 180.0;
    let (dx, dy) = if rx == 0.0 && ry == 0.0 {
        (0.0, 0.0)
    } else {
        let r = (rx.powi(2) + ry.powi(2)).sqrt();
        (
            r * ((ry / rx).atan() - angle).cos() - rx,
            r * ((ry / rx).atan() - angle).sin() - ry,
        )
    };
    ShapeOutline::Rectangle {
        x: geometry.x / 100.0,
        y: geometry.y / 100.0,
        width: geometry.width / 100.0,
        height: geometry.height / 100.0,
        transform: RectTransform {
            pre_translate: Point::new(-geometry.x / 100.0, -geometry.y / 100.0),
            angle,
            post_translate: Point::new(cx - rx - dx, cy - ry - dy),
        },
    }
}
