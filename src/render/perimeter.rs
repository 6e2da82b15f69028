//! Projects normalized bounding-box points onto shape perimeters.
//!
//! Edge attachment works on the unit box of a shape's local frame: a
//! point on the box edge is moved along the ray from the box center onto
//! the shape's actual outline. Points strictly inside the box collapse
//! to the center.

use std::f64::consts::PI;

use crate::cell::Geometry;
use crate::style::{PerimeterKind, Style};

/// A perimeter with its slope parameter already normalized against the
/// facing axis of the shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PerimeterModel {
    Rectangle,
    Ellipse,
    Triangle,
    Rhombus,
    Parallelogram { slope: f64 },
    Hexagon { slope: f64 },
    Step { slope: f64 },
    Trapezoid { slope: f64 },
}

impl PerimeterModel {
    pub fn of(style: &Style, geometry: &Geometry) -> Self {
        let axis = if style.direction.is_vertical() {
            geometry.height
        } else {
            geometry.width
        };
        match style.perimeter {
            // A callout attaches like a plain box.
            PerimeterKind::Rectangle | PerimeterKind::Callout => Self::Rectangle,
            PerimeterKind::Ellipse => Self::Ellipse,
            PerimeterKind::Triangle => Self::Triangle,
            PerimeterKind::Rhombus => Self::Rhombus,
            PerimeterKind::Parallelogram => Self::Parallelogram {
                slope: (style.parallelogram_size / axis).min(0.5),
            },
            PerimeterKind::Hexagon => Self::Hexagon {
                slope: (style.hexagon_size / axis).min(0.5),
            },
            PerimeterKind::Step => Self::Step {
                slope: style.step_size / axis,
            },
            PerimeterKind::Trapezoid => Self::Trapezoid {
                slope: (style.trapezoid_size / axis).min(0.5),
            },
        }
    }

    /// Maps `(x, y)` on the unit box onto the perimeter. Points strictly
    /// inside the box return the center.
    pub fn project(&self, x: f64, y: f64) -> (f64, f64) {
        if 0.0 < x && x < 1.0 && 0.0 < y && y < 1.0 {
            return (0.5, 0.5);
        }
        let (mut out_x, mut out_y) = (x, y);
        match *self {
            Self::Rectangle => {}
            Self::Triangle => {
                if y < 0.5 && x > 0.0 {
                    let m = (x - 0.5) / (y - 0.5);
                    out_y = (0.5 - m / 2.0) / (2.0 - m);
                    out_x = 2.0 * out_y;
                } else if y > 0.5 && x > 0.0 {
                    let m = (x - 0.5) / (y - 0.5);
                    out_y = (1.5 + m / 2.0) / (2.0 + m);
                    out_x = 2.0 - 2.0 * out_y;
                }
            }
            Self::Ellipse => {
                if x != 0.5 {
                    let m = (y - 0.5) / (x - 0.5);
                    let t = m.atan() + if x < 0.5 { PI } else { 0.0 };
                    out_x = 0.5 + 0.5 * t.cos();
                    out_y = 0.5 + 0.5 * t.sin();
                }
            }
            Self::Rhombus => {
                if x < 0.5 && y < 0.5 {
                    let m = (y - 0.5) / (x - 0.5);
                    out_x = m / (2.0 + 2.0 * m);
                    out_y = -out_x + 0.5;
                } else if x < 0.5 && y > 0.5 {
                    let m = (y - 0.5) / (x - 0.5);
                    out_x = m / (2.0 * m - 2.0);
                    out_y = out_x + 0.5;
                } else if x > 0.5 && y < 0.5 {
                    let m = (y - 0.5) / (x - 0.5);
                    out_x = (m - 2.0) / (2.0 * m - 2.0);
                    out_y = out_x - 0.5;
                } else if x > 0.5 && y > 0.5 {
                    let m = (y - 0.5) / (x - 0.5);
                    out_x = (m + 2.0) / (2.0 * m + 2.0);
                    out_y = -out_x + 1.5;
                }
            }
            Self::Parallelogram { slope: c } => {
                if c != 0.0 && x != 0.5 {
                    let m = (y - 0.5) / (x - 0.5);
                    if x < c && y < 1.0 {
                        out_x = (m * c + c) / (2.0 * m * c + 2.0);
                        out_y = 1.0 - out_x / c;
                    } else if x > 1.0 - c && y > 0.0 {
                        out_x = (m * c - c + 2.0) / (2.0 * m * c + 2.0);
                        out_y = (1.0 - out_x) / c;
                    }
                }
            }
            Self::Hexagon { slope: c } => {
                if c != 0.0 && x != 0.5 {
                    let m = (y - 0.5) / (x - 0.5);
                    if x < c && y < 0.5 {
                        out_x = c * m / (2.0 * c * m + 1.0);
                        out_y = -out_x / (2.0 * c) + 0.5;
                    } else if x > 1.0 - c && y < 0.5 {
                        out_x = (m * c - 1.0) / (2.0 * m * c - 1.0);
                        out_y = (out_x + c - 1.0) / (2.0 * c);
                    } else if x < c && y > 0.5 {
                        out_x = m * c / (2.0 * m * c - 1.0);
                        out_y = out_x / (2.0 * c) + 0.5;
                    } else if x > 1.0 - c && y > 0.5 {
                        out_x = (m * c + 1.0) / (2.0 * m * c + 1.0);
                        out_y = (1.0 + c - out_x) / (2.0 * c);
                    }
                }
            }
            Self::Step { slope: c } => {
                if x == 0.0 && c > 0.5 && 0.0 < y && y < 1.0 {
                    out_x = 0.5;
                    out_y = 0.5;
                } else if y == 0.5 {
                    out_x = if x == 0.0 { c } else { 1.0 };
                } else {
                    let m = (x - 0.5) / (y - 0.5);
                    if x == 0.0 && y < 0.5 {
                        out_y = (1.0 - m) / (4.0 * c - 2.0 * m);
                        out_x = 2.0 * c * out_y;
                    } else if x == 0.0 && y > 0.5 {
                        out_y = (4.0 * c - 1.0 + m) / (4.0 * c + 2.0 * m);
                        out_x = 2.0 * c - 2.0 * c * out_y;
                    } else if x > 1.0 - c && y < 0.5 {
                        out_y = (1.0 - 2.0 * c + m) / (2.0 * m - 4.0 * c);
                        out_x = 2.0 * c * out_y + 1.0 - c;
                    } else if x > 1.0 - c && y > 0.5 {
                        out_y = (1.0 + 2.0 * c + m) / (4.0 * c + 2.0 * m);
                        out_x = 1.0 + c - 2.0 * c * out_y;
                    }
                }
            }
            Self::Trapezoid { slope: c } => {
                if c != 0.0 && x != 0.5 {
                    let m = (y - 0.5) / (x - 0.5);
                    if x < c && y < 1.0 {
                        out_x = (c + m * c) / (2.0 * m * c + 2.0);
                        out_y = 1.0 - out_x / c;
                    } else if x > 1.0 - c && y < 1.0 {
                        out_x = (c + m * c - 2.0) / (2.0 * m * c - 2.0);
                        out_y = (out_x + c - 1.0) / c;
                    }
                }
            }
        }
        (out_x, out_y)
    }
}
