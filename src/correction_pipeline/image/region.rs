//! Regions of interest used to restrict sampling.

use serde::{Deserialize, Serialize};

/// A predicate over pixel coordinates.
pub trait Region {
    fn contains(&self, x: usize, y: usize) -> bool;

    /// Only area selections may be sampled. Points, lines and degenerate shapes are not
    /// areas.
    fn is_area(&self) -> bool;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Roi {
    Rectangle {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
    /// Closed polygon in pixel coordinates, tested with the even-odd rule at integer
    /// pixel positions.
    Polygon(Vec<(f64, f64)>),
    /// Bit mask anchored at `(x, y)`, row-major.
    Mask {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        bits: Vec<bool>,
    },
    Point {
        x: usize,
        y: usize,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
}

impl Roi {
    pub fn whole_image(width: usize, height: usize) -> Self {
        Roi::Rectangle {
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    pub fn rectangle(x: usize, y: usize, width: usize, height: usize) -> Self {
        Roi::Rectangle {
            x,
            y,
            width,
            height,
        }
    }
}

fn polygon_contains(vertices: &[(f64, f64)], px: f64, py: f64) -> bool {
    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let (xi, yi) = vertices[i];
        let (xj, yj) = vertices[j];
        if (yi > py) != (yj > py) && px < (xj - xi) * (py - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn polygon_area(vertices: &[(f64, f64)]) -> f64 {
    let mut twice_area = 0.0;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        twice_area += vertices[j].0 * vertices[i].1 - vertices[i].0 * vertices[j].1;
        j = i;
    }
    twice_area.abs() / 2.0
}

impl Region for Roi {
    fn contains(&self, px: usize, py: usize) -> bool {
        match self {
            Roi::Rectangle {
                x,
                y,
                width,
                height,
            } => px >= *x && px < x + width && py >= *y && py < y + height,
            Roi::Polygon(vertices) => {
                vertices.len() >= 3 && polygon_contains(vertices, px as f64, py as f64)
            }
            Roi::Mask {
                x,
                y,
                width,
                height,
                bits,
            } => {
                if px < *x || py < *y || px >= x + width || py >= y + height {
                    return false;
                }
                bits.get((py - y) * width + (px - x)).copied().unwrap_or(false)
            }
            Roi::Point { x, y } => px == *x && py == *y,
            Roi::Line { .. } => false,
        }
    }

    fn is_area(&self) -> bool {
        match self {
            Roi::Rectangle { width, height, .. } => *width > 0 && *height > 0,
            Roi::Polygon(vertices) => vertices.len() >= 3 && polygon_area(vertices) > 0.0,
            Roi::Mask {
                width,
                height,
                bits,
                ..
            } => bits.len() == width * height && bits.iter().any(|&b| b),
            Roi::Point { .. } | Roi::Line { .. } => false,
        }
    }
}
