//! Geometry and envelope values consumed as spatial operands.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
}

impl Coord {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    Point {
        coord: Coord,
        srs_name: Option<String>,
    },
    LineString {
        coords: Vec<Coord>,
        srs_name: Option<String>,
    },
    Polygon {
        exterior: Vec<Coord>,
        interiors: Vec<Vec<Coord>>,
        srs_name: Option<String>,
    },
}

impl Geometry {
    pub fn srs_name(&self) -> Option<&str> {
        match self {
            Geometry::Point { srs_name, .. }
            | Geometry::LineString { srs_name, .. }
            | Geometry::Polygon { srs_name, .. } => srs_name.as_deref(),
        }
    }
}

/// An axis-aligned bounding envelope with its declared reference system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
    pub srs_name: Option<String>,
}
