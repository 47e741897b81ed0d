//! The spatial filter AST built by the spatial decoders.

use crate::expression::Expression;
use crate::geometry::{Envelope, Geometry};
use serde::{Deserialize, Serialize};

/// A binary spatial operator relating an expression to a geometry or
/// envelope operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpatialOp {
    Equals,
    Disjoint,
    Touches,
    Within,
    Overlaps,
    Intersects,
    Crosses,
    Contains,
}

/// A distance-buffered spatial operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistanceOp {
    DWithin,
    Beyond,
}

/// The right-hand operand of a binary spatial predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SpatialOperand {
    Geometry(Geometry),
    Envelope(Envelope),
}

/// A distance with an optional unit of measure. An intermediate value
/// object consumed by the distance-buffer decoder, not a filter itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distance {
    pub value: f64,
    pub units: Option<String>,
}

/// A spatial filter predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SpatialFilter {
    BBox {
        property: String,
        min_x: f64,
        min_y: f64,
        max_x: f64,
        max_y: f64,
        /// EPSG code resolved from the envelope's reference system, when
        /// the lookup succeeded. Lookup failure is tolerated.
        crs: Option<String>,
    },
    Binary {
        op: SpatialOp,
        left: Expression,
        right: SpatialOperand,
    },
    DistanceBuffer {
        op: DistanceOp,
        left: Expression,
        geometry: Geometry,
        distance: f64,
        units: Option<String>,
    },
}
