//! Decoders for OGC filter expressions and spatial predicates.
//!
//! The expression dispatcher ([`ExpressionDecoder`]) is the single entry
//! point used wherever an expression is expected; the spatial decoders
//! consume expressions and GML geometry to build [`SpatialFilter`]
//! predicates.

pub mod crs;
pub mod expression;
pub mod gml;
pub mod spatial;

use geosync_types::QName;
pub use geosync_types::SpatialFilter;

pub use expression::{
    ArithmeticDecoder, ExpressionDecoder, FunctionDecoder, LiteralDecoder, PropertyNameDecoder,
};
pub use gml::{EnvelopeDecoder, GeometryDecoder};
pub use spatial::{
    BBoxDecoder, BinarySpatialDecoder, DistanceBufferDecoder, DistanceDecoder, FilterDecoder,
    SpatialFilterDecoder,
};

/// The OGC Filter 1.0 namespace.
pub const OGC_NS: &str = "http://www.opengis.net/ogc";

/// The GML 3.1 namespace.
pub const GML_NS: &str = "http://www.opengis.net/gml";

pub(crate) fn ogc(local: &str) -> QName {
    QName::with_ns(OGC_NS, local)
}

pub(crate) fn gml(local: &str) -> QName {
    QName::with_ns(GML_NS, local)
}
