pub mod expression;
pub mod feed;
pub mod filter;
pub mod geometry;
pub mod qname;

pub use expression::{ArithmeticOp, Expression};
pub use feed::{Category, Change, Content, Entry, FeedHeader, Generator, Link, Person, PropertyUpdate};
pub use filter::{Distance, DistanceOp, SpatialFilter, SpatialOp, SpatialOperand};
pub use geometry::{Coord, Envelope, Geometry};
pub use qname::QName;
