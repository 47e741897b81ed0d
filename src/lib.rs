//! Streaming decoders for OGC filter expressions, spatial predicates, and
//! synchronization feeds.
//!
//! The workspace is layered: `geosync-bxml` turns an XML byte stream into
//! a namespace-resolved token cursor, `geosync-decode` provides the
//! decoder contract and the choice/sequence combinators, and the
//! `geosync-filter` and `geosync-feed` crates build the filter AST and
//! the feed entities on top. This crate re-exports the public surface and
//! offers [`read_feed`] as the one-call entry point.
//!
//! ```no_run
//! let source = std::fs::read_to_string("changes.xml")?;
//! let reader = geosync::read_feed(&source)?;
//! println!("feed: {}", reader.header().title);
//! for entry in reader.entries() {
//!     let entry = entry?;
//!     println!("  {} ({})", entry.title, entry.updated);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use geosync_bxml::{Attribute, BxmlError, Token, XmlCursor};
pub use geosync_decode::{Choice, DecodeError, Decoder, ElementDecoder, Sequence};
pub use geosync_feed::{Entries, EntryDecoder, FeedReader};
pub use geosync_filter::{
    EnvelopeDecoder, ExpressionDecoder, FilterDecoder, GeometryDecoder, SpatialFilterDecoder,
};
pub use geosync_types::{
    ArithmeticOp, Category, Change, Content, Coord, Distance, DistanceOp, Entry, Envelope,
    Expression, FeedHeader, Generator, Geometry, Link, Person, PropertyUpdate, QName,
    SpatialFilter, SpatialOp, SpatialOperand,
};

/// Opens a synchronization feed, decoding its header eagerly and exposing
/// the entries as a forward-only iterator.
pub fn read_feed(source: &str) -> Result<FeedReader<'_>, DecodeError> {
    FeedReader::new(source)
}
