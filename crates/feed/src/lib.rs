//! The synchronization-feed layer: an Atom-like feed whose entries carry
//! WFS-Transaction change records, decoded forward-only in a single pass.
//!
//! [`FeedReader`] decodes the feed-level metadata eagerly and then hands
//! out the entries as a lazy iterator; once an entry has been consumed the
//! reader never revisits it.

pub mod atom;
pub mod change;
pub mod entry;
pub mod feed;

use geosync_types::QName;

pub use change::ChangeDecoder;
pub use entry::EntryDecoder;
pub use feed::{Entries, FeedReader};

/// The Atom syndication namespace.
pub const ATOM_NS: &str = "http://www.w3.org/2005/Atom";

/// The GeoRSS namespace used for entry georeferencing.
pub const GEORSS_NS: &str = "http://www.georss.org/georss";

/// The OpenSearch namespace carrying paging hints.
pub const OPENSEARCH_NS: &str = "http://a9.com/-/spec/opensearch/1.1/";

/// The WFS namespace of the embedded change records.
pub const WFS_NS: &str = "http://www.opengis.net/wfs";

pub(crate) fn atom(local: &str) -> QName {
    QName::with_ns(ATOM_NS, local)
}

pub(crate) fn georss(local: &str) -> QName {
    QName::with_ns(GEORSS_NS, local)
}

pub(crate) fn wfs(local: &str) -> QName {
    QName::with_ns(WFS_NS, local)
}
