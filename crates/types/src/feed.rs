//! Entities of the synchronization feed: Atom-like entries carrying
//! filtered transaction change records.

use crate::filter::SpatialFilter;
use crate::geometry::Geometry;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// An Atom person construct (author or contributor).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    pub email: Option<String>,
    pub uri: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub term: String,
    pub scheme: Option<String>,
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    pub rel: Option<String>,
    pub media_type: Option<String>,
    pub title: Option<String>,
    pub hreflang: Option<String>,
    pub length: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Generator {
    pub value: String,
    pub uri: Option<String>,
    pub version: Option<String>,
}

/// A single property assignment within an update record. A `None` value
/// means the property is reset, which is distinct from assigning the empty
/// string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyUpdate {
    pub name: String,
    pub value: Option<String>,
}

/// A WFS-Transaction change record embedded in an entry's content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Change {
    Insert {
        handle: Option<String>,
    },
    Update {
        type_name: String,
        properties: Vec<PropertyUpdate>,
        filter: Option<SpatialFilter>,
    },
    Delete {
        type_name: String,
        filter: SpatialFilter,
    },
}

/// An entry's content: a media link, an embedded change record, or both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub kind: Option<String>,
    pub src: Option<String>,
    pub change: Option<Change>,
}

/// One synchronization-feed entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    pub title: String,
    pub summary: Option<String>,
    pub updated: DateTime<FixedOffset>,
    pub published: Option<DateTime<FixedOffset>>,
    pub rights: Option<String>,
    pub authors: Vec<Person>,
    pub contributors: Vec<Person>,
    pub categories: Vec<Category>,
    pub links: Vec<Link>,
    pub content: Option<Content>,
    /// The entry's georeferencing element, when present.
    pub where_: Option<Geometry>,
}

/// The feed-level metadata decoded ahead of the first entry. Entries
/// themselves are exposed separately as a forward-only iterator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedHeader {
    pub id: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub icon: Option<String>,
    pub rights: Option<String>,
    pub updated: DateTime<FixedOffset>,
    pub authors: Vec<Person>,
    pub contributors: Vec<Person>,
    pub categories: Vec<Category>,
    pub generator: Option<Generator>,
    pub links: Vec<Link>,
    pub max_entries: Option<u32>,
    pub start_position: Option<u32>,
}
