//! Decoder for a single feed entry and its content element.

use crate::atom::{
    parse_timestamp, CategoryDecoder, LinkDecoder, PersonDecoder,
};
use crate::change::ChangeDecoder;
use crate::{atom, georss, ATOM_NS, GEORSS_NS};
use chrono::{DateTime, FixedOffset};
use geosync_bxml::{Token, XmlCursor};
use geosync_decode::{text_content, DecodeError, Decoder, ElementDecoder};
use geosync_filter::GeometryDecoder;
use geosync_types::{Category, Content, Entry, Geometry, Link, Person, QName};

/// Decodes one `atom:entry`. Children may appear in any order; unknown
/// elements are skipped so foreign markup in an entry never breaks the
/// feed.
pub struct EntryDecoder {
    names: Vec<QName>,
    persons: PersonDecoder,
    categories: CategoryDecoder,
    links: LinkDecoder,
    content: ContentDecoder,
    where_: WhereDecoder,
}

impl EntryDecoder {
    pub fn new() -> Self {
        Self {
            names: vec![atom("entry")],
            persons: PersonDecoder::new(),
            categories: CategoryDecoder::new(),
            links: LinkDecoder::new(),
            content: ContentDecoder::new(),
            where_: WhereDecoder::new(),
        }
    }
}

impl Default for EntryDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementDecoder for EntryDecoder {
    type Output = Entry;

    fn names(&self) -> &[QName] {
        &self.names
    }

    fn decode_body(&self, cursor: &mut XmlCursor, name: &QName) -> Result<Entry, DecodeError> {
        let mut id: Option<String> = None;
        let mut title: Option<String> = None;
        let mut summary: Option<String> = None;
        let mut updated: Option<DateTime<FixedOffset>> = None;
        let mut published: Option<DateTime<FixedOffset>> = None;
        let mut rights: Option<String> = None;
        let mut authors: Vec<Person> = Vec::new();
        let mut contributors: Vec<Person> = Vec::new();
        let mut categories: Vec<Category> = Vec::new();
        let mut links: Vec<Link> = Vec::new();
        let mut content: Option<Content> = None;
        let mut where_: Option<Geometry> = None;
        loop {
            cursor.next_tag()?;
            match cursor.token() {
                Token::Start(child) => {
                    let child = child.clone();
                    match (child.namespace.as_deref(), child.local.as_str()) {
                        (Some(ATOM_NS), "id") => id = text_content(cursor)?,
                        (Some(ATOM_NS), "title") => title = text_content(cursor)?,
                        (Some(ATOM_NS), "summary") => summary = text_content(cursor)?,
                        (Some(ATOM_NS), "rights") => rights = text_content(cursor)?,
                        (Some(ATOM_NS), "updated") => {
                            let text = text_content(cursor)?.unwrap_or_default();
                            updated = Some(parse_timestamp(&text, &child)?);
                        }
                        (Some(ATOM_NS), "published") => {
                            let text = text_content(cursor)?.unwrap_or_default();
                            published = Some(parse_timestamp(&text, &child)?);
                        }
                        (Some(ATOM_NS), "author") => {
                            authors.push(self.persons.decode(cursor)?);
                        }
                        (Some(ATOM_NS), "contributor") => {
                            contributors.push(self.persons.decode(cursor)?);
                        }
                        (Some(ATOM_NS), "category") => {
                            categories.push(self.categories.decode(cursor)?);
                        }
                        (Some(ATOM_NS), "link") => links.push(self.links.decode(cursor)?),
                        (Some(ATOM_NS), "content") => {
                            content = Some(self.content.decode(cursor)?);
                        }
                        (Some(GEORSS_NS), "where") => {
                            where_ = Some(self.where_.decode(cursor)?);
                        }
                        _ => cursor.skip_subtree()?,
                    }
                }
                Token::End(_) => break,
                _ => return Err(geosync_bxml::BxmlError::UnexpectedEof.into()),
            }
        }
        let missing = |element: &str| DecodeError::MissingElement {
            element: element.to_string(),
            parent: name.clone(),
        };
        Ok(Entry {
            id: id.ok_or_else(|| missing("id"))?,
            title: title.ok_or_else(|| missing("title"))?,
            summary,
            updated: updated.ok_or_else(|| missing("updated"))?,
            published,
            rights,
            authors,
            contributors,
            categories,
            links,
            content,
            where_,
        })
    }
}

/// Decodes `atom:content`: a `type`/`src` pair, an inline change record,
/// or both. Inline children that are not change records are skipped.
pub struct ContentDecoder {
    names: Vec<QName>,
    changes: ChangeDecoder,
}

impl ContentDecoder {
    pub fn new() -> Self {
        Self {
            names: vec![atom("content")],
            changes: ChangeDecoder::new(),
        }
    }
}

impl Default for ContentDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementDecoder for ContentDecoder {
    type Output = Content;

    fn names(&self) -> &[QName] {
        &self.names
    }

    fn decode_body(&self, cursor: &mut XmlCursor, _name: &QName) -> Result<Content, DecodeError> {
        let kind = cursor.attribute("type").map(str::to_owned);
        let src = cursor.attribute("src").map(str::to_owned);
        let mut change = None;
        loop {
            cursor.next_tag()?;
            match cursor.token() {
                Token::Start(child) => {
                    if self.changes.accepts(child) {
                        change = Some(self.changes.decode(cursor)?);
                    } else {
                        cursor.skip_subtree()?;
                    }
                }
                Token::End(_) => break,
                _ => return Err(geosync_bxml::BxmlError::UnexpectedEof.into()),
            }
        }
        Ok(Content { kind, src, change })
    }
}

/// Decodes `georss:where`: a wrapper around a single GML geometry.
pub struct WhereDecoder {
    names: Vec<QName>,
}

impl WhereDecoder {
    pub fn new() -> Self {
        Self {
            names: vec![georss("where")],
        }
    }
}

impl Default for WhereDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementDecoder for WhereDecoder {
    type Output = Geometry;

    fn names(&self) -> &[QName] {
        &self.names
    }

    fn decode_body(&self, cursor: &mut XmlCursor, _name: &QName) -> Result<Geometry, DecodeError> {
        cursor.next_tag()?;
        let geometry = GeometryDecoder::new().decode(cursor)?;
        cursor.next_tag()?;
        Ok(geometry)
    }
}
