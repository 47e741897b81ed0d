//! The feed reader: eager header decoding, lazy forward-only entries.

use crate::atom::{
    parse_timestamp, CategoryDecoder, GeneratorDecoder, LinkDecoder, PersonDecoder,
};
use crate::entry::EntryDecoder;
use crate::{atom, ATOM_NS, OPENSEARCH_NS};
use chrono::{DateTime, FixedOffset};
use geosync_bxml::{Token, XmlCursor};
use geosync_decode::{text_content, DecodeError, Decoder};
use geosync_types::{Entry, FeedHeader, QName};
use std::fmt;

/// A single-pass reader over a synchronization feed.
///
/// Construction decodes all feed-level metadata up to the first entry;
/// the entries themselves are yielded one at a time by [`FeedReader::entries`]
/// and are never buffered or revisited.
pub struct FeedReader<'a> {
    cursor: XmlCursor<'a>,
    header: FeedHeader,
    at_entry: bool,
}

impl<'a> FeedReader<'a> {
    /// Decodes the feed header from an XML document whose root element is
    /// `atom:feed`.
    pub fn new(source: &'a str) -> Result<Self, DecodeError> {
        let mut cursor = XmlCursor::from_str(source)?;
        let feed = atom("feed");
        cursor.require_start(&feed)?;

        let persons = PersonDecoder::new();
        let categories = CategoryDecoder::new();
        let links = LinkDecoder::new();
        let generators = GeneratorDecoder::new();
        let entries = EntryDecoder::new();

        let mut id: Option<String> = None;
        let mut title: Option<String> = None;
        let mut subtitle: Option<String> = None;
        let mut icon: Option<String> = None;
        let mut rights: Option<String> = None;
        let mut updated: Option<DateTime<FixedOffset>> = None;
        let mut header_authors = Vec::new();
        let mut contributors = Vec::new();
        let mut header_categories = Vec::new();
        let mut generator = None;
        let mut header_links = Vec::new();
        let mut max_entries: Option<u32> = None;
        let mut start_position: Option<u32> = None;

        let at_entry = loop {
            cursor.next_tag()?;
            match cursor.token() {
                Token::Start(child) => {
                    let child = child.clone();
                    if entries.accepts(&child) {
                        // The header ends at the first entry, which is
                        // left unconsumed for the iterator.
                        break true;
                    }
                    match (child.namespace.as_deref(), child.local.as_str()) {
                        (Some(ATOM_NS), "id") => id = text_content(&mut cursor)?,
                        (Some(ATOM_NS), "title") => title = text_content(&mut cursor)?,
                        (Some(ATOM_NS), "subtitle") => subtitle = text_content(&mut cursor)?,
                        (Some(ATOM_NS), "icon") => icon = text_content(&mut cursor)?,
                        (Some(ATOM_NS), "rights") => rights = text_content(&mut cursor)?,
                        (Some(ATOM_NS), "updated") => {
                            let text = text_content(&mut cursor)?.unwrap_or_default();
                            updated = Some(parse_timestamp(&text, &child)?);
                        }
                        (Some(ATOM_NS), "author") => {
                            header_authors.push(persons.decode(&mut cursor)?);
                        }
                        (Some(ATOM_NS), "contributor") => {
                            contributors.push(persons.decode(&mut cursor)?);
                        }
                        (Some(ATOM_NS), "category") => {
                            header_categories.push(categories.decode(&mut cursor)?);
                        }
                        (Some(ATOM_NS), "link") => {
                            header_links.push(links.decode(&mut cursor)?);
                        }
                        (Some(ATOM_NS), "generator") => {
                            generator = Some(generators.decode(&mut cursor)?);
                        }
                        (Some(OPENSEARCH_NS), "itemsPerPage") => {
                            max_entries = Some(paging_value(&mut cursor, &child)?);
                        }
                        (Some(OPENSEARCH_NS), "startIndex") => {
                            start_position = Some(paging_value(&mut cursor, &child)?);
                        }
                        _ => cursor.skip_subtree()?,
                    }
                }
                Token::End(_) => break false,
                _ => return Err(geosync_bxml::BxmlError::UnexpectedEof.into()),
            }
        };

        let missing = |element: &str| DecodeError::MissingElement {
            element: element.to_string(),
            parent: feed.clone(),
        };
        let header = FeedHeader {
            id: id.ok_or_else(|| missing("id"))?,
            title: title.ok_or_else(|| missing("title"))?,
            subtitle,
            icon,
            rights,
            updated: updated.ok_or_else(|| missing("updated"))?,
            authors: header_authors,
            contributors,
            categories: header_categories,
            generator,
            links: header_links,
            max_entries,
            start_position,
        };
        Ok(Self {
            cursor,
            header,
            at_entry,
        })
    }

    /// The feed-level metadata.
    pub fn header(&self) -> &FeedHeader {
        &self.header
    }

    /// Consumes the reader, yielding the entries in document order.
    pub fn entries(self) -> Entries<'a> {
        Entries {
            cursor: self.cursor,
            decoder: EntryDecoder::new(),
            at_entry: self.at_entry,
            finished: !self.at_entry,
        }
    }
}

impl fmt::Debug for FeedReader<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeedReader")
            .field("header", &self.header)
            .field("at_entry", &self.at_entry)
            .finish_non_exhaustive()
    }
}

fn paging_value(cursor: &mut XmlCursor, element: &QName) -> Result<u32, DecodeError> {
    let text = text_content(cursor)?.unwrap_or_default();
    text.trim()
        .parse::<u32>()
        .map_err(|_| DecodeError::InvalidNumber {
            text,
            element: element.clone(),
        })
}

/// A forward-only iterator over feed entries. A decoding error ends the
/// iteration permanently; so does the feed's end tag.
pub struct Entries<'a> {
    cursor: XmlCursor<'a>,
    decoder: EntryDecoder,
    at_entry: bool,
    finished: bool,
}

impl Entries<'_> {
    /// Moves the cursor past the entry just decoded, to the next entry or
    /// the end of the feed. Non-entry trailing elements are skipped.
    fn advance(&mut self) -> Result<bool, DecodeError> {
        loop {
            self.cursor.next_tag()?;
            match self.cursor.token() {
                Token::Start(child) => {
                    if self.decoder.accepts(child) {
                        return Ok(true);
                    }
                    self.cursor.skip_subtree()?;
                }
                Token::End(_) | Token::Eof => return Ok(false),
                _ => {}
            }
        }
    }
}

impl Iterator for Entries<'_> {
    type Item = Result<Entry, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished || !self.at_entry {
            self.finished = true;
            return None;
        }
        match self.decoder.decode(&mut self.cursor) {
            Ok(entry) => {
                log::debug!("decoded feed entry: {}", entry.id);
                match self.advance() {
                    Ok(at_entry) => self.at_entry = at_entry,
                    Err(err) => {
                        self.finished = true;
                        return Some(Err(err));
                    }
                }
                Some(Ok(entry))
            }
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}
