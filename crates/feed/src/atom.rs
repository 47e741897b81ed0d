//! Decoders for the Atom constructs shared by the feed header and its
//! entries: persons, categories, links, the generator, and timestamps.

use crate::atom;
use chrono::{DateTime, FixedOffset};
use geosync_bxml::{Token, XmlCursor};
use geosync_decode::{consume_children, text_content, DecodeError, ElementDecoder};
use geosync_types::{Category, Generator, Link, Person, QName};

/// Parses an Atom timestamp (RFC 3339) from an element's text content.
pub fn parse_timestamp(text: &str, element: &QName) -> Result<DateTime<FixedOffset>, DecodeError> {
    DateTime::parse_from_rfc3339(text.trim()).map_err(|source| DecodeError::InvalidTimestamp {
        text: text.to_string(),
        element: element.clone(),
        source,
    })
}

/// Decodes an Atom person construct. Accepts both `author` and
/// `contributor`; the caller decides which list the person belongs to.
pub struct PersonDecoder {
    names: Vec<QName>,
}

impl PersonDecoder {
    pub fn new() -> Self {
        Self {
            names: vec![atom("author"), atom("contributor")],
        }
    }
}

impl Default for PersonDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementDecoder for PersonDecoder {
    type Output = Person;

    fn names(&self) -> &[QName] {
        &self.names
    }

    fn decode_body(&self, cursor: &mut XmlCursor, name: &QName) -> Result<Person, DecodeError> {
        let mut person_name: Option<String> = None;
        let mut email: Option<String> = None;
        let mut uri: Option<String> = None;
        loop {
            cursor.next_tag()?;
            match cursor.token() {
                Token::Start(child) => {
                    let child = child.clone();
                    match child.local.as_str() {
                        "name" => person_name = text_content(cursor)?,
                        "email" => email = text_content(cursor)?,
                        "uri" => uri = text_content(cursor)?,
                        _ => cursor.skip_subtree()?,
                    }
                }
                Token::End(_) => break,
                _ => return Err(geosync_bxml::BxmlError::UnexpectedEof.into()),
            }
        }
        let person_name = person_name.ok_or_else(|| DecodeError::MissingElement {
            element: "name".to_string(),
            parent: name.clone(),
        })?;
        Ok(Person {
            name: person_name,
            email,
            uri,
        })
    }
}

/// Decodes an `atom:category`, which carries everything in attributes.
pub struct CategoryDecoder {
    names: Vec<QName>,
}

impl CategoryDecoder {
    pub fn new() -> Self {
        Self {
            names: vec![atom("category")],
        }
    }
}

impl Default for CategoryDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementDecoder for CategoryDecoder {
    type Output = Category;

    fn names(&self) -> &[QName] {
        &self.names
    }

    fn decode_body(&self, cursor: &mut XmlCursor, name: &QName) -> Result<Category, DecodeError> {
        let term = cursor.attribute("term").map(str::to_owned).ok_or_else(|| {
            DecodeError::MissingAttribute {
                attribute: "term".to_string(),
                element: name.clone(),
            }
        })?;
        let scheme = cursor.attribute("scheme").map(str::to_owned);
        let label = cursor.attribute("label").map(str::to_owned);
        consume_children(cursor)?;
        Ok(Category {
            term,
            scheme,
            label,
        })
    }
}

/// Decodes an `atom:link`. Only `href` is required; a malformed `length`
/// is an error rather than silently dropped.
pub struct LinkDecoder {
    names: Vec<QName>,
}

impl LinkDecoder {
    pub fn new() -> Self {
        Self {
            names: vec![atom("link")],
        }
    }
}

impl Default for LinkDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementDecoder for LinkDecoder {
    type Output = Link;

    fn names(&self) -> &[QName] {
        &self.names
    }

    fn decode_body(&self, cursor: &mut XmlCursor, name: &QName) -> Result<Link, DecodeError> {
        let href = cursor.attribute("href").map(str::to_owned).ok_or_else(|| {
            DecodeError::MissingAttribute {
                attribute: "href".to_string(),
                element: name.clone(),
            }
        })?;
        let rel = cursor.attribute("rel").map(str::to_owned);
        let media_type = cursor.attribute("type").map(str::to_owned);
        let title = cursor.attribute("title").map(str::to_owned);
        let hreflang = cursor.attribute("hreflang").map(str::to_owned);
        let length = match cursor.attribute("length") {
            Some(raw) => Some(raw.parse::<u64>().map_err(|_| DecodeError::InvalidNumber {
                text: raw.to_string(),
                element: name.clone(),
            })?),
            None => None,
        };
        consume_children(cursor)?;
        Ok(Link {
            href,
            rel,
            media_type,
            title,
            hreflang,
            length,
        })
    }
}

/// Decodes the `atom:generator` of the feed header.
pub struct GeneratorDecoder {
    names: Vec<QName>,
}

impl GeneratorDecoder {
    pub fn new() -> Self {
        Self {
            names: vec![atom("generator")],
        }
    }
}

impl Default for GeneratorDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementDecoder for GeneratorDecoder {
    type Output = Generator;

    fn names(&self) -> &[QName] {
        &self.names
    }

    fn decode_body(&self, cursor: &mut XmlCursor, _name: &QName) -> Result<Generator, DecodeError> {
        let uri = cursor.attribute("uri").map(str::to_owned);
        let version = cursor.attribute("version").map(str::to_owned);
        let value = text_content(cursor)?.unwrap_or_default();
        Ok(Generator {
            value,
            uri,
            version,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geosync_decode::Decoder;

    const ATOM_ATTR: &str = r#"xmlns:atom="http://www.w3.org/2005/Atom""#;

    fn at_first_child(source: &str) -> XmlCursor<'_> {
        let mut cursor = XmlCursor::from_str(source).unwrap();
        cursor.next_tag().unwrap();
        cursor
    }

    #[test]
    fn test_person_with_all_fields() {
        let source = format!(
            "<root {ATOM_ATTR}><atom:author><atom:name>Ada</atom:name><atom:email>ada@example.org</atom:email><atom:uri>https://example.org/ada</atom:uri></atom:author></root>"
        );
        let mut cursor = at_first_child(&source);
        let person = PersonDecoder::new().decode(&mut cursor).unwrap();
        assert_eq!(person.name, "Ada");
        assert_eq!(person.email.as_deref(), Some("ada@example.org"));
        assert_eq!(person.uri.as_deref(), Some("https://example.org/ada"));
    }

    #[test]
    fn test_person_requires_name() {
        let source = format!(
            "<root {ATOM_ATTR}><atom:contributor><atom:email>x@example.org</atom:email></atom:contributor></root>"
        );
        let mut cursor = at_first_child(&source);
        let err = PersonDecoder::new().decode(&mut cursor).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::MissingElement { element, .. } if element == "name"
        ));
    }

    #[test]
    fn test_category_requires_term() {
        let source = format!(r#"<root {ATOM_ATTR}><atom:category scheme="s"/></root>"#);
        let mut cursor = at_first_child(&source);
        let err = CategoryDecoder::new().decode(&mut cursor).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::MissingAttribute { attribute, .. } if attribute == "term"
        ));
    }

    #[test]
    fn test_link_attributes() {
        let source = format!(
            r#"<root {ATOM_ATTR}><atom:link href="https://example.org/next" rel="next" type="application/atom+xml" length="2048"/></root>"#
        );
        let mut cursor = at_first_child(&source);
        let link = LinkDecoder::new().decode(&mut cursor).unwrap();
        assert_eq!(link.href, "https://example.org/next");
        assert_eq!(link.rel.as_deref(), Some("next"));
        assert_eq!(link.media_type.as_deref(), Some("application/atom+xml"));
        assert_eq!(link.length, Some(2048));
    }

    #[test]
    fn test_link_rejects_malformed_length() {
        let source =
            format!(r#"<root {ATOM_ATTR}><atom:link href="h" length="big"/></root>"#);
        let mut cursor = at_first_child(&source);
        let err = LinkDecoder::new().decode(&mut cursor).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidNumber { .. }));
    }

    #[test]
    fn test_generator_value_and_version() {
        let source = format!(
            r#"<root {ATOM_ATTR}><atom:generator version="2.1">GeoSync</atom:generator></root>"#
        );
        let mut cursor = at_first_child(&source);
        let generator = GeneratorDecoder::new().decode(&mut cursor).unwrap();
        assert_eq!(generator.value, "GeoSync");
        assert_eq!(generator.version.as_deref(), Some("2.1"));
        assert_eq!(generator.uri, None);
    }

    #[test]
    fn test_timestamp_with_offset() {
        let when = parse_timestamp("2026-03-01T12:30:00+02:00", &atom("updated")).unwrap();
        assert_eq!(when.timestamp(), 1772361000);
    }

    #[test]
    fn test_malformed_timestamp() {
        let err = parse_timestamp("yesterday", &atom("updated")).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::InvalidTimestamp { text, .. } if text == "yesterday"
        ));
    }
}
