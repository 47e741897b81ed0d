//! A forward-only pull cursor over an XML event stream.
//!
//! The cursor is the single mutable resource of the decoder framework. It is
//! threaded through every decode call by exclusive mutable reference, so the
//! rule that exactly one decoder advances it at a time is enforced by the
//! borrow checker rather than by convention.

use crate::error::BxmlError;
use geosync_types::QName;
use quick_xml::NsReader;
use quick_xml::escape::unescape;
use quick_xml::events::Event;
use quick_xml::name::{QName as RawName, ResolveResult};
use std::fmt;

/// One token of the event stream, as seen by decoders.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Start(QName),
    End(QName),
    Text(String),
    Eof,
}

impl Token {
    pub fn is_start(&self) -> bool {
        matches!(self, Token::Start(_))
    }

    pub fn is_end(&self) -> bool {
        matches!(self, Token::End(_))
    }

    /// The element name, for start and end tokens.
    pub fn name(&self) -> Option<&QName> {
        match self {
            Token::Start(name) | Token::End(name) => Some(name),
            _ => None,
        }
    }

    fn describe(&self) -> String {
        match self {
            Token::Start(name) => format!("start of {}", name),
            Token::End(name) => format!("end of {}", name),
            Token::Text(_) => "text".to_string(),
            Token::Eof => "end of document".to_string(),
        }
    }
}

/// An attribute of the current start element.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: QName,
    pub value: String,
}

/// Owned data pulled out of one `quick-xml` event, extracted before any
/// further use of the reader so the event's borrow of the read buffer ends.
enum RawEvent {
    Start {
        namespace: Option<String>,
        local: String,
        attrs: Vec<(Vec<u8>, String)>,
        empty: bool,
    },
    End {
        namespace: Option<String>,
        local: String,
    },
    Text(String),
    Eof,
    Skip,
}

pub struct XmlCursor<'a> {
    reader: NsReader<&'a [u8]>,
    buf: Vec<u8>,
    current: Token,
    attributes: Vec<Attribute>,
    /// Synthetic end tag queued when an empty element was expanded.
    pending_end: Option<QName>,
}

impl<'a> XmlCursor<'a> {
    /// Builds a cursor positioned at the document's first start element,
    /// skipping the prolog and any leading comments.
    pub fn from_str(source: &'a str) -> Result<Self, BxmlError> {
        let mut reader = NsReader::from_str(source);
        reader.config_mut().trim_text(false);
        let mut cursor = Self {
            reader,
            buf: Vec::new(),
            current: Token::Eof,
            attributes: Vec::new(),
            pending_end: None,
        };
        loop {
            cursor.next()?;
            match cursor.current {
                Token::Start(_) => return Ok(cursor),
                Token::Eof => return Err(BxmlError::NoRootElement),
                _ => continue,
            }
        }
    }

    /// Peeks the current token without consuming it.
    pub fn token(&self) -> &Token {
        &self.current
    }

    /// The qualified name of the current start or end tag.
    pub fn name(&self) -> Option<&QName> {
        self.current.name()
    }

    /// The name of the current start element, or an error when the cursor
    /// is positioned elsewhere.
    pub fn start_name(&self) -> Result<&QName, BxmlError> {
        match &self.current {
            Token::Start(name) => Ok(name),
            _ => Err(BxmlError::NotAtStart),
        }
    }

    /// Attributes of the current start element.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// An unqualified attribute of the current start element.
    pub fn attribute(&self, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name.namespace.is_none() && a.name.local == local)
            .map(|a| a.value.as_str())
    }

    /// A namespace-qualified attribute of the current start element.
    pub fn attribute_ns(&self, namespace: &str, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name.namespace.as_deref() == Some(namespace) && a.name.local == local)
            .map(|a| a.value.as_str())
    }

    /// Fails unless the cursor is at the start of the named element.
    pub fn require_start(&self, name: &QName) -> Result<(), BxmlError> {
        match &self.current {
            Token::Start(found) if found == name => Ok(()),
            other => Err(BxmlError::ExpectedStart {
                expected: name.clone(),
                found: other.describe(),
            }),
        }
    }

    /// Fails unless the cursor is at the end of the named element.
    pub fn require_end(&self, name: &QName) -> Result<(), BxmlError> {
        match &self.current {
            Token::End(found) if found == name => Ok(()),
            other => Err(BxmlError::ExpectedEnd {
                expected: name.clone(),
                found: other.describe(),
            }),
        }
    }

    /// Advances to the next token. After the end of the document, keeps
    /// returning [`Token::Eof`].
    pub fn next(&mut self) -> Result<&Token, BxmlError> {
        if let Some(name) = self.pending_end.take() {
            self.attributes.clear();
            self.current = Token::End(name);
            return Ok(&self.current);
        }
        loop {
            let raw = self.read_raw()?;
            match raw {
                RawEvent::Start {
                    namespace,
                    local,
                    attrs,
                    empty,
                } => {
                    let name = QName { namespace, local };
                    self.attributes = self.resolve_attributes(attrs);
                    if empty {
                        self.pending_end = Some(name.clone());
                    }
                    self.current = Token::Start(name);
                    return Ok(&self.current);
                }
                RawEvent::End { namespace, local } => {
                    self.attributes.clear();
                    self.current = Token::End(QName { namespace, local });
                    return Ok(&self.current);
                }
                RawEvent::Text(text) => {
                    self.attributes.clear();
                    self.current = Token::Text(text);
                    return Ok(&self.current);
                }
                RawEvent::Eof => {
                    self.attributes.clear();
                    self.current = Token::Eof;
                    return Ok(&self.current);
                }
                RawEvent::Skip => continue,
            }
        }
    }

    /// Advances to the next start or end tag, skipping intervening text.
    pub fn next_tag(&mut self) -> Result<&Token, BxmlError> {
        loop {
            self.next()?;
            match self.current {
                Token::Start(_) | Token::End(_) | Token::Eof => break,
                _ => continue,
            }
        }
        Ok(&self.current)
    }

    /// Consumes the subtree of the current start element, leaving the
    /// cursor at its matching end tag.
    pub fn skip_subtree(&mut self) -> Result<(), BxmlError> {
        if !self.current.is_start() {
            return Err(BxmlError::NotAtStart);
        }
        let mut depth = 0usize;
        loop {
            self.next()?;
            match &self.current {
                Token::Start(_) => depth += 1,
                Token::End(_) => {
                    if depth == 0 {
                        return Ok(());
                    }
                    depth -= 1;
                }
                Token::Eof => return Err(BxmlError::UnexpectedEof),
                _ => {}
            }
        }
    }

    fn read_raw(&mut self) -> Result<RawEvent, BxmlError> {
        self.buf.clear();
        let (resolve, event) = self.reader.read_resolved_event_into(&mut self.buf)?;
        let raw = match event {
            Event::Start(e) => {
                let local = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                let mut attrs = Vec::new();
                for attr in e.attributes() {
                    let attr = attr?;
                    let value = unescape(std::str::from_utf8(&attr.value)?)?.into_owned();
                    attrs.push((attr.key.as_ref().to_vec(), value));
                }
                RawEvent::Start {
                    namespace: namespace_of(&resolve),
                    local,
                    attrs,
                    empty: false,
                }
            }
            Event::Empty(e) => {
                let local = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                let mut attrs = Vec::new();
                for attr in e.attributes() {
                    let attr = attr?;
                    let value = unescape(std::str::from_utf8(&attr.value)?)?.into_owned();
                    attrs.push((attr.key.as_ref().to_vec(), value));
                }
                RawEvent::Start {
                    namespace: namespace_of(&resolve),
                    local,
                    attrs,
                    empty: true,
                }
            }
            Event::End(e) => RawEvent::End {
                namespace: namespace_of(&resolve),
                local: String::from_utf8_lossy(e.local_name().as_ref()).into_owned(),
            },
            Event::Text(e) => {
                let text = unescape(std::str::from_utf8(e.as_ref())?)?.into_owned();
                RawEvent::Text(text)
            }
            Event::CData(e) => RawEvent::Text(String::from_utf8_lossy(e.as_ref()).into_owned()),
            Event::Eof => RawEvent::Eof,
            _ => RawEvent::Skip,
        };
        Ok(raw)
    }

    /// Resolves attribute namespaces against the bindings in scope for the
    /// element just read. Must run before the next event is pulled.
    fn resolve_attributes(&self, attrs: Vec<(Vec<u8>, String)>) -> Vec<Attribute> {
        attrs
            .into_iter()
            .map(|(key, value)| {
                let (resolve, local) = self.reader.resolve_attribute(RawName(&key));
                Attribute {
                    name: QName {
                        namespace: namespace_of(&resolve),
                        local: String::from_utf8_lossy(local.as_ref()).into_owned(),
                    },
                    value,
                }
            })
            .collect()
    }
}

// The embedded reader has no useful textual form; the cursor's position is
// what matters when a test or log prints it.
impl fmt::Debug for XmlCursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XmlCursor")
            .field("current", &self.current)
            .field("attributes", &self.attributes)
            .field("pending_end", &self.pending_end)
            .finish_non_exhaustive()
    }
}

fn namespace_of(resolve: &ResolveResult<'_>) -> Option<String> {
    match resolve {
        ResolveResult::Bound(ns) => Some(String::from_utf8_lossy(ns.as_ref()).into_owned()),
        _ => None,
    }
}
