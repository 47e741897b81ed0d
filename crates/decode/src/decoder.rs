//! The decoder contract and the typed-element base shared by every concrete
//! decoder bound to a fixed set of element names.

use crate::error::DecodeError;
use geosync_bxml::{Token, XmlCursor};
use geosync_types::QName;

/// The polymorphic unit of composition: something that can claim
/// responsibility for a qualified element name, consume exactly that
/// element's subtree from the event stream, and produce a typed value.
pub trait Decoder {
    type Output;

    /// The static set of qualified names this decoder can start on, used by
    /// container combinators to build dispatch tables without invoking
    /// [`accepts`](Decoder::accepts) at registration time.
    fn accepted_names(&self) -> &[QName];

    /// Whether this decoder claims the element with the given name. Pure;
    /// uses only the peeked start-element name, never the stream.
    fn accepts(&self, name: &QName) -> bool {
        self.accepted_names().contains(name)
    }

    /// Decodes one element.
    ///
    /// Precondition: the cursor is at a start element whose name satisfies
    /// `accepts`. Postcondition: the cursor is at the matching end element
    /// (the tag-balance invariant).
    fn decode(&self, cursor: &mut XmlCursor) -> Result<Self::Output, DecodeError>;
}

/// Factors out the name-validation and tag-balance boilerplate shared by
/// decoders bound to a fixed, non-empty set of element names.
///
/// Implementors supply the accepted names and a body hook; the blanket
/// [`Decoder`] impl validates the start name on entry and asserts the
/// matching end tag on exit. That assertion is the framework's single
/// enforcement point for the tag-balance invariant.
pub trait ElementDecoder {
    type Output;

    fn names(&self) -> &[QName];

    /// Decodes the element's body. On entry the cursor is at the validated
    /// start element; on return it must be at the matching end element.
    fn decode_body(
        &self,
        cursor: &mut XmlCursor,
        name: &QName,
    ) -> Result<Self::Output, DecodeError>;
}

impl<D: ElementDecoder> Decoder for D {
    type Output = D::Output;

    fn accepted_names(&self) -> &[QName] {
        self.names()
    }

    fn decode(&self, cursor: &mut XmlCursor) -> Result<Self::Output, DecodeError> {
        let name = cursor.start_name()?.clone();
        if !self.accepts(&name) {
            return Err(DecodeError::UnexpectedElement {
                found: name,
                expected: format_names(self.names()),
            });
        }
        let value = self.decode_body(cursor, &name)?;
        match cursor.token() {
            Token::End(end) if *end == name => Ok(value),
            _ => Err(DecodeError::UnbalancedElement(name)),
        }
    }
}

/// Accumulates the character content between the current start element and
/// its end tag, leaving the cursor at the end tag.
///
/// Returns `None` when the element had no text chunks at all. Callers that
/// do not care about the null/empty distinction use `unwrap_or_default`.
pub fn text_content(cursor: &mut XmlCursor) -> Result<Option<String>, DecodeError> {
    let mut value: Option<String> = None;
    loop {
        match cursor.next()? {
            Token::Text(chunk) => {
                value.get_or_insert_with(String::new).push_str(chunk);
            }
            Token::End(_) => return Ok(value),
            Token::Start(child) => {
                return Err(DecodeError::UnexpectedElement {
                    found: child.clone(),
                    expected: "character content".to_string(),
                });
            }
            Token::Eof => return Err(geosync_bxml::BxmlError::UnexpectedEof.into()),
        }
    }
}

/// Advances past the remaining children of the current element, skipping
/// their subtrees, leaving the cursor at the element's end tag.
pub fn consume_children(cursor: &mut XmlCursor) -> Result<(), DecodeError> {
    loop {
        cursor.next_tag()?;
        match cursor.token() {
            Token::Start(_) => cursor.skip_subtree()?,
            Token::End(_) => return Ok(()),
            Token::Eof => return Err(geosync_bxml::BxmlError::UnexpectedEof.into()),
            _ => {}
        }
    }
}

pub(crate) fn format_names(names: &[QName]) -> String {
    names
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
