//! Sequence combinator: bounded repetition of a child decoder across
//! consecutive sibling elements.

use crate::decoder::{format_names, Decoder};
use crate::error::DecodeError;
use geosync_bxml::{Token, XmlCursor};

/// Repeatedly applies one child decoder to consecutive siblings, enforcing
/// a minimum/maximum occurrence count.
///
/// `min == max` encodes an exact arity (arithmetic operators take exactly
/// two operands); `min == 0, max == None` encodes free-form repetition
/// (function arguments).
pub struct Sequence<D> {
    child: D,
    min: usize,
    max: Option<usize>,
}

impl<D: Decoder> Sequence<D> {
    pub fn new(child: D, min: usize, max: Option<usize>) -> Self {
        Self { child, min, max }
    }

    /// Exactly `n` occurrences.
    pub fn exactly(child: D, n: usize) -> Self {
        Self::new(child, n, Some(n))
    }

    /// Zero or more occurrences, unbounded.
    pub fn any(child: D) -> Self {
        Self::new(child, 0, None)
    }

    /// Decodes consecutive accepted siblings starting at the current token.
    ///
    /// The cursor must be positioned at the first candidate token (the
    /// first child of the parent element, or the parent's end tag when it
    /// has none). On return the cursor is at the first non-accepted token,
    /// normally the parent's end tag. Items are returned in document order.
    pub fn decode(&self, cursor: &mut XmlCursor) -> Result<Vec<D::Output>, DecodeError> {
        let mut items = Vec::new();
        loop {
            let accepted = matches!(cursor.token(), Token::Start(name) if self.child.accepts(name));
            if !accepted {
                break;
            }
            if let Some(max) = self.max {
                if items.len() == max {
                    return Err(DecodeError::TooManyOccurrences {
                        name: format_names(self.child.accepted_names()),
                        max,
                    });
                }
            }
            items.push(self.child.decode(cursor)?);
            cursor.next_tag()?;
        }
        if items.len() < self.min {
            return Err(DecodeError::TooFewOccurrences {
                name: format_names(self.child.accepted_names()),
                got: items.len(),
                min: self.min,
            });
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::{text_content, ElementDecoder};
    use geosync_types::QName;

    struct Item {
        names: Vec<QName>,
    }

    impl Item {
        fn new() -> Self {
            Self {
                names: vec![QName::new("item")],
            }
        }
    }

    impl ElementDecoder for Item {
        type Output = String;

        fn names(&self) -> &[QName] {
            &self.names
        }

        fn decode_body(
            &self,
            cursor: &mut XmlCursor,
            _name: &QName,
        ) -> Result<String, DecodeError> {
            Ok(text_content(cursor)?.unwrap_or_default())
        }
    }

    fn at_first_child(source: &str) -> XmlCursor<'_> {
        let mut cursor = XmlCursor::from_str(source).unwrap();
        cursor.next_tag().unwrap();
        cursor
    }

    #[test]
    fn test_repeats_in_document_order() {
        let mut cursor = at_first_child("<list><item>1</item><item>2</item><item>3</item></list>");
        let items = Sequence::any(Item::new()).decode(&mut cursor).unwrap();
        assert_eq!(items, vec!["1", "2", "3"]);
        assert_eq!(cursor.token(), &Token::End(QName::new("list")));
    }

    #[test]
    fn test_stops_at_first_non_accepted_sibling() {
        let mut cursor = at_first_child("<list><item>1</item><other/></list>");
        let items = Sequence::any(Item::new()).decode(&mut cursor).unwrap();
        assert_eq!(items, vec!["1"]);
        assert_eq!(cursor.token(), &Token::Start(QName::new("other")));
    }

    #[test]
    fn test_too_few_occurrences() {
        let mut cursor = at_first_child("<list><item>1</item></list>");
        let err = Sequence::exactly(Item::new(), 2)
            .decode(&mut cursor)
            .unwrap_err();
        assert!(matches!(
            err,
            DecodeError::TooFewOccurrences { got: 1, min: 2, .. }
        ));
    }

    #[test]
    fn test_too_many_occurrences() {
        let mut cursor =
            at_first_child("<list><item>1</item><item>2</item><item>3</item></list>");
        let err = Sequence::exactly(Item::new(), 2)
            .decode(&mut cursor)
            .unwrap_err();
        assert!(matches!(err, DecodeError::TooManyOccurrences { max: 2, .. }));
    }

    #[test]
    fn test_empty_parent_yields_no_items() {
        let mut cursor = at_first_child("<list></list>");
        let items = Sequence::any(Item::new()).decode(&mut cursor).unwrap();
        assert!(items.is_empty());
    }
}
