use geosync_types::QName;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BxmlError {
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("malformed attribute: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),

    #[error("escape error: {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),

    #[error("UTF-8 string error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("unexpected end of document")]
    UnexpectedEof,

    #[error("document has no root element")]
    NoRootElement,

    #[error("expected start of {expected}, found {found}")]
    ExpectedStart { expected: QName, found: String },

    #[error("expected end of {expected}, found {found}")]
    ExpectedEnd { expected: QName, found: String },

    #[error("cursor is not positioned at a start element")]
    NotAtStart,
}
