use geosync_bxml::BxmlError;
use geosync_types::QName;
use thiserror::Error;

/// A structural decoding failure. Apart from the CRS lookup inside the BBox
/// decoder, every failure propagates unchanged and aborts the whole decode
/// with no partial value.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error(transparent)]
    Xml(#[from] BxmlError),

    #[error("unexpected element {found}, expected {expected}")]
    UnexpectedElement { found: QName, expected: String },

    #[error("no option accepted element {0}")]
    NoOptionAccepted(QName),

    #[error("too few occurrences of {name}: got {got}, expected at least {min}")]
    TooFewOccurrences {
        name: String,
        got: usize,
        min: usize,
    },

    #[error("too many occurrences of {name}: expected at most {max}")]
    TooManyOccurrences { name: String, max: usize },

    #[error("unbalanced element {0}")]
    UnbalancedElement(QName),

    #[error("missing required attribute '{attribute}' on {element}")]
    MissingAttribute { attribute: String, element: QName },

    #[error("missing required element {element} in {parent}")]
    MissingElement { element: String, parent: QName },

    #[error("invalid numeric value '{text}' in {element}")]
    InvalidNumber { text: String, element: QName },

    #[error("invalid timestamp '{text}' in {element}: {source}")]
    InvalidTimestamp {
        text: String,
        element: QName,
        source: chrono::ParseError,
    },

    #[error("unsupported spatial operator {0}")]
    UnsupportedOperator(QName),

    #[error("expected a property name as the first operand of {0}")]
    ExpectedProperty(QName),
}
