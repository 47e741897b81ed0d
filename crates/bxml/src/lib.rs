pub mod cursor;
pub mod error;

pub use cursor::{Attribute, Token, XmlCursor};
pub use error::BxmlError;
