//! Decoder-combinator framework over the pull event cursor.
//!
//! A decoder claims responsibility for a set of qualified element names,
//! consumes exactly the subtree rooted at the element it claimed, and
//! produces a typed value. Combinators compose decoders: [`Choice`] for
//! first-match dispatch among variants, [`Sequence`] for bounded repetition
//! across siblings. [`ElementDecoder`] factors out the name-validation and
//! tag-balance boilerplate every concrete decoder shares.

pub mod choice;
pub mod decoder;
pub mod error;
pub mod sequence;

pub use choice::Choice;
pub use decoder::{consume_children, text_content, Decoder, ElementDecoder};
pub use error::DecodeError;
pub use sequence::Sequence;
