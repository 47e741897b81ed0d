//! Choice combinator: first-match dispatch among decoders sharing a result
//! type.

use crate::decoder::Decoder;
use crate::error::DecodeError;
use geosync_bxml::XmlCursor;
use geosync_types::QName;

/// Tries a set of decoders against the current element and delegates to the
/// first that accepts it.
///
/// Options are consulted in registration order. When two options' accepted
/// name sets overlap, only the first registered is reachable for the shared
/// name; this precedence is deliberate and pinned by a regression test, so
/// callers can rely on it.
pub struct Choice<T> {
    options: Vec<Box<dyn Decoder<Output = T>>>,
    /// Registration-ordered union of the options' accepted names.
    names: Vec<QName>,
}

impl<T> Choice<T> {
    pub fn new() -> Self {
        Self {
            options: Vec::new(),
            names: Vec::new(),
        }
    }

    /// Registers an option. Registration order is significant.
    pub fn option(mut self, decoder: impl Decoder<Output = T> + 'static) -> Self {
        for name in decoder.accepted_names() {
            if !self.names.contains(name) {
                self.names.push(name.clone());
            }
        }
        self.options.push(Box::new(decoder));
        self
    }
}

impl<T> Default for Choice<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Decoder for Choice<T> {
    type Output = T;

    fn accepted_names(&self) -> &[QName] {
        &self.names
    }

    fn accepts(&self, name: &QName) -> bool {
        self.options.iter().any(|option| option.accepts(name))
    }

    fn decode(&self, cursor: &mut XmlCursor) -> Result<T, DecodeError> {
        let name = cursor.start_name()?.clone();
        for option in &self.options {
            if option.accepts(&name) {
                return option.decode(cursor);
            }
        }
        Err(DecodeError::NoOptionAccepted(name))
    }
}
