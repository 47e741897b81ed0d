//! Qualified names, the dispatch keys of the decoder framework.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A (namespace URI, local name) pair identifying an element or operator.
///
/// Equality and hashing are structural; prefixes are a serialization detail
/// and are not part of the name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QName {
    pub namespace: Option<String>,
    pub local: String,
}

impl QName {
    /// A name with no namespace.
    pub fn new(local: impl Into<String>) -> Self {
        Self {
            namespace: None,
            local: local.into(),
        }
    }

    /// A name qualified by a namespace URI.
    pub fn with_ns(namespace: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            local: local.into(),
        }
    }

    pub fn is_in(&self, namespace: &str) -> bool {
        self.namespace.as_deref() == Some(namespace)
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{}}}{}", ns, self.local),
            None => write!(f, "{}", self.local),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_equality() {
        let a = QName::with_ns("http://www.opengis.net/ogc", "BBOX");
        let b = QName::with_ns("http://www.opengis.net/ogc", "BBOX");
        let c = QName::new("BBOX");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_display() {
        let q = QName::with_ns("http://www.opengis.net/ogc", "Add");
        assert_eq!(q.to_string(), "{http://www.opengis.net/ogc}Add");
        assert_eq!(QName::new("Add").to_string(), "Add");
    }
}
