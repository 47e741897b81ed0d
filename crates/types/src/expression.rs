//! The expression AST built by the expression decoders.

use serde::{Deserialize, Serialize};

/// An OGC filter expression.
///
/// Every node is immutable once constructed; decoders build nodes bottom-up
/// and hand them to their caller without retaining any reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    Arithmetic {
        op: ArithmeticOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Function {
        name: String,
        args: Vec<Expression>,
    },
    /// A literal value. `None` when the source element had no text content
    /// at all, which downstream filter semantics distinguish from the empty
    /// string.
    Literal(Option<String>),
    /// A reference to a feature property. An empty path is valid here,
    /// asymmetric with `Literal`.
    Property(String),
}

impl Expression {
    pub fn is_property(&self) -> bool {
        matches!(self, Expression::Property(_))
    }

    pub fn as_property(&self) -> Option<&str> {
        match self {
            Expression::Property(path) => Some(path),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Mul,
    Div,
}
