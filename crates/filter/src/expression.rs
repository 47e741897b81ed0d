//! Decoders for the OGC expression language: arithmetic, function calls,
//! literals, and property references.

use crate::ogc;
use geosync_bxml::XmlCursor;
use geosync_decode::{text_content, Choice, DecodeError, Decoder, ElementDecoder, Sequence};
use geosync_types::{ArithmeticOp, Expression, QName};

/// The top-level expression dispatcher: a choice over the four expression
/// decoders, consulted in registration order. This is the single entry
/// point any container uses whenever an expression is expected.
pub struct ExpressionDecoder {
    choice: Choice<Expression>,
}

impl ExpressionDecoder {
    pub fn new() -> Self {
        let choice = Choice::new()
            .option(ArithmeticDecoder::new())
            .option(FunctionDecoder::new())
            .option(LiteralDecoder::new())
            .option(PropertyNameDecoder::new());
        Self { choice }
    }
}

impl Default for ExpressionDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for ExpressionDecoder {
    type Output = Expression;

    fn accepted_names(&self) -> &[QName] {
        self.choice.accepted_names()
    }

    fn accepts(&self, name: &QName) -> bool {
        self.choice.accepts(name)
    }

    fn decode(&self, cursor: &mut XmlCursor) -> Result<Expression, DecodeError> {
        self.choice.decode(cursor)
    }
}

/// Decodes the four binary arithmetic operators, each taking exactly two
/// operand expressions in document order.
pub struct ArithmeticDecoder {
    names: Vec<QName>,
}

impl ArithmeticDecoder {
    pub fn new() -> Self {
        Self {
            names: ["Add", "Sub", "Mul", "Div"].iter().map(|n| ogc(n)).collect(),
        }
    }
}

impl Default for ArithmeticDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementDecoder for ArithmeticDecoder {
    type Output = Expression;

    fn names(&self) -> &[QName] {
        &self.names
    }

    fn decode_body(
        &self,
        cursor: &mut XmlCursor,
        name: &QName,
    ) -> Result<Expression, DecodeError> {
        let op = match name.local.as_str() {
            "Add" => ArithmeticOp::Add,
            "Sub" => ArithmeticOp::Sub,
            "Mul" => ArithmeticOp::Mul,
            "Div" => ArithmeticOp::Div,
            _ => {
                return Err(DecodeError::UnexpectedElement {
                    found: name.clone(),
                    expected: "an arithmetic operator".to_string(),
                });
            }
        };
        cursor.next_tag()?;
        let mut operands = Sequence::exactly(ExpressionDecoder::new(), 2).decode(cursor)?;
        // The sequence guarantees exactly two operands here.
        let right = operands.pop();
        let left = operands.pop();
        match (left, right) {
            (Some(left), Some(right)) => Ok(Expression::Arithmetic {
                op,
                left: Box::new(left),
                right: Box::new(right),
            }),
            _ => Err(DecodeError::TooFewOccurrences {
                name: name.to_string(),
                got: 0,
                min: 2,
            }),
        }
    }
}

/// Decodes a function call: a required `name` attribute and zero or more
/// argument expressions.
pub struct FunctionDecoder {
    names: Vec<QName>,
}

impl FunctionDecoder {
    pub fn new() -> Self {
        Self {
            names: vec![ogc("Function")],
        }
    }
}

impl Default for FunctionDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementDecoder for FunctionDecoder {
    type Output = Expression;

    fn names(&self) -> &[QName] {
        &self.names
    }

    fn decode_body(
        &self,
        cursor: &mut XmlCursor,
        name: &QName,
    ) -> Result<Expression, DecodeError> {
        let function_name = cursor
            .attribute("name")
            .map(str::to_owned)
            .ok_or_else(|| DecodeError::MissingAttribute {
                attribute: "name".to_string(),
                element: name.clone(),
            })?;
        cursor.next_tag()?;
        let args = Sequence::any(ExpressionDecoder::new()).decode(cursor)?;
        Ok(Expression::Function {
            name: function_name,
            args,
        })
    }
}

/// Decodes a literal leaf. An element with no text chunks at all yields a
/// null literal rather than an empty string; downstream filter semantics
/// depend on the distinction.
pub struct LiteralDecoder {
    names: Vec<QName>,
}

impl LiteralDecoder {
    pub fn new() -> Self {
        Self {
            names: vec![ogc("Literal")],
        }
    }
}

impl Default for LiteralDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementDecoder for LiteralDecoder {
    type Output = Expression;

    fn names(&self) -> &[QName] {
        &self.names
    }

    fn decode_body(
        &self,
        cursor: &mut XmlCursor,
        _name: &QName,
    ) -> Result<Expression, DecodeError> {
        Ok(Expression::Literal(text_content(cursor)?))
    }
}

/// Decodes a property reference leaf. Empty content is a valid empty path
/// here, asymmetric with [`LiteralDecoder`].
pub struct PropertyNameDecoder {
    names: Vec<QName>,
}

impl PropertyNameDecoder {
    pub fn new() -> Self {
        Self {
            names: vec![ogc("PropertyName")],
        }
    }
}

impl Default for PropertyNameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementDecoder for PropertyNameDecoder {
    type Output = Expression;

    fn names(&self) -> &[QName] {
        &self.names
    }

    fn decode_body(
        &self,
        cursor: &mut XmlCursor,
        _name: &QName,
    ) -> Result<Expression, DecodeError> {
        Ok(Expression::Property(
            text_content(cursor)?.unwrap_or_default(),
        ))
    }
}
