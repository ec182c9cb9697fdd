use smartstring::alias::String;
use std::fmt;
use std::fmt::Write;
use strum_macros::{EnumIter, EnumString};

use crate::errors::{CqlCoreError, Result};

/// Operator of a single comparison inside a CQL WHERE clause.
#[derive(
    Serialize,
    Deserialize,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    EnumString,
    strum_macros::Display,
)]
pub enum ComparisonOperator {
    #[strum(to_string = "=")]
    Eq,
    #[strum(to_string = "<>")]
    Ne,
    #[strum(to_string = "<")]
    Lt,
    #[strum(to_string = "<=")]
    Le,
    #[strum(to_string = ">")]
    Gt,
    #[strum(to_string = ">=")]
    Ge,
    #[strum(to_string = "ISA")]
    Isa,
    #[strum(to_string = "LIKE")]
    Like,
    #[strum(to_string = "IS NULL")]
    IsNull,
    #[strum(to_string = "IS NOT NULL")]
    IsNotNull,
}

impl ComparisonOperator {
    /// `IS NULL` and `IS NOT NULL` only have a left-hand expression.
    pub fn is_unary(&self) -> bool {
        matches!(
            self,
            ComparisonOperator::IsNull | ComparisonOperator::IsNotNull
        )
    }
}

/// Connective between two neighbouring predicates of a compound predicate.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter,
)]
pub enum BooleanOp {
    And,
    Or,
}

impl BooleanOp {
    /// The connective obtained by applying De Morgan's laws.
    pub fn dual(self) -> BooleanOp {
        match self {
            BooleanOp::And => BooleanOp::Or,
            BooleanOp::Or => BooleanOp::And,
        }
    }

    pub fn apply(self, lhs: bool, rhs: bool) -> bool {
        match self {
            BooleanOp::And => lhs && rhs,
            BooleanOp::Or => lhs || rhs,
        }
    }
}

impl fmt::Display for BooleanOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BooleanOp::And => write!(f, "AND"),
            BooleanOp::Or => write!(f, "OR"),
        }
    }
}

/// An operand of a simple predicate.
///
/// The DNF conversion never looks inside an expression, it only moves
/// expressions from the input tree into the normalized one.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Expression {
    /// A (possibly chained) property identifier like `CIM_Process.Handle`.
    Property(String),
    Text(String),
    Integer(i64),
    Boolean(bool),
}

impl Expression {
    pub fn property(name: &str) -> Expression {
        Expression::Property(name.into())
    }

    pub fn text(value: &str) -> Expression {
        Expression::Text(value.into())
    }
}

impl From<i64> for Expression {
    fn from(v: i64) -> Self {
        Expression::Integer(v)
    }
}

impl From<bool> for Expression {
    fn from(v: bool) -> Self {
        Expression::Boolean(v)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Property(name) => write!(f, "{}", name),
            Expression::Text(value) => {
                f.write_char('\'')?;
                for c in value.chars() {
                    // quotes are escaped by doubling them
                    if c == '\'' {
                        f.write_char('\'')?;
                    }
                    f.write_char(c)?;
                }
                f.write_char('\'')
            }
            Expression::Integer(v) => write!(f, "{}", v),
            Expression::Boolean(true) => write!(f, "TRUE"),
            Expression::Boolean(false) => write!(f, "FALSE"),
        }
    }
}

/// A single, non-decomposable comparison like `a = b` or `a IS NULL`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "RawSimplePredicate")]
pub struct SimplePredicate {
    left: Expression,
    right: Option<Expression>,
    op: ComparisonOperator,
}

/// Unchecked serialized form of [`SimplePredicate`].
#[derive(Deserialize)]
struct RawSimplePredicate {
    left: Expression,
    #[serde(default)]
    right: Option<Expression>,
    op: ComparisonOperator,
}

impl TryFrom<RawSimplePredicate> for SimplePredicate {
    type Error = CqlCoreError;

    fn try_from(raw: RawSimplePredicate) -> Result<Self> {
        SimplePredicate::new(raw.left, raw.op, raw.right)
    }
}

impl SimplePredicate {
    /// Creates a comparison and checks that the number of expressions fits the operator.
    pub fn new(
        left: Expression,
        op: ComparisonOperator,
        right: Option<Expression>,
    ) -> Result<SimplePredicate> {
        match (op.is_unary(), &right) {
            (true, Some(_)) => Err(CqlCoreError::UnexpectedRightExpression(op)),
            (false, None) => Err(CqlCoreError::MissingRightExpression(op)),
            _ => Ok(SimplePredicate { left, right, op }),
        }
    }

    pub fn binary(
        left: Expression,
        op: ComparisonOperator,
        right: Expression,
    ) -> Result<SimplePredicate> {
        SimplePredicate::new(left, op, Some(right))
    }

    pub fn unary(left: Expression, op: ComparisonOperator) -> Result<SimplePredicate> {
        SimplePredicate::new(left, op, None)
    }

    pub fn left(&self) -> &Expression {
        &self.left
    }

    pub fn right(&self) -> Option<&Expression> {
        self.right.as_ref()
    }

    pub fn op(&self) -> ComparisonOperator {
        self.op
    }
}

impl fmt::Display for SimplePredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.left, self.op)?;
        if let Some(right) = &self.right {
            write!(f, " {}", right)?;
        }
        Ok(())
    }
}
