use thiserror::Error;

use crate::types::ComparisonOperator;

pub type Result<T> = std::result::Result<T, CqlCoreError>;

#[derive(Error, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum CqlCoreError {
    #[error("comparison operator {0} needs a right-hand expression")]
    MissingRightExpression(ComparisonOperator),
    #[error("comparison operator {0} is unary and can't have a right-hand expression")]
    UnexpectedRightExpression(ComparisonOperator),
    #[error("a compound predicate needs at least one child predicate")]
    EmptyCompound,
    #[error("a compound predicate with {children} children can't have {operators} boolean operators")]
    OperatorCountMismatch { children: usize, operators: usize },
}
