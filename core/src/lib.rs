#![warn(clippy::panic)]
#![warn(clippy::expect_used)]

#[macro_use]
extern crate serde_derive;

pub mod errors;
pub mod predicate;
pub mod types;

pub use predicate::Predicate;
pub use types::{BooleanOp, ComparisonOperator, Expression, SimplePredicate};
