//! Normalization of CQL (CIM Query Language) WHERE clauses to Disjunctive Normal Form.
//!
//! ```
//! use cql::{to_dnf, ComparisonOperator, Expression, Predicate, SimplePredicate};
//!
//! let cmp = |name: &str, value: i64| -> Predicate {
//!     SimplePredicate::binary(Expression::property(name), ComparisonOperator::Eq, value.into())
//!         .unwrap()
//!         .into()
//! };
//! let p = cmp("a", 1).and(cmp("b", 2).or(cmp("c", 3)));
//! let dnf = to_dnf(&p);
//! assert_eq!("(a = 1 AND b = 2) OR (a = 1 AND c = 3)", dnf.to_string());
//! ```

#![warn(clippy::panic)]
#![warn(clippy::expect_used)]

#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

pub mod dnf;
pub mod errors;
mod where_clause;

pub use cql_core::errors::CqlCoreError;
pub use cql_core::{BooleanOp, ComparisonOperator, Expression, Predicate, SimplePredicate};
pub use dnf::{to_dnf, Cql2Dnf, Dnf, DnfConfig, DnfStats};
pub use where_clause::WhereClause;
