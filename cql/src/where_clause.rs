use std::fmt;

use cql_core::{Predicate, SimplePredicate};

use crate::dnf::Cql2Dnf;
use crate::errors::Result;

/// The optional WHERE clause of a CQL select statement.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhereClause {
    predicate: Option<Predicate>,
    #[serde(default)]
    normalized: bool,
}

impl WhereClause {
    pub fn new(predicate: Predicate) -> WhereClause {
        WhereClause {
            predicate: Some(predicate),
            normalized: false,
        }
    }

    pub fn has_where_clause(&self) -> bool {
        self.predicate.is_some()
    }

    pub fn predicate(&self) -> Option<&Predicate> {
        self.predicate.as_ref()
    }

    pub fn is_normalized(&self) -> bool {
        self.normalized
    }

    /// Replaces the predicate with its Disjunctive Normal Form.
    ///
    /// Calling this more than once or without a predicate does nothing.
    pub fn normalize_to_doc(&mut self, converter: &Cql2Dnf) -> Result<()> {
        if self.normalized {
            return Ok(());
        }
        if let Some(predicate) = &self.predicate {
            let dnf = converter.compile(predicate)?;
            self.predicate = Some(dnf.predicate);
        }
        self.normalized = true;
        Ok(())
    }

    /// A statement without WHERE clause selects everything.
    pub fn evaluate<F>(&self, leaf: &mut F) -> bool
    where
        F: FnMut(&SimplePredicate) -> bool,
    {
        match &self.predicate {
            Some(p) => p.evaluate(leaf),
            None => true,
        }
    }

    pub fn clear(&mut self) {
        self.predicate = None;
        self.normalized = false;
    }
}

impl From<Predicate> for WhereClause {
    fn from(predicate: Predicate) -> Self {
        WhereClause::new(predicate)
    }
}

impl fmt::Display for WhereClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(p) = &self.predicate {
            write!(f, "WHERE {}", p)?;
        }
        Ok(())
    }
}
