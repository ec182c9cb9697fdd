use std::fmt;

use itertools::Itertools;

use crate::errors::{CqlCoreError, Result};
use crate::types::{BooleanOp, SimplePredicate};


/// A boolean predicate tree as produced for a CQL WHERE clause.
///
/// A compound predicate is evaluated from left to right: `operators[i - 1]`
/// combines the value of all children before `children[i]` with the value of
/// `children[i]`. The inversion flag negates the whole (sub-)tree.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(try_from = "RawPredicate")]
pub enum Predicate {
    Simple {
        predicate: SimplePredicate,
        inverted: bool,
    },
    Compound {
        children: Vec<Predicate>,
        operators: Vec<BooleanOp>,
        inverted: bool,
    },
}

#[derive(Deserialize)]
enum RawPredicate {
    Simple {
        predicate: SimplePredicate,
        #[serde(default)]
        inverted: bool,
    },
    Compound {
        children: Vec<Predicate>,
        operators: Vec<BooleanOp>,
        #[serde(default)]
        inverted: bool,
    },
}

impl TryFrom<RawPredicate> for Predicate {
    type Error = CqlCoreError;

    fn try_from(raw: RawPredicate) -> Result<Self> {
        match raw {
            RawPredicate::Simple {
                predicate,
                inverted,
            } => Ok(Predicate::Simple {
                predicate,
                inverted,
            }),
            RawPredicate::Compound {
                children,
                operators,
                inverted,
            } => {
                let mut p = Predicate::compound(children, operators)?;
                p.set_inverted(inverted);
                Ok(p)
            }
        }
    }
}

impl From<SimplePredicate> for Predicate {
    fn from(predicate: SimplePredicate) -> Self {
        Predicate::simple(predicate)
    }
}

impl Predicate {
    pub fn simple(predicate: SimplePredicate) -> Predicate {
        Predicate::Simple {
            predicate,
            inverted: false,
        }
    }

    /// Creates a compound predicate where `operators[i - 1]` connects `children[i]`
    /// to its predecessors.
    pub fn compound(children: Vec<Predicate>, operators: Vec<BooleanOp>) -> Result<Predicate> {
        if children.is_empty() {
            return Err(CqlCoreError::EmptyCompound);
        }
        if operators.len() + 1 != children.len() {
            return Err(CqlCoreError::OperatorCountMismatch {
                children: children.len(),
                operators: operators.len(),
            });
        }
        Ok(Predicate::Compound {
            children,
            operators,
            inverted: false,
        })
    }

    /// Joins all predicates with the same connective.
    ///
    /// Returns `None` if the iterator is empty.
    pub fn join<I>(op: BooleanOp, predicates: I) -> Option<Predicate>
    where
        I: IntoIterator<Item = Predicate>,
    {
        let children: Vec<Predicate> = predicates.into_iter().collect();
        if children.is_empty() {
            return None;
        }
        let operators = vec![op; children.len() - 1];
        Some(Predicate::Compound {
            children,
            operators,
            inverted: false,
        })
    }

    /// Appends `child` so that the result is `self <op> child`.
    ///
    /// Simple and inverted predicates are first wrapped into a new compound
    /// predicate, so the meaning of the existing tree is never changed.
    pub fn append(&mut self, op: BooleanOp, child: Predicate) {
        match self {
            Predicate::Compound {
                children,
                operators,
                inverted: false,
            } => {
                children.push(child);
                operators.push(op);
            }
            _ => {
                let existing = std::mem::replace(
                    self,
                    Predicate::Compound {
                        children: Vec::with_capacity(2),
                        operators: Vec::with_capacity(1),
                        inverted: false,
                    },
                );
                if let Predicate::Compound {
                    children,
                    operators,
                    ..
                } = self
                {
                    children.push(existing);
                    children.push(child);
                    operators.push(op);
                }
            }
        }
    }

    pub fn and(mut self, other: Predicate) -> Predicate {
        self.append(BooleanOp::And, other);
        self
    }

    pub fn or(mut self, other: Predicate) -> Predicate {
        self.append(BooleanOp::Or, other);
        self
    }

    /// Logical negation of the whole predicate.
    #[allow(clippy::should_implement_trait)]
    pub fn not(mut self) -> Predicate {
        let inverted = self.is_inverted();
        self.set_inverted(!inverted);
        self
    }

    pub fn is_simple(&self) -> bool {
        matches!(self, Predicate::Simple { .. })
    }

    pub fn is_inverted(&self) -> bool {
        match self {
            Predicate::Simple { inverted, .. } | Predicate::Compound { inverted, .. } => *inverted,
        }
    }

    pub fn set_inverted(&mut self, value: bool) {
        match self {
            Predicate::Simple { inverted, .. } | Predicate::Compound { inverted, .. } => {
                *inverted = value
            }
        }
    }

    /// The child predicates of a compound predicate, or an empty slice for a simple one.
    pub fn children(&self) -> &[Predicate] {
        match self {
            Predicate::Simple { .. } => &[],
            Predicate::Compound { children, .. } => children,
        }
    }

    pub fn operators(&self) -> &[BooleanOp] {
        match self {
            Predicate::Simple { .. } => &[],
            Predicate::Compound { operators, .. } => operators,
        }
    }

    /// All simple predicates of this tree in depth-first order.
    pub fn simple_predicates(&self) -> Vec<&SimplePredicate> {
        let mut result = Vec::new();
        self.collect_simple_predicates(&mut result);
        result
    }

    fn collect_simple_predicates<'a>(&'a self, result: &mut Vec<&'a SimplePredicate>) {
        match self {
            Predicate::Simple { predicate, .. } => result.push(predicate),
            Predicate::Compound { children, .. } => {
                for c in children {
                    c.collect_simple_predicates(result);
                }
            }
        }
    }

    /// Evaluates the tree with the truth values that `leaf` assigns to each simple predicate.
    ///
    /// Inversion flags are applied on top of the value returned by `leaf`.
    pub fn evaluate<F>(&self, leaf: &mut F) -> bool
    where
        F: FnMut(&SimplePredicate) -> bool,
    {
        match self {
            Predicate::Simple {
                predicate,
                inverted,
            } => leaf(predicate) != *inverted,
            Predicate::Compound {
                children,
                operators,
                inverted,
            } => {
                let mut it = children.iter();
                let mut result = match it.next() {
                    Some(first) => first.evaluate(leaf),
                    None => false,
                };
                for (op, c) in operators.iter().zip(it) {
                    let value = c.evaluate(leaf);
                    result = op.apply(result, value);
                }
                result != *inverted
            }
        }
    }

    /// Checks whether the predicate is in the flat Disjunctive Normal Form.
    ///
    /// Valid shapes are a simple predicate, a conjunction of simple predicates
    /// or a disjunction whose children are simple predicates or conjunctions of
    /// simple predicates. Only simple predicates may be inverted.
    pub fn is_dnf(&self) -> bool {
        if self.is_conjunction_of_simple() {
            return true;
        }
        match self {
            Predicate::Compound {
                children,
                operators,
                inverted: false,
            } => {
                operators.iter().all(|op| *op == BooleanOp::Or)
                    && children.iter().all(|c| c.is_conjunction_of_simple())
            }
            _ => false,
        }
    }

    fn is_conjunction_of_simple(&self) -> bool {
        match self {
            Predicate::Simple { .. } => true,
            Predicate::Compound {
                children,
                operators,
                inverted: false,
            } => {
                operators.iter().all(|op| *op == BooleanOp::And)
                    && children.iter().all(|c| c.is_simple())
            }
            Predicate::Compound { inverted: true, .. } => false,
        }
    }

    /// Number of conjunctive clauses when interpreted as DNF.
    pub fn clause_count(&self) -> usize {
        match self {
            Predicate::Compound {
                children,
                operators,
                inverted: false,
            } if !children.is_empty() && operators.iter().all(|op| *op == BooleanOp::Or) => {
                children.len()
            }
            _ => 1,
        }
    }
}

/// Wraps nested compound predicates into parenthesis.
struct Operand<'a>(&'a Predicate);

impl<'a> fmt::Display for Operand<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Predicate::Compound {
                children,
                inverted: false,
                ..
            } if children.len() > 1 => write!(f, "({})", self.0),
            p => write!(f, "{}", p),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Simple {
                predicate,
                inverted: true,
            } => write!(f, "NOT ({})", predicate),
            Predicate::Simple {
                predicate,
                inverted: false,
            } => write!(f, "{}", predicate),
            Predicate::Compound {
                children,
                operators,
                inverted,
            } => {
                if *inverted {
                    write!(f, "NOT (")?;
                }
                if let Some(first) = children.first() {
                    write!(f, "{}", Operand(first))?;
                }
                let rest = operators
                    .iter()
                    .zip(children.iter().skip(1))
                    .map(|(op, c)| format!(" {} {}", op, Operand(c)))
                    .join("");
                write!(f, "{}", rest)?;
                if *inverted {
                    write!(f, ")")?;
                }
                Ok(())
            }
        }
    }
}
