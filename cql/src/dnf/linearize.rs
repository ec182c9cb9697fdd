use cql_core::{BooleanOp, ComparisonOperator, Expression, Predicate};

/// A token of the postfix form of a predicate tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Operation {
    Compare(ComparisonOperator),
    And,
    Or,
    Not,
    /// Placeholder the heap builder skips.
    #[cfg_attr(not(test), allow(dead_code))]
    Noop,
}

impl From<BooleanOp> for Operation {
    fn from(op: BooleanOp) -> Self {
        match op {
            BooleanOp::And => Operation::And,
            BooleanOp::Or => Operation::Or,
        }
    }
}

/// Postfix operations and the expressions consumed by the comparisons, in order.
#[derive(Debug, Default)]
pub(crate) struct Linearized {
    pub(crate) operations: Vec<Operation>,
    pub(crate) operands: Vec<Expression>,
}

/// Flattens a predicate tree depth-first into postfix operations and operands.
pub(crate) fn linearize(predicate: &Predicate) -> Linearized {
    let mut result = Linearized::default();
    result.destruct(predicate);
    if predicate.is_inverted() {
        result.operations.push(Operation::Not);
    }
    result
}

impl Linearized {
    fn destruct(&mut self, predicate: &Predicate) {
        match predicate {
            Predicate::Simple { predicate, .. } => {
                self.operations.push(Operation::Compare(predicate.op()));
                self.operands.push(predicate.left().clone());
                if let Some(right) = predicate.right() {
                    self.operands.push(right.clone());
                }
            }
            Predicate::Compound {
                children,
                operators,
                ..
            } => {
                for (i, child) in children.iter().enumerate() {
                    self.destruct(child);
                    if child.is_inverted() {
                        self.operations.push(Operation::Not);
                    }
                    if i > 0 {
                        if let Some(op) = operators.get(i - 1) {
                            self.operations.push((*op).into());
                        }
                    }
                }
            }
        }
    }
}
