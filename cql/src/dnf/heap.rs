use std::fmt;

use cql_core::{Expression, Predicate, SimplePredicate};
use smallvec::SmallVec;

use super::linearize::{linearize, Linearized, Operation};

/// Reference from an evaluation heap entry to one of its operands.
///
/// The derived order sorts all terminals before all nodes and otherwise by
/// index, which is the order the canonical operand layout relies on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) enum OperandRef {
    Terminal(usize),
    Node(usize),
}

impl fmt::Display for OperandRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperandRef::Terminal(idx) => write!(f, "T{}", idx),
            OperandRef::Node(idx) => write!(f, "N{}", idx),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum EvalOp {
    And,
    Or,
    Not,
    /// Pass-through for the first operand, left behind by a removed `NOT`.
    Noop,
}

impl EvalOp {
    pub(crate) fn dual(self) -> EvalOp {
        match self {
            EvalOp::And => EvalOp::Or,
            EvalOp::Or => EvalOp::And,
            other => other,
        }
    }
}

impl fmt::Display for EvalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalOp::And => write!(f, "AND"),
            EvalOp::Or => write!(f, "OR"),
            EvalOp::Not => write!(f, "NOT"),
            EvalOp::Noop => write!(f, "NOOP"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct EvalEntry {
    pub(crate) op: EvalOp,
    pub(crate) first: OperandRef,
    pub(crate) second: Option<OperandRef>,
    /// A negation pushed down from an ancestor that still has to be applied.
    pub(crate) mark: bool,
}

impl EvalEntry {
    pub(crate) fn binary(op: EvalOp, first: OperandRef, second: OperandRef) -> EvalEntry {
        EvalEntry {
            op,
            first,
            second: Some(second),
            mark: false,
        }
    }

    pub(crate) fn unary(op: EvalOp, first: OperandRef) -> EvalEntry {
        EvalEntry {
            op,
            first,
            second: None,
            mark: false,
        }
    }

    /// Swaps the operands so that nodes come first and, among operands of the
    /// same kind, the larger index comes first.
    pub(crate) fn order(&mut self) {
        if let Some(second) = self.second {
            if second > self.first {
                self.second = Some(self.first);
                self.first = second;
            }
        }
    }

    pub(crate) fn operands(&self) -> impl Iterator<Item = OperandRef> {
        std::iter::once(self.first).chain(self.second)
    }

    /// Replaces every reference to `old` with `new`. Returns whether anything changed.
    pub(crate) fn replace_operand(&mut self, old: OperandRef, new: OperandRef) -> bool {
        let mut changed = false;
        if self.first == old {
            self.first = new;
            changed = true;
        }
        if self.second == Some(old) {
            self.second = Some(new);
            changed = true;
        }
        changed
    }

    /// Adds `offset` to all node references pointing at `start` or later.
    pub(crate) fn shift_nodes(&mut self, start: usize, offset: usize) {
        if let OperandRef::Node(idx) = &mut self.first {
            if *idx >= start {
                *idx += offset;
            }
        }
        if let Some(OperandRef::Node(idx)) = &mut self.second {
            if *idx >= start {
                *idx += offset;
            }
        }
    }
}

impl fmt::Display for EvalEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.op, self.first)?;
        if let Some(second) = self.second {
            write!(f, " {}", second)?;
        }
        if self.mark {
            write!(f, " (pending NOT)")?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct TerminalEntry {
    pub(crate) predicate: SimplePredicate,
    pub(crate) negated: bool,
}

impl TerminalEntry {
    pub(crate) fn to_predicate(&self) -> Predicate {
        Predicate::Simple {
            predicate: self.predicate.clone(),
            inverted: self.negated,
        }
    }
}

/// Flat representation of a predicate tree during the DNF conversion.
///
/// `entries` is the evaluation heap: boolean operations whose operands are
/// either simple predicates from `terminals` or entries created earlier.
#[derive(Clone, Debug, Default)]
pub(crate) struct EvalHeap {
    pub(crate) entries: Vec<EvalEntry>,
    pub(crate) terminals: Vec<TerminalEntry>,
    /// Position where the search for the next distribution resumes.
    pub(crate) cursor: usize,
}

/// A malformed predicate tree is a broken contract of the caller, not a user error.
#[cold]
#[allow(clippy::panic)]
pub(crate) fn malformed(reason: &str) -> ! {
    panic!("malformed predicate tree: {}", reason)
}

impl EvalHeap {
    pub(crate) fn from_predicate(predicate: &Predicate) -> EvalHeap {
        EvalHeap::build(linearize(predicate))
    }

    /// Runs the postfix operations on an operand stack and records every
    /// boolean operation as a new heap entry.
    pub(crate) fn build(linearized: Linearized) -> EvalHeap {
        let mut heap = EvalHeap::default();
        let mut stack: SmallVec<[OperandRef; 8]> = SmallVec::new();
        let mut operands = linearized.operands.into_iter();

        for op in linearized.operations {
            match op {
                Operation::And | Operation::Or => {
                    let (first, second) = match (stack.pop(), stack.pop()) {
                        (Some(first), Some(second)) => (first, second),
                        _ => malformed("AND/OR needs two operands"),
                    };
                    let op = if op == Operation::And {
                        EvalOp::And
                    } else {
                        EvalOp::Or
                    };
                    heap.entries.push(EvalEntry::binary(op, first, second));
                    stack.push(OperandRef::Node(heap.entries.len() - 1));
                }
                Operation::Not => {
                    let first = stack
                        .pop()
                        .unwrap_or_else(|| malformed("NOT needs an operand"));
                    heap.entries.push(EvalEntry::unary(EvalOp::Not, first));
                    stack.push(OperandRef::Node(heap.entries.len() - 1));
                }
                Operation::Compare(cmp) => {
                    let left = next_expression(&mut operands);
                    let right = if cmp.is_unary() {
                        None
                    } else {
                        Some(next_expression(&mut operands))
                    };
                    let predicate = SimplePredicate::new(left, cmp, right)
                        .unwrap_or_else(|e| malformed(&e.to_string()));
                    heap.terminals.push(TerminalEntry {
                        predicate,
                        negated: false,
                    });
                    stack.push(OperandRef::Terminal(heap.terminals.len() - 1));
                }
                Operation::Noop => {}
            }
        }

        if stack.len() != 1 {
            malformed(&format!(
                "evaluation stack holds {} items instead of one",
                stack.len()
            ));
        }
        heap
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

fn next_expression(operands: &mut impl Iterator<Item = Expression>) -> Expression {
    operands
        .next()
        .unwrap_or_else(|| malformed("comparison is missing an expression"))
}

impl fmt::Display for EvalHeap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, t) in self.terminals.iter().enumerate() {
            if t.negated {
                writeln!(f, "T{}: NOT {}", idx, t.predicate)?;
            } else {
                writeln!(f, "T{}: {}", idx, t.predicate)?;
            }
        }
        for (idx, e) in self.entries.iter().enumerate() {
            writeln!(f, "N{}: {}", idx, e)?;
        }
        Ok(())
    }
}
