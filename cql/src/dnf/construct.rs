use cql_core::{BooleanOp, Predicate};

use super::heap::{malformed, EvalHeap, EvalOp, OperandRef};

impl EvalHeap {
    /// Rebuilds a predicate tree from the heap, one predicate per entry in
    /// creation order. The predicate of the last entry is the result.
    pub(crate) fn construct(&self) -> Predicate {
        if self.entries.is_empty() {
            // the whole predicate is a single comparison
            return match self.terminals.first() {
                Some(t) if self.terminals.len() == 1 => t.to_predicate(),
                _ => malformed("a heap without entries must hold exactly one terminal"),
            };
        }

        let mut built: Vec<Predicate> = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            let p = match (entry.op, entry.second) {
                (EvalOp::Noop, _) => self.operand_predicate(entry.first, &built),
                (EvalOp::Not, _) => self.operand_predicate(entry.first, &built).not(),
                (EvalOp::And | EvalOp::Or, Some(second)) => {
                    let op = if entry.op == EvalOp::And {
                        BooleanOp::And
                    } else {
                        BooleanOp::Or
                    };
                    // keep the operand created first (or the only node) in front
                    let (front, back) = match (entry.first, second) {
                        (OperandRef::Terminal(_), OperandRef::Node(_)) => (second, entry.first),
                        (OperandRef::Node(_), OperandRef::Terminal(_)) => (entry.first, second),
                        _ => (second, entry.first),
                    };
                    flatten_append(
                        self.operand_predicate(front, &built),
                        op,
                        self.operand_predicate(back, &built),
                    )
                }
                (EvalOp::And | EvalOp::Or, None) => malformed("AND/OR entry with a single operand"),
            };
            built.push(p);
        }

        match built.pop() {
            Some(p) => p,
            None => malformed("empty evaluation heap"),
        }
    }

    fn operand_predicate(&self, operand: OperandRef, built: &[Predicate]) -> Predicate {
        match operand {
            OperandRef::Terminal(idx) => self.terminals[idx].to_predicate(),
            OperandRef::Node(idx) => built[idx].clone(),
        }
    }
}

fn joined_by(predicate: &Predicate, op: BooleanOp) -> bool {
    match predicate {
        Predicate::Compound {
            operators,
            inverted: false,
            ..
        } => operators.iter().all(|o| *o == op),
        _ => false,
    }
}

/// Combines `target <op> source` without creating nested compound predicates
/// that use the same connective.
///
/// Compound predicates which are joined by `op` are merged into one list. Any
/// other compound stays a single child, so a disjunction of conjunctions keeps
/// its two levels.
pub(crate) fn flatten_append(target: Predicate, op: BooleanOp, source: Predicate) -> Predicate {
    let mut result = if joined_by(&target, op) {
        target
    } else {
        Predicate::Compound {
            children: vec![target],
            operators: Vec::new(),
            inverted: false,
        }
    };

    if joined_by(&source, op) {
        if let Predicate::Compound { children, .. } = source {
            for c in children {
                result.append(op, c);
            }
        }
    } else {
        result.append(op, source);
    }
    result
}
