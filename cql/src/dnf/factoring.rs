use super::heap::{EvalEntry, EvalHeap, EvalOp, OperandRef};

impl EvalHeap {
    /// Applies the distributive law to the next `AND` that has an `OR` operand.
    ///
    /// `AND(OR(A, B), C)` at position `i` becomes `AND(C, B)` at `i`,
    /// `AND(C, A)` at `i + 1` and `OR(N[i + 1], N[i])` at `i + 2`. All later
    /// references to positions `i` and above move by two, so former parents of
    /// the rewritten `AND` now point to the new `OR`. Returns the rewritten
    /// position, or `None` once no `AND` has an `OR` operand.
    ///
    /// Must only be called after [`EvalHeap::push_not_down`].
    pub(crate) fn distribute_next(&mut self) -> Option<usize> {
        while self.cursor < self.entries.len() {
            let i = self.cursor;
            if let Some((other, or_first, or_second)) = self.and_over_or(i) {
                self.distribute(i, other, or_first, or_second);
                // the cursor stays at i, the new AND there can contain another OR
                return Some(i);
            }
            self.cursor += 1;
        }
        None
    }

    /// Runs [`EvalHeap::distribute_next`] to its fixed point and returns the number of rewrites.
    pub(crate) fn factor(&mut self) -> usize {
        let mut rewrites = 0;
        while self.distribute_next().is_some() {
            rewrites += 1;
        }
        trace!("evaluation heap after factoring:\n{}", self);
        rewrites
    }

    /// If entry `i` is an `AND` with an `OR` operand, returns the other operand
    /// of the `AND` and both operands of the `OR`.
    fn and_over_or(&self, i: usize) -> Option<(OperandRef, OperandRef, OperandRef)> {
        let entry = &self.entries[i];
        if entry.op != EvalOp::And {
            return None;
        }
        let second = entry.second?;
        if let Some((a, b)) = self.disjunction_operands(entry.first) {
            return Some((second, a, b));
        }
        if let Some((a, b)) = self.disjunction_operands(second) {
            return Some((entry.first, a, b));
        }
        None
    }

    fn disjunction_operands(&self, operand: OperandRef) -> Option<(OperandRef, OperandRef)> {
        match operand {
            OperandRef::Node(idx) => match &self.entries[idx] {
                EvalEntry {
                    op: EvalOp::Or,
                    first,
                    second: Some(second),
                    ..
                } => Some((*first, *second)),
                _ => None,
            },
            OperandRef::Terminal(_) => None,
        }
    }

    fn distribute(
        &mut self,
        i: usize,
        other: OperandRef,
        or_first: OperandRef,
        or_second: OperandRef,
    ) {
        let disjunction =
            EvalEntry::binary(EvalOp::Or, OperandRef::Node(i + 1), OperandRef::Node(i));
        self.entries.insert(i + 1, disjunction.clone());
        self.entries.insert(i + 1, disjunction);

        for later in self.entries[i + 3..].iter_mut() {
            later.shift_nodes(i, 2);
        }

        let mut first_conjunction = EvalEntry::binary(EvalOp::And, other, or_first);
        first_conjunction.order();
        self.entries[i + 1] = first_conjunction;

        let mut second_conjunction = EvalEntry::binary(EvalOp::And, other, or_second);
        second_conjunction.order();
        self.entries[i] = second_conjunction;
    }
}
