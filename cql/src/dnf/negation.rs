use super::heap::{EvalHeap, EvalOp, OperandRef};

impl EvalHeap {
    /// Moves all negations to the terminals with De Morgan's laws.
    ///
    /// Entries are visited from the root downwards. Each `NOT` is replaced by a
    /// `NOOP` and spliced out of its parents, its negation travels down as a
    /// pending mark. Afterwards no entry is a `NOT` and only terminals are negated.
    pub(crate) fn push_not_down(&mut self) {
        for i in (0..self.entries.len()).rev() {
            let mut pending = false;

            self.entries[i].order();

            if self.entries[i].op == EvalOp::Not {
                self.entries[i].op = EvalOp::Noop;

                let replacement = self.entries[i].first;
                for later in self.entries[i + 1..].iter_mut() {
                    if later.replace_operand(OperandRef::Node(i), replacement) {
                        later.order();
                    }
                }

                if self.entries[i].mark {
                    // double negation
                    self.entries[i].mark = false;
                } else {
                    pending = true;
                }
            }

            if self.entries[i].mark {
                self.entries[i].mark = false;
                self.entries[i].op = self.entries[i].op.dual();
                pending = true;
            }

            if pending {
                let operands: Vec<OperandRef> = self.entries[i].operands().collect();
                for operand in operands {
                    self.negate(operand);
                }
            }
        }
        trace!("evaluation heap after pushing NOT down:\n{}", self);
    }

    fn negate(&mut self, operand: OperandRef) {
        match operand {
            OperandRef::Terminal(idx) => {
                let t = &mut self.terminals[idx];
                t.negated = !t.negated;
            }
            OperandRef::Node(idx) => {
                let e = &mut self.entries[idx];
                e.mark = !e.mark;
            }
        }
    }
}
