use cql::{
    to_dnf, BooleanOp, ComparisonOperator, Cql2Dnf, Expression, Predicate, SimplePredicate,
};
use proptest::prelude::*;

const PROPERTIES: [&str; 4] = ["p0", "p1", "p2", "p3"];

fn leaf(name_idx: usize, op: ComparisonOperator) -> Predicate {
    let left = Expression::property(PROPERTIES[name_idx]);
    let sp = if op.is_unary() {
        SimplePredicate::unary(left, op)
    } else {
        SimplePredicate::binary(left, op, Expression::Integer(name_idx as i64))
    };
    sp.unwrap().into()
}

fn arb_comparison() -> impl Strategy<Value = ComparisonOperator> {
    prop_oneof![
        Just(ComparisonOperator::Eq),
        Just(ComparisonOperator::Lt),
        Just(ComparisonOperator::Like),
        Just(ComparisonOperator::IsNull),
    ]
}

fn arb_boolean_op() -> impl Strategy<Value = BooleanOp> {
    prop_oneof![Just(BooleanOp::And), Just(BooleanOp::Or)]
}

fn arb_predicate() -> impl Strategy<Value = Predicate> {
    let literal = (0..PROPERTIES.len(), arb_comparison(), any::<bool>()).prop_map(
        |(name_idx, op, inverted)| {
            let mut p = leaf(name_idx, op);
            p.set_inverted(inverted);
            p
        },
    );
    literal.prop_recursive(3, 12, 3, |inner| {
        (
            prop::collection::vec(inner, 1..4),
            prop::collection::vec(arb_boolean_op(), 3),
            any::<bool>(),
        )
            .prop_map(|(children, operators, inverted)| {
                let operators = operators[..children.len() - 1].to_vec();
                let mut p = Predicate::compound(children, operators).unwrap();
                p.set_inverted(inverted);
                p
            })
    })
}

/// Truth value of a simple predicate under an assignment of the properties.
fn truth(assignment: &[bool; 4], sp: &SimplePredicate) -> bool {
    let idx = PROPERTIES
        .iter()
        .position(|name| sp.left() == &Expression::property(name))
        .unwrap();
    match sp.op() {
        ComparisonOperator::Eq => assignment[idx],
        ComparisonOperator::Lt => !assignment[idx],
        ComparisonOperator::IsNull => assignment[(idx + 1) % 4],
        _ => assignment[idx] != assignment[(idx + 2) % 4],
    }
}

fn has_inverted_compound(p: &Predicate) -> bool {
    match p {
        Predicate::Simple { .. } => false,
        Predicate::Compound { inverted, .. } if *inverted => true,
        Predicate::Compound { children, .. } => children.iter().any(has_inverted_compound),
    }
}

fn collect_literals(p: &Predicate, result: &mut Vec<(String, bool)>) {
    match p {
        Predicate::Simple {
            predicate,
            inverted,
        } => result.push((predicate.to_string(), *inverted)),
        Predicate::Compound { children, .. } => {
            for c in children {
                collect_literals(c, result);
            }
        }
    }
}

/// The clauses of a DNF predicate as sorted lists of (rendered comparison, negated).
fn clauses(dnf: &Predicate) -> Vec<Vec<(String, bool)>> {
    let disjunction = !dnf.is_simple() && dnf.operators().iter().all(|op| *op == BooleanOp::Or);
    let top: Vec<&Predicate> = if disjunction {
        dnf.children().iter().collect()
    } else {
        vec![dnf]
    };
    let mut result: Vec<Vec<(String, bool)>> = top
        .into_iter()
        .map(|clause| {
            let mut literals = Vec::new();
            collect_literals(clause, &mut literals);
            literals.sort();
            literals
        })
        .collect();
    result.sort();
    result
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn dnf_is_equivalent(p in arb_predicate(), assignment in any::<[bool; 4]>()) {
        let dnf = to_dnf(&p);
        let mut leaf = |sp: &SimplePredicate| truth(&assignment, sp);
        prop_assert_eq!(p.evaluate(&mut leaf), dnf.evaluate(&mut leaf));
    }

    #[test]
    fn dnf_has_dnf_shape(p in arb_predicate()) {
        let dnf = to_dnf(&p);
        prop_assert!(dnf.is_dnf(), "{} is not in DNF (input {})", dnf, p);
        prop_assert!(!has_inverted_compound(&dnf));
    }

    #[test]
    fn dnf_is_idempotent(p in arb_predicate()) {
        let once = to_dnf(&p);
        let twice = to_dnf(&once);
        prop_assert_eq!(clauses(&once), clauses(&twice));
    }

    #[test]
    fn dnf_keeps_conditions(p in arb_predicate()) {
        let dnf = to_dnf(&p);
        let mut input: Vec<String> =
            p.simple_predicates().iter().map(|sp| sp.to_string()).collect();
        let mut output: Vec<String> =
            dnf.simple_predicates().iter().map(|sp| sp.to_string()).collect();
        input.sort();
        input.dedup();
        output.sort();
        output.dedup();
        // distribution duplicates conditions but never invents new ones
        prop_assert!(output.iter().all(|c| input.contains(c)));
    }

    #[test]
    fn rewrites_are_bounded(p in arb_predicate()) {
        let leaves = p.simple_predicates().len();
        let dnf = Cql2Dnf::default().compile(&p).unwrap();
        prop_assert!(dnf.stats.rewrites <= 1usize << (2 * leaves));
        prop_assert_eq!(leaves, dnf.stats.terminals);
    }
}
