use cql::{
    ComparisonOperator, Cql2Dnf, DnfConfig, Expression, Predicate, SimplePredicate, WhereClause,
};
use pretty_assertions::assert_eq;

fn eq(name: &str, value: i64) -> Predicate {
    SimplePredicate::binary(Expression::property(name), ComparisonOperator::Eq, value.into())
        .unwrap()
        .into()
}

#[test]
fn normalize_is_idempotent() {
    let mut clause = WhereClause::new(eq("a", 1).and(eq("b", 2).or(eq("c", 3))));
    assert_eq!(false, clause.is_normalized());

    let converter = Cql2Dnf::default();
    clause.normalize_to_doc(&converter).unwrap();
    assert_eq!(true, clause.is_normalized());
    let normalized = clause.clone();
    assert_eq!(
        "WHERE (a = 1 AND b = 2) OR (a = 1 AND c = 3)",
        normalized.to_string()
    );

    clause.normalize_to_doc(&converter).unwrap();
    assert_eq!(normalized, clause);
}

#[test]
fn missing_where_clause_selects_everything() {
    let mut clause = WhereClause::default();
    assert_eq!(false, clause.has_where_clause());
    assert_eq!(true, clause.evaluate(&mut |_| false));

    clause.normalize_to_doc(&Cql2Dnf::default()).unwrap();
    assert_eq!(None, clause.predicate());
    assert_eq!("", clause.to_string());
}

#[test]
fn evaluate_after_normalization() {
    let mut clause: WhereClause = eq("a", 1).and(eq("b", 2)).not().into();
    let mut only_a = |sp: &SimplePredicate| sp.left() == &Expression::property("a");
    assert_eq!(true, clause.evaluate(&mut only_a));

    clause.normalize_to_doc(&Cql2Dnf::default()).unwrap();
    assert_eq!(true, clause.evaluate(&mut only_a));
    assert_eq!(false, clause.evaluate(&mut |_| true));
}

#[test]
fn failed_normalization_keeps_predicate() {
    let p = eq("a", 1).and(eq("b", 2).or(eq("c", 3)));
    let mut clause = WhereClause::new(p.clone());
    let converter = Cql2Dnf::new(DnfConfig::with_max_heap_entries(2));

    assert_eq!(true, clause.normalize_to_doc(&converter).is_err());
    assert_eq!(false, clause.is_normalized());
    assert_eq!(Some(&p), clause.predicate());

    clause.clear();
    assert_eq!(false, clause.has_where_clause());
}

#[test]
fn json_round_trip() {
    let mut clause = WhereClause::new(eq("a", 1).or(eq("b", 2).not()));
    clause.normalize_to_doc(&Cql2Dnf::default()).unwrap();

    let json = serde_json::to_string(&clause).unwrap();
    let parsed: WhereClause = serde_json::from_str(&json).unwrap();
    assert_eq!(clause, parsed);
    assert_eq!(true, parsed.is_normalized());

    let config: DnfConfig = serde_json::from_str(r#"{"max_heap_entries": 5}"#).unwrap();
    assert_eq!(DnfConfig::with_max_heap_entries(5), config);
    let config: DnfConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(DnfConfig::default(), config);
}
