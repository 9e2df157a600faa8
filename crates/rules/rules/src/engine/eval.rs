use std::cmp::Ordering;

use tracing::{debug, instrument};

use crate::engine::value::{Facts, Value};
use crate::error::RuleError;
use crate::ir::ast::{Ast, CompareOp, Node, NodeId};

/// Evaluate a parsed rule against a set of facts.
///
/// `And` and `Or` short-circuit, so a field that only appears in a branch
/// that is never reached does not need to be present.
#[instrument(skip_all, fields(nodes = ast.len(), facts = facts.len()))]
pub fn evaluate(ast: &Ast, facts: &Facts) -> Result<bool, RuleError> {
    let result = eval_node(ast, ast.root(), facts)?;
    debug!(result, "rule evaluated");
    Ok(result)
}

/// Recursively evaluate the node `id` of `ast`.
fn eval_node(ast: &Ast, id: NodeId, facts: &Facts) -> Result<bool, RuleError> {
    match ast.node(id) {
        Node::And(left, right) => Ok(eval_node(ast, *left, facts)? && eval_node(ast, *right, facts)?),
        Node::Or(left, right) => Ok(eval_node(ast, *left, facts)? || eval_node(ast, *right, facts)?),
        Node::Compare { op, field, literal } => eval_compare(ast, *op, *field, *literal, facts),
        other => Err(RuleError::UnsupportedNode(other.kind_name().to_owned())),
    }
}

/// Evaluate `field op literal`, coercing the literal at this point.
fn eval_compare(
    ast: &Ast,
    op: CompareOp,
    field: NodeId,
    literal: NodeId,
    facts: &Facts,
) -> Result<bool, RuleError> {
    let name = ast
        .field_name(field)
        .ok_or_else(|| RuleError::UnsupportedNode(ast.node(field).kind_name().to_owned()))?;
    let raw = ast
        .literal_raw(literal)
        .ok_or_else(|| RuleError::UnsupportedNode(ast.node(literal).kind_name().to_owned()))?;

    let fact = facts
        .get(name)
        .ok_or_else(|| RuleError::MissingField(name.to_owned()))?;
    let expected = Value::coerce_literal(raw);

    compare_values(op, fact, &expected).ok_or_else(|| RuleError::Incomparable {
        field: name.to_owned(),
        op: op.symbol().to_owned(),
        fact_type: fact.type_name(),
        literal_type: expected.type_name(),
    })
}

/// Apply `op` to `lhs op rhs`. Returns `None` when an ordering operator is
/// applied to values without a common ordering.
pub(crate) fn compare_values(op: CompareOp, lhs: &Value, rhs: &Value) -> Option<bool> {
    if op == CompareOp::Eq {
        return Some(lhs.loose_eq(rhs));
    }
    let ordering = lhs.ordering(rhs)?;
    Some(match op {
        CompareOp::Gt => ordering == Ordering::Greater,
        CompareOp::Lt => ordering == Ordering::Less,
        CompareOp::Ge => ordering != Ordering::Less,
        CompareOp::Le => ordering != Ordering::Greater,
        CompareOp::Eq => ordering == Ordering::Equal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::parser::parse_rule;

    fn facts(pairs: &[(&str, Value)]) -> Facts {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), v.clone()))
            .collect()
    }

    fn sales_facts() -> Facts {
        facts(&[
            ("age", Value::Int(35)),
            ("department", Value::from("Sales")),
            ("salary", Value::Int(60000)),
        ])
    }

    fn marketing_facts() -> Facts {
        facts(&[
            ("age", Value::Int(25)),
            ("department", Value::from("Marketing")),
            ("salary", Value::Int(40000)),
        ])
    }

    fn eval_text(text: &str, facts: &Facts) -> Result<bool, RuleError> {
        evaluate(&parse_rule(text)?, facts)
    }

    #[test]
    fn sales_rule() {
        let rule = "age > 30 AND department = 'Sales'";
        assert!(eval_text(rule, &sales_facts()).unwrap());
        assert!(!eval_text(rule, &marketing_facts()).unwrap());
    }

    #[test]
    fn every_operator_on_integers() {
        let f = facts(&[("n", Value::Int(10))]);
        assert!(eval_text("n = 10", &f).unwrap());
        assert!(!eval_text("n = 11", &f).unwrap());
        assert!(eval_text("n > 9", &f).unwrap());
        assert!(!eval_text("n > 10", &f).unwrap());
        assert!(eval_text("n < 11", &f).unwrap());
        assert!(!eval_text("n < 10", &f).unwrap());
        assert!(eval_text("n >= 10", &f).unwrap());
        assert!(!eval_text("n >= 11", &f).unwrap());
        assert!(eval_text("n <= 10", &f).unwrap());
        assert!(!eval_text("n <= 9", &f).unwrap());
    }

    #[test]
    fn float_fact_against_integer_literal() {
        let f = facts(&[("score", Value::Float(7.5))]);
        assert!(eval_text("score > 7", &f).unwrap());
        assert!(eval_text("score < 8", &f).unwrap());
        assert!(!eval_text("score = 7", &f).unwrap());
    }

    #[test]
    fn string_equality_is_case_sensitive() {
        let rule = "status = 'active'";
        let active = facts(&[("status", Value::from("active"))]);
        let capital = facts(&[("status", Value::from("Active"))]);
        assert!(eval_text(rule, &active).unwrap());
        assert!(!eval_text(rule, &capital).unwrap());
    }

    #[test]
    fn unquoted_literal_compares_as_string() {
        let f = facts(&[("status", Value::from("active"))]);
        assert!(eval_text("status = active", &f).unwrap());
    }

    #[test]
    fn string_ordering_is_lexicographic() {
        let f = facts(&[("name", Value::from("bob"))]);
        assert!(eval_text("name > 'alice'", &f).unwrap());
        assert!(!eval_text("name > 'carol'", &f).unwrap());
    }

    #[test]
    fn equality_across_unrelated_types_is_false() {
        let f = facts(&[("age", Value::from("thirty"))]);
        assert!(!eval_text("age = 30", &f).unwrap());
    }

    #[test]
    fn ordering_across_unrelated_types_fails() {
        let f = facts(&[("age", Value::from("thirty"))]);
        let err = eval_text("age > 30", &f).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Evaluation);
        match err {
            RuleError::Incomparable {
                field,
                op,
                fact_type,
                literal_type,
            } => {
                assert_eq!(field, "age");
                assert_eq!(op, ">");
                assert_eq!(fact_type, "string");
                assert_eq!(literal_type, "int");
            }
            other => panic!("expected Incomparable, got {other:?}"),
        }
    }

    #[test]
    fn missing_field_fails() {
        let err = eval_text("age > 30", &Facts::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Evaluation);
        assert!(matches!(err, RuleError::MissingField(name) if name == "age"));
    }

    #[test]
    fn short_circuit_skips_unreached_branch() {
        let f = facts(&[("age", Value::Int(20))]);
        assert!(!eval_text("age > 30 AND salary > 1", &f).unwrap());
        assert!(eval_text("age < 30 OR salary > 1", &f).unwrap());
        assert!(eval_text("age < 30 AND salary > 1", &f).is_err());
    }

    #[test]
    fn precedence_law_holds_for_all_substitutions() {
        // A OR B AND C must equal A OR (B AND C).
        for bits in 0..8u8 {
            let f = facts(&[
                ("a", Value::Int(i64::from(bits & 1))),
                ("b", Value::Int(i64::from((bits >> 1) & 1))),
                ("c", Value::Int(i64::from((bits >> 2) & 1))),
            ]);
            let (a, b, c) = (bits & 1 == 1, bits & 2 == 2, bits & 4 == 4);
            let got = eval_text("a = 1 OR b = 1 AND c = 1", &f).unwrap();
            assert_eq!(got, a || (b && c), "a={a} b={b} c={c}");
            let grouped = eval_text("a = 1 OR (b = 1 AND c = 1)", &f).unwrap();
            assert_eq!(got, grouped);
        }
    }

    #[test]
    fn deepest_accepted_rule_evaluates_on_small_stack() {
        use crate::parser::MAX_DEPTH;

        let handle = std::thread::Builder::new()
            .stack_size(2 * 1024 * 1024)
            .spawn(|| {
                let f = facts(&[("a", Value::Int(1))]);
                let all = vec!["a = 1"; MAX_DEPTH].join(" AND ");
                let none = vec!["a = 2"; MAX_DEPTH].join(" OR ");
                (eval_text(&all, &f).unwrap(), eval_text(&none, &f).unwrap())
            })
            .unwrap();
        assert_eq!(handle.join().unwrap(), (true, false));
    }

    #[test]
    fn compare_values_table() {
        assert_eq!(
            compare_values(CompareOp::Ge, &Value::Int(3), &Value::Int(3)),
            Some(true)
        );
        assert_eq!(
            compare_values(CompareOp::Le, &Value::Int(4), &Value::Float(3.5)),
            Some(false)
        );
        assert_eq!(
            compare_values(CompareOp::Eq, &Value::Int(1), &Value::from("1")),
            Some(false)
        );
        assert_eq!(
            compare_values(CompareOp::Lt, &Value::Int(1), &Value::from("1")),
            None
        );
    }
}
