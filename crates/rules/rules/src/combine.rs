use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RuleError;
use crate::ir::ast::Ast;
use crate::parser::parse_rule;

/// Boolean operator used to join rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BoolOp {
    /// All rules must hold.
    #[default]
    And,
    /// At least one rule must hold.
    Or,
}

impl BoolOp {
    /// The keyword as written in rule text.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

impl fmt::Display for BoolOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for BoolOp {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AND" => Ok(Self::And),
            "OR" => Ok(Self::Or),
            other => Err(RuleError::Input(format!(
                "unsupported combine operator: {other}"
            ))),
        }
    }
}

/// The result of combining rules: the durable text and its validated AST.
#[derive(Debug, Clone)]
pub struct CombinedRule {
    /// `(r1) OP (r2) OP ...`
    pub text: String,
    /// The parsed form of `text`.
    pub ast: Ast,
}

/// Join `rules` with `op`, parenthesizing each, and validate the result by
/// parsing it.
pub fn combine<S: AsRef<str>>(rules: &[S], op: BoolOp) -> Result<CombinedRule, RuleError> {
    if rules.len() < 2 {
        return Err(RuleError::Input(format!(
            "at least two rules are required to combine, got {}",
            rules.len()
        )));
    }

    let separator = format!(" {op} ");
    let text = rules
        .iter()
        .map(|rule| format!("({})", rule.as_ref()))
        .collect::<Vec<_>>()
        .join(&separator);

    let ast = parse_rule(&text)?;
    debug!(rules = rules.len(), operator = %op, "combined rules");
    Ok(CombinedRule { text, ast })
}

/// Join `rules` with `op` and return only the validated text.
pub fn combine_rules<S: AsRef<str>>(rules: &[S], op: BoolOp) -> Result<String, RuleError> {
    combine(rules, op).map(|combined| combined.text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Facts, Value, evaluate, evaluate_rule};
    use crate::error::ErrorKind;
    use crate::ir::ast::Node;

    const SALES: &str = "age > 30 AND department = 'Sales'";
    const SALARY: &str = "salary > 50000";

    fn facts(age: i64, department: &str, salary: i64) -> Facts {
        Facts::from([
            ("age".to_owned(), Value::Int(age)),
            ("department".to_owned(), Value::from(department)),
            ("salary".to_owned(), Value::Int(salary)),
        ])
    }

    #[test]
    fn combined_text_format() {
        let text = combine_rules(&[SALES, SALARY], BoolOp::And).unwrap();
        assert_eq!(text, "(age > 30 AND department = 'Sales') AND (salary > 50000)");

        let text = combine_rules(&["a = 1", "b = 2", "c = 3"], BoolOp::Or).unwrap();
        assert_eq!(text, "(a = 1) OR (b = 2) OR (c = 3)");
    }

    #[test]
    fn combined_rule_evaluates_like_its_parts() {
        let combined = combine(&[SALES, SALARY], BoolOp::And).unwrap();
        for f in [facts(35, "Sales", 60000), facts(25, "Marketing", 40000)] {
            let expected = evaluate_rule(SALES, &f).unwrap() && evaluate_rule(SALARY, &f).unwrap();
            assert_eq!(evaluate(&combined.ast, &f).unwrap(), expected);
        }
        assert!(evaluate(&combined.ast, &facts(35, "Sales", 60000)).unwrap());
        assert!(!evaluate(&combined.ast, &facts(25, "Marketing", 40000)).unwrap());
    }

    #[test]
    fn or_combination() {
        let combined = combine(&[SALES, SALARY], BoolOp::Or).unwrap();
        assert!(matches!(combined.ast.node(combined.ast.root()), Node::Or(..)));
        assert!(evaluate(&combined.ast, &facts(25, "Marketing", 60000)).unwrap());
    }

    #[test]
    fn fewer_than_two_rules_is_input_error() {
        let err = combine_rules(&["only one rule"], BoolOp::And).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Input);

        let none: [&str; 0] = [];
        assert!(matches!(combine_rules(&none, BoolOp::And), Err(RuleError::Input(_))));
    }

    #[test]
    fn invalid_part_is_syntax_error() {
        let err = combine_rules(&["age > 30", "(salary > 1"], BoolOp::And).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax);
    }

    #[test]
    fn accepts_owned_strings() {
        let rules = vec![SALES.to_owned(), SALARY.to_owned()];
        assert!(combine_rules(&rules, BoolOp::And).is_ok());
    }

    #[test]
    fn bool_op_parsing_and_serde() {
        assert_eq!("AND".parse::<BoolOp>().unwrap(), BoolOp::And);
        assert_eq!("OR".parse::<BoolOp>().unwrap(), BoolOp::Or);
        assert!("and".parse::<BoolOp>().is_err());
        assert!("XOR".parse::<BoolOp>().is_err());
        assert_eq!(serde_json::to_string(&BoolOp::Or).unwrap(), "\"OR\"");
        assert_eq!(serde_json::from_str::<BoolOp>("\"AND\"").unwrap(), BoolOp::And);
        assert_eq!(BoolOp::default(), BoolOp::And);
    }
}
