pub mod eval;
pub mod value;

pub use eval::evaluate;
pub use value::{Facts, Value};

use crate::error::RuleError;
use crate::parser::parse_rule;

/// Parse `text` and evaluate it against `facts` in one step.
pub fn evaluate_rule(text: &str, facts: &Facts) -> Result<bool, RuleError> {
    let ast = parse_rule(text)?;
    evaluate(&ast, facts)
}
