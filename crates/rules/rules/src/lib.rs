//! Rule-expression engine.
//!
//! Rules are flat field comparisons joined with `AND` / `OR` and grouped with
//! parentheses, e.g. `age > 30 AND department = 'Sales'`. Text is tokenized,
//! grouped and built into an arena-backed [`Ast`], which can then be
//! evaluated against a fact map or rendered as a Mermaid flowchart. Several
//! rule texts can be combined into one.

pub mod combine;
pub mod diagram;
pub mod engine;
pub mod error;
pub mod ir;
pub mod parser;

pub use combine::{BoolOp, CombinedRule, combine, combine_rules};
pub use diagram::{Direction, render_diagram};
pub use engine::{Facts, Value, evaluate, evaluate_rule};
pub use error::{ErrorKind, RuleError};
pub use ir::ast::{Ast, CompareOp, Node, NodeId};
pub use parser::{MAX_DEPTH, parse_rule};
