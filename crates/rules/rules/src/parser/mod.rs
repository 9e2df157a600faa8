pub mod builder;
pub mod lexer;

use tracing::debug;

use crate::error::RuleError;
use crate::ir::ast::Ast;

pub use builder::{MAX_DEPTH, parse};
pub use lexer::{Token, tokenize};

/// Tokenize and parse rule text into an [`Ast`].
pub fn parse_rule(text: &str) -> Result<Ast, RuleError> {
    let tokens = tokenize(text);
    let ast = parse(&tokens)?;
    debug!(tokens = tokens.len(), nodes = ast.len(), "parsed rule");
    Ok(ast)
}
