//! Parenthesis grouping and precedence-aware AST construction.
//!
//! Tokens are collected into groups, one per open parenthesis. Closing a
//! group reduces it to a single node that is appended to the enclosing group.
//! A flat group is reduced by splitting at its first `OR`, else at its first
//! `AND`, else by reading exactly one `field operator literal` comparison.
//! Splitting at `OR` before `AND` makes `AND` bind tighter.
//!
//! Every later pass (evaluation, rendering, `Display`) walks the tree
//! recursively, so trees deeper than [`MAX_DEPTH`] conditions are rejected
//! here with a syntax error.

use std::mem;

use crate::error::RuleError;
use crate::ir::ast::{Ast, AstBuilder, CompareOp, Node, NodeId};
use crate::parser::lexer::Token;

/// Maximum number of nested conditions on any root-to-leaf path.
pub const MAX_DEPTH: usize = 256;

/// An element of a group: a raw token or an already reduced sub-expression.
#[derive(Debug, Clone, Copy)]
enum Item<'a> {
    Token(Token<'a>),
    Node(NodeId),
}

/// Build an AST from a token sequence.
///
/// Returns [`RuleError::Syntax`] on mismatched parentheses, malformed
/// comparisons or nesting deeper than [`MAX_DEPTH`], and [`RuleError::UnsupportedOperator`] for operators such as
/// `==`.
pub fn parse(tokens: &[Token<'_>]) -> Result<Ast, RuleError> {
    let mut arena = AstBuilder::default();
    let mut current: Vec<Item<'_>> = Vec::new();
    let mut enclosing: Vec<Vec<Item<'_>>> = Vec::new();

    for &token in tokens {
        match token {
            Token::LParen => enclosing.push(mem::take(&mut current)),
            Token::RParen => {
                let Some(parent) = enclosing.pop() else {
                    return Err(RuleError::Syntax(
                        "mismatched parentheses: unexpected ')'".to_owned(),
                    ));
                };
                let group = mem::replace(&mut current, parent);
                let node = reduce(&mut arena, &group, 1)?;
                current.push(Item::Node(node));
            }
            other => current.push(Item::Token(other)),
        }
    }

    if !enclosing.is_empty() {
        return Err(RuleError::Syntax(format!(
            "mismatched parentheses: {} unclosed '('",
            enclosing.len()
        )));
    }

    let root = reduce(&mut arena, &current, 1)?;
    Ok(arena.finish(root))
}

/// Reduce a flat group to one node. `level` is the recursion depth within
/// the group and never exceeds the depth of the node it produces.
fn reduce(arena: &mut AstBuilder, items: &[Item<'_>], level: usize) -> Result<NodeId, RuleError> {
    if level > MAX_DEPTH {
        return Err(too_deep());
    }
    match items {
        [] => Err(RuleError::Syntax("empty expression".to_owned())),
        [Item::Node(id)] => Ok(*id),
        [Item::Token(token)] => Err(RuleError::Syntax(format!(
            "incomplete expression: '{token}'"
        ))),
        _ => {
            if let Some(at) = find_keyword(items, Token::Or) {
                let left = reduce(arena, &items[..at], level + 1)?;
                let right = reduce(arena, &items[at + 1..], level + 1)?;
                junction(arena, Node::Or(left, right))
            } else if let Some(at) = find_keyword(items, Token::And) {
                let left = reduce(arena, &items[..at], level + 1)?;
                let right = reduce(arena, &items[at + 1..], level + 1)?;
                junction(arena, Node::And(left, right))
            } else {
                comparison(arena, items)
            }
        }
    }
}

/// Push an `And` / `Or` node, failing if it makes the tree too deep.
/// Parenthesized groups are reduced separately, so their depth adds up here.
fn junction(arena: &mut AstBuilder, node: Node) -> Result<NodeId, RuleError> {
    let id = arena.push(node);
    if arena.depth(id) > MAX_DEPTH {
        return Err(too_deep());
    }
    Ok(id)
}

fn too_deep() -> RuleError {
    RuleError::Syntax(format!(
        "rule too deeply nested: more than {MAX_DEPTH} nested conditions"
    ))
}

fn find_keyword(items: &[Item<'_>], keyword: Token<'_>) -> Option<usize> {
    items
        .iter()
        .position(|item| matches!(item, Item::Token(t) if *t == keyword))
}

/// Build a `Compare` node from exactly `[atom, operator, atom]`.
fn comparison(arena: &mut AstBuilder, items: &[Item<'_>]) -> Result<NodeId, RuleError> {
    let [
        Item::Token(Token::Atom(field)),
        Item::Token(Token::Operator(op)),
        Item::Token(Token::Atom(literal)),
    ] = items
    else {
        return Err(RuleError::Syntax(format!(
            "malformed comparison: expected 'field operator literal', found '{}'",
            describe(items)
        )));
    };

    let op: CompareOp = op.parse()?;
    let field = arena.push(Node::Field((*field).to_owned()));
    let literal = arena.push(Node::Literal((*literal).to_owned()));
    Ok(arena.push(Node::Compare { op, field, literal }))
}

/// Render a group for error messages; reduced sub-expressions show as `(...)`.
fn describe(items: &[Item<'_>]) -> String {
    items
        .iter()
        .map(|item| match item {
            Item::Token(token) => token.to_string(),
            Item::Node(_) => "(...)".to_owned(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
