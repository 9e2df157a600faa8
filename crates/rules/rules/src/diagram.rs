//! Mermaid flowchart rendering of a rule AST.
//!
//! Each `AND` / `OR` node becomes a labeled vertex with one edge per child;
//! each comparison becomes a single vertex labeled `field op literal`. Field
//! and literal leaves are folded into their comparison's label.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RuleError;
use crate::ir::ast::{Ast, Node, NodeId};

/// Flowchart orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    /// Top to bottom.
    #[default]
    #[serde(rename = "TD")]
    TopDown,
    /// Left to right.
    #[serde(rename = "LR")]
    LeftRight,
    /// Bottom to top.
    #[serde(rename = "BT")]
    BottomTop,
    /// Right to left.
    #[serde(rename = "RL")]
    RightLeft,
}

impl Direction {
    fn as_str(self) -> &'static str {
        match self {
            Self::TopDown => "TD",
            Self::LeftRight => "LR",
            Self::BottomTop => "BT",
            Self::RightLeft => "RL",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TD" | "TB" => Ok(Self::TopDown),
            "LR" => Ok(Self::LeftRight),
            "BT" => Ok(Self::BottomTop),
            "RL" => Ok(Self::RightLeft),
            other => Err(RuleError::Input(format!(
                "unsupported diagram direction: {other}"
            ))),
        }
    }
}

/// Render a complete Mermaid flowchart (`graph TD` header plus body).
pub fn render_diagram(ast: &Ast) -> String {
    render_with_direction(ast, Direction::default())
}

/// Render a complete Mermaid flowchart with the given orientation.
pub fn render_with_direction(ast: &Ast, direction: Direction) -> String {
    format!("graph {direction}\n{}", serialize(ast))
}

/// Serialize the flowchart body: one line per vertex and one per edge,
/// depth-first from the root.
pub fn serialize(ast: &Ast) -> String {
    let mut serializer = Serializer {
        ast,
        visited: vec![false; ast.len()],
        out: String::new(),
    };
    serializer.visit(ast.root());
    serializer.out
}

struct Serializer<'a> {
    ast: &'a Ast,
    visited: Vec<bool>,
    out: String,
}

impl Serializer<'_> {
    fn visit(&mut self, id: NodeId) {
        // The tree is acyclic; this only guards against re-emitting a vertex.
        if std::mem::replace(&mut self.visited[id.index()], true) {
            return;
        }

        match self.ast.node(id) {
            Node::And(left, right) | Node::Or(left, right) => {
                let (left, right) = (*left, *right);
                self.vertex(id);
                for child in [left, right] {
                    self.out.push_str(&format!("{id} --> {child}\n"));
                    self.visit(child);
                }
            }
            Node::Compare { .. } | Node::Field(_) | Node::Literal(_) => self.vertex(id),
        }
    }

    fn vertex(&mut self, id: NodeId) {
        let label = escape_label(&node_label(self.ast, id));
        self.out.push_str(&format!("{id}[\"{label}\"]\n"));
    }
}

/// Human-readable label for a node.
pub fn node_label(ast: &Ast, id: NodeId) -> String {
    match ast.node(id) {
        Node::And(..) => "AND".to_owned(),
        Node::Or(..) => "OR".to_owned(),
        Node::Compare { op, field, literal } => format!(
            "{} {op} {}",
            ast.field_name(*field).unwrap_or_default(),
            ast.literal_raw(*literal).unwrap_or_default()
        ),
        Node::Field(text) | Node::Literal(text) => text.clone(),
    }
}

/// Mermaid labels are quoted, so embedded double quotes must be entities.
fn escape_label(label: &str) -> String {
    label.replace('"', "#quot;")
}
