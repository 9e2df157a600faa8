use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RuleError;

/// Index of a node inside its [`Ast`] arena.
///
/// The index is the node's stable identity within one tree and is used as
/// the diagram vertex name. It takes no part in equality or evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Comparison operators supported in rule conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareOp {
    /// `=`
    #[serde(rename = "=")]
    Eq,
    /// `>`
    #[serde(rename = ">")]
    Gt,
    /// `<`
    #[serde(rename = "<")]
    Lt,
    /// `>=`
    #[serde(rename = ">=")]
    Ge,
    /// `<=`
    #[serde(rename = "<=")]
    Le,
}

impl CompareOp {
    /// The operator as written in rule text.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Ge => ">=",
            Self::Le => "<=",
        }
    }
}

impl FromStr for CompareOp {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "=" => Ok(Self::Eq),
            ">" => Ok(Self::Gt),
            "<" => Ok(Self::Lt),
            ">=" => Ok(Self::Ge),
            "<=" => Ok(Self::Le),
            other => Err(RuleError::UnsupportedOperator(other.to_owned())),
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A node of the rule AST.
///
/// Children are referenced by [`NodeId`] into the owning [`Ast`]. Each id is
/// referenced by at most one parent.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A field reference; the raw atom text.
    Field(String),
    /// A literal; the raw atom text, coerced only at evaluation time.
    Literal(String),
    /// `field op literal`. `field` is always a `Field` node and `literal` a
    /// `Literal` node.
    Compare {
        /// Comparison operator.
        op: CompareOp,
        /// The `Field` child.
        field: NodeId,
        /// The `Literal` child.
        literal: NodeId,
    },
    /// Both children must hold.
    And(NodeId, NodeId),
    /// At least one child must hold.
    Or(NodeId, NodeId),
}

impl Node {
    /// Short name of the variant, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Field(_) => "field",
            Self::Literal(_) => "literal",
            Self::Compare { .. } => "compare",
            Self::And(..) => "and",
            Self::Or(..) => "or",
        }
    }
}

/// A parsed rule: an arena of nodes plus the root id.
///
/// Built once by the parser and never mutated afterwards. Two trees are equal
/// when they have the same structure, regardless of how their arenas are laid
/// out.
#[derive(Debug, Clone)]
pub struct Ast {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Ast {
    /// The root node id.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Look up a node by id.
    ///
    /// Ids are only ever handed out by the tree that owns them, so indexing
    /// cannot go out of bounds for ids obtained from this tree.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Number of nodes in the arena, leaves included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena is empty. A parsed tree always has at least a root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over `(id, node)` pairs in arena order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// The name of a `Field` node, or `None` for any other variant.
    pub fn field_name(&self, id: NodeId) -> Option<&str> {
        match self.node(id) {
            Node::Field(name) => Some(name),
            _ => None,
        }
    }

    /// The raw text of a `Literal` node, or `None` for any other variant.
    pub fn literal_raw(&self, id: NodeId) -> Option<&str> {
        match self.node(id) {
            Node::Literal(raw) => Some(raw),
            _ => None,
        }
    }

    fn same_structure(&self, a: NodeId, other: &Self, b: NodeId) -> bool {
        match (self.node(a), other.node(b)) {
            (Node::Field(x), Node::Field(y)) | (Node::Literal(x), Node::Literal(y)) => x == y,
            (
                Node::Compare {
                    op: op_a,
                    field: fa,
                    literal: la,
                },
                Node::Compare {
                    op: op_b,
                    field: fb,
                    literal: lb,
                },
            ) => {
                op_a == op_b
                    && self.same_structure(*fa, other, *fb)
                    && self.same_structure(*la, other, *lb)
            }
            (Node::And(la, ra), Node::And(lb, rb)) | (Node::Or(la, ra), Node::Or(lb, rb)) => {
                self.same_structure(*la, other, *lb) && self.same_structure(*ra, other, *rb)
            }
            _ => false,
        }
    }

    fn write_node(&self, id: NodeId, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.node(id) {
            Node::Field(text) | Node::Literal(text) => f.write_str(text),
            Node::Compare { op, field, literal } => {
                self.write_node(*field, f)?;
                write!(f, " {op} ")?;
                self.write_node(*literal, f)
            }
            Node::And(left, right) => self.write_binary("AND", *left, *right, f),
            Node::Or(left, right) => self.write_binary("OR", *left, *right, f),
        }
    }

    fn write_binary(
        &self,
        keyword: &str,
        left: NodeId,
        right: NodeId,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        self.write_operand(left, f)?;
        write!(f, " {keyword} ")?;
        self.write_operand(right, f)
    }

    fn write_operand(&self, id: NodeId, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if matches!(self.node(id), Node::And(..) | Node::Or(..)) {
            f.write_str("(")?;
            self.write_node(id, f)?;
            f.write_str(")")
        } else {
            self.write_node(id, f)
        }
    }
}

impl PartialEq for Ast {
    fn eq(&self, other: &Self) -> bool {
        self.same_structure(self.root, other, other.root)
    }
}

/// Renders the tree back to rule text, parenthesizing every compound
/// operand. Parsing the output yields a structurally equal tree.
impl fmt::Display for Ast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_node(self.root, f)
    }
}

/// Append-only arena used while parsing.
///
/// Tracks the condition depth of every node: leaves are 0, a comparison is 1
/// and a junction is one more than its deeper child.
#[derive(Debug, Default)]
pub(crate) struct AstBuilder {
    nodes: Vec<Node>,
    depths: Vec<usize>,
}

impl AstBuilder {
    pub(crate) fn push(&mut self, node: Node) -> NodeId {
        let depth = match &node {
            Node::Field(_) | Node::Literal(_) => 0,
            Node::Compare { .. } => 1,
            Node::And(l, r) | Node::Or(l, r) => 1 + self.depths[l.0].max(self.depths[r.0]),
        };
        self.nodes.push(node);
        self.depths.push(depth);
        NodeId(self.nodes.len() - 1)
    }

    /// Condition depth of the subtree rooted at `id`.
    pub(crate) fn depth(&self, id: NodeId) -> usize {
        self.depths[id.0]
    }

    pub(crate) fn finish(self, root: NodeId) -> Ast {
        Ast {
            nodes: self.nodes,
            root,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compare(b: &mut AstBuilder, field: &str, op: CompareOp, literal: &str) -> NodeId {
        let field = b.push(Node::Field(field.into()));
        let literal = b.push(Node::Literal(literal.into()));
        b.push(Node::Compare { op, field, literal })
    }

    #[test]
    fn compare_op_from_str() {
        assert_eq!("=".parse::<CompareOp>().unwrap(), CompareOp::Eq);
        assert_eq!(">=".parse::<CompareOp>().unwrap(), CompareOp::Ge);
        assert_eq!("<=".parse::<CompareOp>().unwrap(), CompareOp::Le);
        let err = "==".parse::<CompareOp>().unwrap_err();
        assert!(matches!(err, RuleError::UnsupportedOperator(op) if op == "=="));
    }

    #[test]
    fn compare_op_symbol_round_trip() {
        for op in [
            CompareOp::Eq,
            CompareOp::Gt,
            CompareOp::Lt,
            CompareOp::Ge,
            CompareOp::Le,
        ] {
            assert_eq!(op.symbol().parse::<CompareOp>().unwrap(), op);
        }
    }

    #[test]
    fn compare_op_serde_uses_symbols() {
        let json = serde_json::to_string(&CompareOp::Ge).unwrap();
        assert_eq!(json, "\">=\"");
        let op: CompareOp = serde_json::from_str("\"<\"").unwrap();
        assert_eq!(op, CompareOp::Lt);
    }

    #[test]
    fn display_parenthesizes_compound_operands() {
        let mut b = AstBuilder::default();
        let a = compare(&mut b, "a", CompareOp::Gt, "1");
        let bb = compare(&mut b, "b", CompareOp::Eq, "'x'");
        let c = compare(&mut b, "c", CompareOp::Le, "3");
        let and = b.push(Node::And(bb, c));
        let root = b.push(Node::Or(a, and));
        let ast = b.finish(root);
        assert_eq!(ast.to_string(), "a > 1 OR (b = 'x' AND c <= 3)");
    }

    #[test]
    fn equality_ignores_arena_layout() {
        let mut first = AstBuilder::default();
        let a = compare(&mut first, "a", CompareOp::Gt, "1");
        let b = compare(&mut first, "b", CompareOp::Lt, "2");
        let root = first.push(Node::And(a, b));
        let first = first.finish(root);

        // Same tree, children pushed in the opposite order.
        let mut second = AstBuilder::default();
        let b = compare(&mut second, "b", CompareOp::Lt, "2");
        let a = compare(&mut second, "a", CompareOp::Gt, "1");
        let root = second.push(Node::And(a, b));
        let second = second.finish(root);

        assert_eq!(first, second);
    }

    #[test]
    fn inequality_on_operator_or_shape() {
        let mut first = AstBuilder::default();
        let root = compare(&mut first, "a", CompareOp::Gt, "1");
        let first = first.finish(root);

        let mut second = AstBuilder::default();
        let root = compare(&mut second, "a", CompareOp::Ge, "1");
        let second = second.finish(root);
        assert_ne!(first, second);

        let mut third = AstBuilder::default();
        let a = compare(&mut third, "a", CompareOp::Gt, "1");
        let b = compare(&mut third, "a", CompareOp::Gt, "1");
        let root = third.push(Node::Or(a, b));
        let third = third.finish(root);
        assert_ne!(first, third);
    }

    #[test]
    fn accessors() {
        let mut b = AstBuilder::default();
        let root = compare(&mut b, "age", CompareOp::Gt, "30");
        let ast = b.finish(root);

        assert_eq!(ast.len(), 3);
        assert!(!ast.is_empty());
        let Node::Compare { field, literal, .. } = ast.node(ast.root()) else {
            panic!("expected compare root");
        };
        assert_eq!(ast.field_name(*field), Some("age"));
        assert_eq!(ast.literal_raw(*literal), Some("30"));
        assert_eq!(ast.field_name(*literal), None);
        assert_eq!(ast.root().to_string(), "n2");
    }

    #[test]
    fn builder_tracks_condition_depth() {
        let mut b = AstBuilder::default();
        let a = compare(&mut b, "a", CompareOp::Gt, "1");
        let c = compare(&mut b, "c", CompareOp::Lt, "2");
        let and = b.push(Node::And(a, c));
        let d = compare(&mut b, "d", CompareOp::Eq, "3");
        let or = b.push(Node::Or(d, and));
        assert_eq!(b.depth(a), 1);
        assert_eq!(b.depth(and), 2);
        assert_eq!(b.depth(or), 3);
    }
}
