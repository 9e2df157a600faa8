use thiserror::Error;

/// Broad category of a [`RuleError`], matching the three stages that can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The rule text could not be turned into an AST.
    Syntax,
    /// The AST could not be evaluated against the supplied facts.
    Evaluation,
    /// The caller supplied unusable input (e.g. too few rules to combine).
    Input,
}

/// Errors that can occur during rule parsing, evaluation, or combination.
#[derive(Debug, Error)]
pub enum RuleError {
    /// Mismatched parentheses, a malformed comparison, or a dangling keyword.
    #[error("syntax error: {0}")]
    Syntax(String),

    /// A comparison used an operator outside `=`, `>`, `<`, `>=`, `<=`.
    #[error("unsupported operator: {0}")]
    UnsupportedOperator(String),

    /// A comparison referenced a field that is absent from the facts.
    #[error("field '{0}' not found in provided data")]
    MissingField(String),

    /// The fact value and the literal have types with no common ordering.
    #[error("cannot compare field '{field}' ({fact_type}) with {literal_type} using '{op}'")]
    Incomparable {
        /// Field being compared.
        field: String,
        /// Operator symbol.
        op: String,
        /// Type name of the fact value.
        fact_type: &'static str,
        /// Type name of the coerced literal.
        literal_type: &'static str,
    },

    /// A node that is not a condition reached the evaluator.
    #[error("unsupported node type: {0}")]
    UnsupportedNode(String),

    /// Invalid caller input.
    #[error("invalid input: {0}")]
    Input(String),
}

impl RuleError {
    /// Return the category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Syntax(_) | Self::UnsupportedOperator(_) => ErrorKind::Syntax,
            Self::MissingField(_) | Self::Incomparable { .. } | Self::UnsupportedNode(_) => {
                ErrorKind::Evaluation
            }
            Self::Input(_) => ErrorKind::Input,
        }
    }
}
