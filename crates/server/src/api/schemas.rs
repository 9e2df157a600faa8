use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use rulr_rules::{BoolOp, Direction, Facts};

/// Health check response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status indicator.
    #[schema(example = "ok")]
    pub status: String,
}

/// Error response body shared by every endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Always `false`.
    pub success: bool,
    /// Human-readable error message.
    #[schema(example = "syntax error: mismatched parentheses: 1 unclosed '('")]
    pub error: String,
}

/// Request body carrying a single rule text.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RuleRequest {
    /// The rule text.
    #[schema(example = "age > 30 AND department = 'Sales'")]
    pub rule: String,
}

/// Response for `POST /v1/rules`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateRuleResponse {
    /// Always `true`.
    pub success: bool,
    /// Mermaid flowchart for the parsed rule.
    #[schema(example = "graph TD\nn4[\"AND\"]\n")]
    pub mermaid: String,
    /// Whether the rule was stored or was already present.
    #[schema(example = "Rule parsed and stored successfully")]
    pub message: String,
    /// Id of the stored rule, `null` when the rule was a duplicate.
    pub id: Option<i64>,
}

/// A stored rule.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RuleEntry {
    /// Store-assigned id.
    #[schema(example = 1)]
    pub id: i64,
    /// The rule text.
    #[schema(example = "salary > 50000")]
    pub text: String,
}

/// Response for `GET /v1/rules`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListRulesResponse {
    /// All stored rules ordered by id.
    pub rules: Vec<RuleEntry>,
}

/// Generic success response with a message.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    /// Always `true`.
    pub success: bool,
    /// Outcome description.
    #[schema(example = "Rule deleted successfully")]
    pub message: String,
}

/// Request body for `POST /v1/rules/evaluate`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EvaluateRequest {
    /// The rule text to evaluate.
    #[serde(default)]
    #[schema(example = "age > 30 AND department = 'Sales'")]
    pub rule: String,
    /// Field values (integers, floats, or strings) keyed by field name.
    #[serde(default)]
    #[schema(value_type = Object, example = json!({"age": 35, "department": "Sales"}))]
    pub facts: Option<Facts>,
}

/// Response for `POST /v1/rules/evaluate`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EvaluateResponse {
    /// Always `true`.
    pub success: bool,
    /// Whether the rule holds for the given facts.
    pub result: bool,
    /// Outcome description.
    #[schema(example = "Rule evaluated to: true")]
    pub message: String,
}

/// Request body for `POST /v1/rules/combine`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CombineRequest {
    /// Rule texts to combine, at least two.
    #[serde(default)]
    pub rules: Vec<String>,
    /// Operator used to join the rules.
    #[serde(default)]
    #[schema(value_type = String, example = "AND")]
    pub operator: BoolOp,
    /// Ids of stored rules the combined rule replaces.
    #[serde(default)]
    pub rule_ids: Vec<i64>,
}

/// Response for `POST /v1/rules/combine`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CombineResponse {
    /// Always `true`.
    pub success: bool,
    /// The combined rule text.
    #[schema(example = "(age > 30) AND (salary > 50000)")]
    pub result: String,
    /// Mermaid flowchart for the combined rule.
    pub mermaid: String,
    /// Outcome description.
    #[schema(example = "Rules combined successfully")]
    pub message: String,
    /// Id of the stored combined rule.
    pub id: i64,
}

/// Request body for `POST /v1/rules/diagram`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DiagramRequest {
    /// The rule text.
    #[schema(example = "age > 30 OR salary > 50000")]
    pub rule: String,
    /// Flowchart orientation (`TD`, `LR`, `BT`, `RL`).
    #[serde(default)]
    #[schema(value_type = String, example = "TD")]
    pub direction: Direction,
}

/// Response for `POST /v1/rules/diagram`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DiagramResponse {
    /// Always `true`.
    pub success: bool,
    /// Mermaid flowchart for the rule.
    pub mermaid: String,
}
