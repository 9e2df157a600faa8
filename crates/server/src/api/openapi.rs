#![allow(clippy::needless_for_each)]

use super::schemas::{
    CombineRequest, CombineResponse, CreateRuleResponse, DiagramRequest, DiagramResponse,
    ErrorResponse, EvaluateRequest, EvaluateResponse, HealthResponse, ListRulesResponse,
    MessageResponse, RuleEntry, RuleRequest,
};

#[derive(utoipa::OpenApi)]
#[openapi(
    info(
        title = "Rulr API",
        version = "0.1.0",
        description = "HTTP API for the Rulr rule engine. Parse, store, evaluate, combine, and visualize eligibility rules.",
        license(name = "Apache-2.0")
    ),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Rules", description = "Rule parsing, storage, evaluation, and combination")
    ),
    paths(
        super::health::health,
        super::rules::create_rule,
        super::rules::list_rules,
        super::rules::delete_rule,
        super::rules::evaluate,
        super::rules::combine_rules,
        super::rules::diagram,
    ),
    components(schemas(
        HealthResponse,
        ErrorResponse,
        RuleRequest,
        CreateRuleResponse,
        RuleEntry,
        ListRulesResponse,
        MessageResponse,
        EvaluateRequest,
        EvaluateResponse,
        CombineRequest,
        CombineResponse,
        DiagramRequest,
        DiagramResponse,
    ))
)]
pub struct ApiDoc;
