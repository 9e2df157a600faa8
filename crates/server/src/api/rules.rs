use axum::Json;
use axum::extract::{Path, State};

use tracing::{info, warn};

use rulr_rules::diagram::render_with_direction;
use rulr_rules::{combine, evaluate_rule, parse_rule, render_diagram};
use rulr_store::RuleId;

use crate::error::ServerError;

use super::AppState;
use super::extract::ApiJson;
use super::schemas::{
    CombineRequest, CombineResponse, CreateRuleResponse, DiagramRequest, DiagramResponse,
    ErrorResponse, EvaluateRequest, EvaluateResponse, ListRulesResponse, MessageResponse,
    RuleEntry, RuleRequest,
};

/// `POST /v1/rules` -- parse a rule, render its diagram, and store it.
///
/// A rule whose text is already stored still parses successfully; it is just
/// not stored again.
#[utoipa::path(
    post,
    path = "/v1/rules",
    tag = "Rules",
    summary = "Parse and store a rule",
    description = "Parses the rule, renders a Mermaid flowchart, and stores the rule text unless an identical rule already exists.",
    request_body(content = RuleRequest, description = "Rule text"),
    responses(
        (status = 200, description = "Rule parsed", body = CreateRuleResponse),
        (status = 400, description = "Malformed body or rule does not parse", body = ErrorResponse)
    )
)]
pub async fn create_rule(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RuleRequest>,
) -> Result<Json<CreateRuleResponse>, ServerError> {
    let ast = parse_rule(&req.rule)?;
    let mermaid = render_diagram(&ast);

    let (message, id) = match state.store.insert_unique(&req.rule).await {
        Ok(id) => {
            info!(%id, "rule stored");
            ("Rule parsed and stored successfully", Some(id.0))
        }
        Err(e) if e.is_duplicate() => {
            warn!(rule = %req.rule, "rule already stored");
            (
                "Rule parsed successfully (but not stored - duplicate rule)",
                None,
            )
        }
        Err(e) => return Err(e.into()),
    };

    Ok(Json(CreateRuleResponse {
        success: true,
        mermaid,
        message: message.to_owned(),
        id,
    }))
}

/// `GET /v1/rules` -- list all stored rules.
#[utoipa::path(
    get,
    path = "/v1/rules",
    tag = "Rules",
    summary = "List rules",
    description = "Returns every stored rule ordered by id.",
    responses(
        (status = 200, description = "Stored rules", body = ListRulesResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
pub async fn list_rules(
    State(state): State<AppState>,
) -> Result<Json<ListRulesResponse>, ServerError> {
    let rules = state
        .store
        .list_all()
        .await?
        .into_iter()
        .map(|r| RuleEntry {
            id: r.id.0,
            text: r.text,
        })
        .collect();

    Ok(Json(ListRulesResponse { rules }))
}

/// `DELETE /v1/rules/{id}` -- delete a stored rule.
#[utoipa::path(
    delete,
    path = "/v1/rules/{id}",
    tag = "Rules",
    summary = "Delete rule",
    description = "Deletes the stored rule with the given id.",
    params(
        ("id" = i64, Path, description = "Rule id")
    ),
    responses(
        (status = 200, description = "Rule deleted", body = MessageResponse),
        (status = 404, description = "No rule with this id", body = ErrorResponse)
    )
)]
pub async fn delete_rule(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ServerError> {
    let id = RuleId(id);
    if !state.store.delete(id).await? {
        return Err(ServerError::NotFound(format!("rule {id} not found")));
    }

    info!(%id, "rule deleted");
    Ok(Json(MessageResponse {
        success: true,
        message: "Rule deleted successfully".into(),
    }))
}

/// `POST /v1/rules/evaluate` -- evaluate a rule against facts.
///
/// Nothing is stored.
#[utoipa::path(
    post,
    path = "/v1/rules/evaluate",
    tag = "Rules",
    summary = "Evaluate rule",
    description = "Parses the rule and evaluates it against the supplied facts.",
    request_body(content = EvaluateRequest, description = "Rule text and facts"),
    responses(
        (status = 200, description = "Rule evaluated", body = EvaluateResponse),
        (status = 400, description = "Missing input, invalid rule, or evaluation failure", body = ErrorResponse)
    )
)]
pub async fn evaluate(
    ApiJson(req): ApiJson<EvaluateRequest>,
) -> Result<Json<EvaluateResponse>, ServerError> {
    let facts = match req.facts {
        Some(facts) if !req.rule.is_empty() && !facts.is_empty() => facts,
        _ => {
            return Err(ServerError::BadRequest(
                "Both rule and facts are required".into(),
            ));
        }
    };

    let result = evaluate_rule(&req.rule, &facts)?;

    Ok(Json(EvaluateResponse {
        success: true,
        result,
        message: format!("Rule evaluated to: {result}"),
    }))
}

/// `POST /v1/rules/combine` -- combine rules and store the result.
///
/// The rules listed in `rule_ids` are replaced by the combined rule in one
/// atomic step. If the combined text is already stored nothing changes.
#[utoipa::path(
    post,
    path = "/v1/rules/combine",
    tag = "Rules",
    summary = "Combine rules",
    description = "Joins two or more rules with AND or OR, validates the result, and stores it in place of the rules listed in rule_ids.",
    request_body(content = CombineRequest, description = "Rules, operator, and ids to replace"),
    responses(
        (status = 200, description = "Rules combined", body = CombineResponse),
        (status = 400, description = "Fewer than two rules or invalid rule", body = ErrorResponse),
        (status = 409, description = "Combined rule already exists", body = ErrorResponse)
    )
)]
pub async fn combine_rules(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CombineRequest>,
) -> Result<Json<CombineResponse>, ServerError> {
    if req.rules.len() < 2 {
        return Err(ServerError::BadRequest(
            "Please select at least two rules to combine".into(),
        ));
    }

    let combined = combine(&req.rules, req.operator)?;
    let mermaid = render_diagram(&combined.ast);

    let ids: Vec<RuleId> = req.rule_ids.iter().copied().map(RuleId).collect();
    let id = state
        .store
        .replace(&ids, &combined.text)
        .await
        .map_err(|e| {
            if e.is_duplicate() {
                ServerError::Conflict("This combined rule already exists".into())
            } else {
                e.into()
            }
        })?;

    info!(%id, replaced = ids.len(), operator = %req.operator, "rules combined");
    Ok(Json(CombineResponse {
        success: true,
        result: combined.text,
        mermaid,
        message: "Rules combined successfully".into(),
        id: id.0,
    }))
}

/// `POST /v1/rules/diagram` -- render a rule's diagram without storing it.
#[utoipa::path(
    post,
    path = "/v1/rules/diagram",
    tag = "Rules",
    summary = "Render rule diagram",
    description = "Parses the rule and returns its Mermaid flowchart. Nothing is stored.",
    request_body(content = DiagramRequest, description = "Rule text and optional direction"),
    responses(
        (status = 200, description = "Diagram rendered", body = DiagramResponse),
        (status = 400, description = "Malformed body or rule does not parse", body = ErrorResponse)
    )
)]
pub async fn diagram(
    ApiJson(req): ApiJson<DiagramRequest>,
) -> Result<Json<DiagramResponse>, ServerError> {
    let ast = parse_rule(&req.rule)?;
    Ok(Json(DiagramResponse {
        success: true,
        mermaid: render_with_direction(&ast, req.direction),
    }))
}
