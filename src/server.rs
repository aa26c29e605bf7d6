//! Axum HTTP server: stateless endpoints over the evaluation engine.
//!
//! The terminal value table is shared through `Arc<SharedContext>`; handlers
//! wait for its single-flight load before evaluating.
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/evaluate` | Ranked holds or categories for one roll |
//! | POST | `/calculate-score` | Record a roll in a category, return sheet + bonus |
//!
//! Responses use a `{"data": ...}` / `{"error": {"message": ...}}` envelope.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};

use crate::api_computations::evaluate;
use crate::context::SharedContext;
use crate::error::YachtError;
use crate::game_mechanics::commit_category;
use crate::types::{Category, ScoreSheet};

pub type AppState = Arc<SharedContext>;

type ApiResult = Result<Json<Value>, (StatusCode, Json<Value>)>;

pub fn create_router(shared: Arc<SharedContext>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health_check))
        .route("/evaluate", post(handle_evaluate))
        .route("/calculate-score", post(handle_calculate_score))
        .layer(cors)
        .with_state(shared)
}

// ── Request types ───────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EvaluateRequest {
    score_sheet: ScoreSheet,
    dice: Vec<u8>,
    roll_count: u8,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CalculateScoreRequest {
    score_sheet: ScoreSheet,
    category: Category,
    dice: Vec<u8>,
}

fn error_response(status: StatusCode, msg: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "error": { "message": msg } })))
}

fn bad_request(err: impl std::fmt::Display) -> (StatusCode, Json<Value>) {
    log::warn!("rejected request: {}", err);
    error_response(StatusCode::BAD_REQUEST, &err.to_string())
}

fn engine_error(err: YachtError) -> (StatusCode, Json<Value>) {
    match err {
        YachtError::Io(_)
        | YachtError::BadMagic { .. }
        | YachtError::Truncated { .. }
        | YachtError::ChecksumMismatch { .. }
        | YachtError::StateIdOutOfRange { .. } => {
            log::error!("terminal value table unavailable: {}", err);
            error_response(StatusCode::SERVICE_UNAVAILABLE, &err.to_string())
        }
        _ => bad_request(err),
    }
}

// ── GET handlers ────────────────────────────────────────────────────

async fn handle_health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

// ── POST handlers ───────────────────────────────────────────────────

async fn handle_evaluate(
    State(shared): State<AppState>,
    payload: Result<Json<EvaluateRequest>, JsonRejection>,
) -> ApiResult {
    let Json(req) = payload.map_err(|e| bad_request(e.body_text()))?;
    let ctx = shared.get().await.map_err(engine_error)?;

    let choices =
        evaluate(&ctx, &req.score_sheet, &req.dice, req.roll_count).map_err(engine_error)?;
    Ok(Json(json!({ "data": choices })))
}

async fn handle_calculate_score(
    payload: Result<Json<CalculateScoreRequest>, JsonRejection>,
) -> ApiResult {
    let Json(req) = payload.map_err(|e| bad_request(e.body_text()))?;

    let (score_sheet, bonus) =
        commit_category(&req.score_sheet, req.category, &req.dice).map_err(engine_error)?;
    Ok(Json(json!({
        "data": {
            "scoreSheet": score_sheet,
            "bonus": bonus,
        }
    })))
}
