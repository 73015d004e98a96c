//! HTTP surface for browser clients.
//!
//! Thin request-forwarding endpoints over the four gateway operations.
//! The credential never leaves this process: clients call these routes
//! and the server holds the key. Validation failures are rejected here,
//! before any backend dispatch.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::CorsLayer;

use lessonforge_common::ValidationError;
use lessonforge_gateway::{GatewayError, LessonGateway};
use lessonforge_model::{GeneratedLesson, LessonParams, NewPagePair, StructuredBlocks};

#[derive(Clone)]
struct AppState {
    gateway: Arc<dyn LessonGateway>,
}

/// Build the API router over any gateway implementation.
pub fn api_router(gateway: Arc<dyn LessonGateway>) -> Router {
    Router::new()
        .route("/api/generate-lesson", post(generate_lesson))
        .route("/api/modify-blocks", post(modify_blocks))
        .route("/api/add-page", post(add_page))
        .route("/api/rewrite-block", post(rewrite_block))
        .route("/api/check-config", get(check_config))
        .layer(CorsLayer::permissive())
        .with_state(AppState { gateway })
}

/// Bind and serve until shutdown.
pub async fn serve(addr: SocketAddr, gateway: Arc<dyn LessonGateway>) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "lessonforge API listening");
    axum::serve(listener, api_router(gateway)).await?;
    Ok(())
}

/// JSON error body with an HTTP status, mirrored to clients as
/// `{ "error": ..., "details": ... }`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": self.message,
            "details": self.details,
        });
        (self.status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        let status = match err {
            ValidationError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::BAD_REQUEST,
        };
        ApiError {
            status,
            message: err.to_string(),
            details: None,
        }
    }
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        let status = match &err {
            GatewayError::MissingApiKey => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::Backend { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            GatewayError::Http(_) | GatewayError::MalformedResponse(_) => StatusCode::BAD_GATEWAY,
        };
        ApiError {
            status,
            message: err.user_message(),
            details: None,
        }
    }
}

async fn generate_lesson(
    State(state): State<AppState>,
    Json(params): Json<LessonParams>,
) -> Result<Json<GeneratedLesson>, ApiError> {
    params.validate()?;
    let lesson = state.gateway.generate(&params).await?;
    Ok(Json(lesson))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModifyBlocksRequest {
    current_blocks: StructuredBlocks,
    instruction: String,
    params: LessonParams,
}

async fn modify_blocks(
    State(state): State<AppState>,
    Json(req): Json<ModifyBlocksRequest>,
) -> Result<Json<StructuredBlocks>, ApiError> {
    req.params.validate()?;
    let blocks = state
        .gateway
        .modify_blocks(&req.current_blocks, &req.instruction, &req.params)
        .await?;
    Ok(Json(blocks))
}

#[derive(Debug, Deserialize)]
struct AddPageRequest {
    params: LessonParams,
    instruction: String,
}

async fn add_page(
    State(state): State<AppState>,
    Json(req): Json<AddPageRequest>,
) -> Result<Json<NewPagePair>, ApiError> {
    req.params.validate()?;
    let pair = state.gateway.add_page(&req.params, &req.instruction).await?;
    Ok(Json(pair))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RewriteBlockRequest {
    block_key: String,
    current_text: String,
    instruction: String,
    params: LessonParams,
}

#[derive(Debug, Serialize)]
struct RewriteBlockResponse {
    text: String,
}

async fn rewrite_block(
    State(state): State<AppState>,
    Json(req): Json<RewriteBlockRequest>,
) -> Result<Json<RewriteBlockResponse>, ApiError> {
    req.params.validate()?;
    let text = state
        .gateway
        .rewrite_fragment(
            &req.block_key,
            &req.current_text,
            &req.instruction,
            &req.params,
        )
        .await?;
    Ok(Json(RewriteBlockResponse { text }))
}

/// Reports whether the credential is configured without revealing it.
async fn check_config() -> Json<serde_json::Value> {
    let key = std::env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty());
    let configured = key.is_some();

    Json(json!({
        "status": if configured { "configured" } else { "missing" },
        "apiKeyExists": configured,
        "apiKeyLength": key.map(|k| k.len()).unwrap_or(0),
        "message": if configured {
            "API key is configured correctly"
        } else {
            "API key is missing. Set GEMINI_API_KEY in the server environment."
        },
    }))
}
