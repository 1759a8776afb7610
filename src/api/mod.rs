//! REST API endpoints.
//!
//! Axum-based HTTP API for logging matches and reading the derived
//! analytics and campaign state.

pub mod routes;
pub mod state;

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::ledger::LedgerError;
use crate::models::GoalError;

use self::state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<LedgerError> for ApiError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::MatchNotFound(id) => ApiError::NotFound(format!("match {}", id)),
            LedgerError::Campaign(e) => {
                warn!("Campaign request rejected: {}", e);
                ApiError::BadRequest(e.to_string())
            }
            LedgerError::Storage(e) => {
                error!("Storage failure: {}", e);
                ApiError::Internal(e.to_string())
            }
        }
    }
}

impl From<GoalError> for ApiError {
    fn from(e: GoalError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match origin {
        "*" => layer.allow_origin(Any),
        other => match HeaderValue::from_str(other) {
            Ok(value) => layer.allow_origin(value),
            Err(_) => {
                warn!("Invalid CORS origin {:?}, allowing any", other);
                layer.allow_origin(Any)
            }
        },
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Build the application router.
pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    use routes::{analytics, campaign, goals, matches};

    Router::new()
        .route("/api/health", get(health))
        .route(
            "/api/matches",
            get(matches::list_matches).post(matches::create_match),
        )
        .route(
            "/api/matches/:id",
            put(matches::update_match).delete(matches::delete_match),
        )
        .route("/api/records", get(analytics::records))
        .route("/api/streaks/current", get(analytics::current_streaks))
        .route("/api/morale", get(analytics::morale))
        .route("/api/duels", get(analytics::duels))
        .route("/api/players", get(analytics::players))
        .route("/api/table", get(analytics::table))
        .route("/api/goals/progress", get(goals::goal_progress))
        .route("/api/campaign", get(campaign::get_campaign))
        .route(
            "/api/campaign/clear-champion",
            post(campaign::clear_champion),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origin))
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tempfile::TempDir;
    use tower::util::ServiceExt;

    use super::state::AppState;
    use crate::ledger::MatchLedger;
    use crate::storage::StorageConfig;

    pub fn setup_test_state(dir: &TempDir) -> AppState {
        let ledger = MatchLedger::open(StorageConfig::new(dir.path().to_path_buf())).unwrap();
        AppState::new(ledger, "Me")
    }

    pub fn app(state: &AppState) -> axum::Router {
        super::build_router(state.clone(), "*")
    }

    async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
        let resp = app.oneshot(request).await.unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
        send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn send_json(
        app: axum::Router,
        method: &str,
        uri: &str,
        body: &str,
    ) -> (StatusCode, Value) {
        send(
            app,
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }
}
