//! HTTP API for plan resolution
//!
//! Axum router over a shared [`Resolver`]. Health is plain text; everything
//! else is JSON, with errors rendered by [`PlanError`]'s `IntoResponse`.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Query, State, rejection::JsonRejection},
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;

use crate::error::{PlanError, Result};
use crate::models::{Resolution, ResolutionRequest};
use crate::resolver::Resolver;

/// Shared state for HTTP server
#[derive(Clone)]
pub struct HttpState {
    pub resolver: Arc<Resolver>,
}

impl HttpState {
    pub fn new(resolver: Resolver) -> Self {
        Self {
            resolver: Arc::new(resolver),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SubIndustryQuery {
    pub main: Option<String>,
}

/// Health check endpoint
pub async fn health_handler() -> impl IntoResponse {
    "ok"
}

pub async fn industries_handler(State(state): State<HttpState>) -> impl IntoResponse {
    Json(json!({
        "industries": state.resolver.catalog().list_main_industries(),
    }))
}

pub async fn sub_industries_handler(
    State(state): State<HttpState>,
    Query(query): Query<SubIndustryQuery>,
) -> Result<impl IntoResponse> {
    let main = query.main.ok_or_else(|| PlanError::InvalidRequest {
            message: "query parameter 'main' is required".to_string(),
        })?;
    let subs = state.resolver.catalog().list_sub_industries(&main);
    Ok(Json(json!({
        "main_industry": main,
        "sub_industries": subs,
    })))
}

pub async fn plan_handler(
    State(state): State<HttpState>,
    payload: std::result::Result<Json<ResolutionRequest>, JsonRejection>,
) -> Result<Json<Resolution>> {
    let Json(request) = payload.map_err(|e| PlanError::InvalidRequest {
        message: e.body_text(),
    })?;
    let resolution = state.resolver.resolve_request(&request).await?;
    Ok(Json(resolution))
}

/// Build the API router with CORS and a whole-request timeout
pub fn router(state: HttpState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/industries", get(industries_handler))
        .route("/sub-industries", get(sub_industries_handler))
        .route("/plan", post(plan_handler))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TimeoutLayer::new(request_timeout))
        .with_state(state)
}

/// Start the HTTP server
pub async fn serve(bind: SocketAddr, state: HttpState, request_timeout: Duration) -> Result<()> {
    let app = router(state, request_timeout);
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .map_err(|e| PlanError::Internal {
            message: format!("failed to bind {}: {}", bind, e),
        })?;
    tracing::info!("HTTP API listening on http://{}", bind);
    axum::serve(listener, app)
        .await
        .map_err(|e| PlanError::Internal {
            message: format!("HTTP server error: {}", e),
        })
}
