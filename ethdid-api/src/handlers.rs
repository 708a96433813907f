//! API route handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use ethdid_core::types::{EnsDomain, PublishRejection, PublishResult};

use crate::dto::*;
use crate::error::ApiError;
use crate::state::AppState;

type Result<T> = std::result::Result<T, ApiError>;

/// GET /atproto-did/:domain
pub async fn get_atproto_did(
    State(state): State<Arc<AppState>>,
    Path(domain): Path<String>,
) -> Result<Json<LookupResponse>> {
    let domain = EnsDomain::parse(domain)?;
    let result = state.resolver.resolve(&domain).await;

    Ok(Json(LookupResponse::from(result)))
}

/// POST /atproto-did/:domain
pub async fn create_atproto_did(
    State(state): State<Arc<AppState>>,
    Path(domain): Path<String>,
    Json(req): Json<CreateDidRequest>,
) -> Result<(StatusCode, Json<PublishResponse>)> {
    let domain = EnsDomain::parse(domain)?;
    if req.domain != domain.as_str() {
        return Err(ApiError::bad_request(
            "Domain in request body must match path parameter",
        ));
    }

    let result = state.resolver.publish(&domain, &req.did).await;
    let status = publish_status(&result);

    info!(
        domain = %domain,
        status = status.as_u16(),
        error_type = ?result.error_type(),
        "Publish request handled"
    );

    Ok((status, Json(PublishResponse::from(result))))
}

/// Only syntax and backend failures change the status; other rejections
/// are reported in the body of a 200.
fn publish_status(result: &PublishResult) -> StatusCode {
    match result.rejection() {
        Some(PublishRejection::InvalidDid) => StatusCode::BAD_REQUEST,
        Some(PublishRejection::PinFailure) => StatusCode::INTERNAL_SERVER_ERROR,
        Some(PublishRejection::AlreadyExists | PublishRejection::Conflict) | None => StatusCode::OK,
    }
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".into(),
    })
}
