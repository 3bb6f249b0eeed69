use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::error::AppError;
use crate::routes::AppState;

/// Guards the back-office listings with the configured admin token. With no
/// token configured every request passes.
pub async fn require_bearer(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(expected) = state.admin_token.as_deref() else {
        return Ok(next.run(req).await);
    };

    // Extract Authorization header
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing access token".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Malformed Authorization header".to_string()))?;

    if token != expected {
        warn!("Rejected bearer token for {}", req.uri().path());
        return Err(AppError::Unauthorized("Invalid access token".to_string()));
    }

    Ok(next.run(req).await)
}
