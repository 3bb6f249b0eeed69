use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use tracing::error;

/// Errors raised by the list backend. Rendered as the same envelope the
/// listing endpoints use for success, minus `data`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    InternalServerError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::InternalServerError(msg) => {
                error!("Internal server error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "statusCode": status.as_u16(),
            "message": error_message,
            "error": status.canonical_reason().unwrap_or("Error"),
        }));

        (status, body).into_response()
    }
}

/// Errors surfaced by a page fetch. The data source only keeps the
/// rendered message; callers that talk to the API directly can match on it.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend answered {status}: {message}")]
    Status { status: u16, message: String },
    #[error("backend response carried no data")]
    MissingData,
    #[error("invalid API base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl FetchError {
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            FetchError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn app_error_renders_backend_envelope() {
        let response = AppError::BadRequest("pageSize must be at least 1".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["statusCode"], 400);
        assert_eq!(body["message"], "pageSize must be at least 1");
        assert_eq!(body["error"], "Bad Request");
    }

    #[tokio::test]
    async fn internal_errors_hide_details() {
        let response = AppError::InternalServerError("catalog poisoned".into()).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "Internal server error");
    }

    #[test]
    fn fetch_error_exposes_status() {
        let err = FetchError::Status {
            status: 401,
            message: "Unauthorized".into(),
        };
        assert_eq!(err.status(), Some(401));
        assert_eq!(FetchError::MissingData.status(), None);
    }
}
