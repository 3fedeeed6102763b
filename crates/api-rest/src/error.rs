//! API error types with structured JSON responses.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use medirank_core::TriageError;
use serde::Serialize;
use utoipa::ToSchema;

/// Error response body.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("{0}")]
    TooManyCandidates(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Ranking oracle failed: {0}")]
    OracleFailed(String),
    #[error("Ranking oracle timed out: {0}")]
    OracleTimeout(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::BadRequest(detail) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail),
            ApiError::TooManyCandidates(detail) => {
                (StatusCode::BAD_REQUEST, "TOO_MANY_CANDIDATES", detail)
            }
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, "NOT_FOUND", detail),
            ApiError::OracleFailed(detail) => {
                tracing::error!(%detail, "ranking oracle failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "ORACLE_ERROR",
                    "The ranking oracle failed to produce a ranking".to_string(),
                )
            }
            ApiError::OracleTimeout(detail) => {
                tracing::error!(%detail, "ranking oracle timed out");
                (
                    StatusCode::GATEWAY_TIMEOUT,
                    "ORACLE_TIMEOUT",
                    "The ranking oracle did not respond in time".to_string(),
                )
            }
            ApiError::Internal(detail) => {
                tracing::error!(%detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };
        (status, Json(body)).into_response()
    }
}

impl From<TriageError> for ApiError {
    fn from(err: TriageError) -> Self {
        match err {
            TriageError::TooManyCandidates { .. } => ApiError::TooManyCandidates(err.to_string()),
            TriageError::NotFound(_) => ApiError::NotFound(err.to_string()),
            TriageError::OracleTimeout(_) => ApiError::OracleTimeout(err.to_string()),
            ref e if e.is_client_error() => ApiError::BadRequest(e.to_string()),
            ref e if e.is_oracle_error() => ApiError::OracleFailed(e.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use std::time::Duration;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_too_many_candidates_returns_400_naming_the_limit() {
        let err: ApiError = TriageError::TooManyCandidates { count: 101, max: 100 }.into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "TOO_MANY_CANDIDATES");
        assert!(json["error"]["message"].as_str().unwrap().contains("max 100"));
    }

    #[tokio::test]
    async fn test_not_found_returns_404() {
        let err: ApiError = TriageError::NotFound("ZZZZZ".into()).into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_invalid_input_returns_400() {
        let err: ApiError = TriageError::InvalidInput("gender must be one of ...".into()).into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_oracle_errors_map_to_gateway_statuses() {
        let err: ApiError = TriageError::OracleShapeMismatch {
            candidates: 3,
            labels: 2,
            scores: 2,
        }
        .into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "ORACLE_ERROR");

        let err: ApiError = TriageError::OracleTimeout(Duration::from_secs(30)).into();
        assert_eq!(err.into_response().status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[tokio::test]
    async fn test_empty_candidate_set_is_a_server_error() {
        let err: ApiError = TriageError::EmptyCandidateSet.into();
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_rule_format_is_internal_and_hides_detail() {
        let err: ApiError = TriageError::RuleFormat {
            range: "three-12".into(),
            reason: "lower bound is not an integer",
        }
        .into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"]["message"], "An internal error occurred");
    }
}
