use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub type ApiResult<T> = Result<T, AppError>;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl ErrorBody {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code_for(status),
                message: message.into(),
            },
        }
    }

    pub fn from_error(err: &AppError) -> Self {
        Self::new(status_for(err), err.message())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (status_for(&self), Json(ErrorBody::from_error(&self))).into_response()
    }
}

pub fn status_for(err: &AppError) -> StatusCode {
    match err {
        AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        AppError::NotFound(_) => StatusCode::NOT_FOUND,
        AppError::Conflict(_) => StatusCode::CONFLICT,
        AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// `401 Unauthorized` -> `UNAUTHORIZED`.
pub fn code_for(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("Error")
        .to_ascii_uppercase()
        .replace([' ', '-'], "_")
}

#[cfg(test)]
mod tests {
    use axum::{body::to_bytes, http::StatusCode, response::IntoResponse};

    use crate::error::AppError;

    use super::{ErrorBody, code_for, status_for};

    #[test]
    fn every_variant_maps_to_its_status() {
        let cases = [
            (AppError::bad_request("x"), StatusCode::BAD_REQUEST),
            (AppError::unauthorized("x"), StatusCode::UNAUTHORIZED),
            (AppError::not_found("x"), StatusCode::NOT_FOUND),
            (AppError::conflict("x"), StatusCode::CONFLICT),
            (AppError::internal("x"), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(status_for(&err), status, "{err:?}");
        }
    }

    #[test]
    fn codes_follow_reason_phrases() {
        assert_eq!(code_for(StatusCode::UNAUTHORIZED), "UNAUTHORIZED");
        assert_eq!(code_for(StatusCode::BAD_REQUEST), "BAD_REQUEST");
        assert_eq!(
            code_for(StatusCode::INTERNAL_SERVER_ERROR),
            "INTERNAL_SERVER_ERROR"
        );
        assert_eq!(code_for(StatusCode::SERVICE_UNAVAILABLE), "SERVICE_UNAVAILABLE");
    }

    #[tokio::test]
    async fn error_renders_nested_body() {
        let response = AppError::unauthorized("Invalid credentials").into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let body: ErrorBody = serde_json::from_slice(&bytes).expect("json body");
        assert_eq!(body.error.code, "UNAUTHORIZED");
        assert_eq!(body.error.message, "Invalid credentials");
    }
}
