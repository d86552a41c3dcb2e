//! HTTP error responses for the cryptotrack server.
//!
//! Maps the unified market-data error onto status codes and a JSON body of
//! the form `{"error": CODE, "message": text}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cryptotrack_core::Error;
use serde::Serialize;

/// Error returned by API handlers.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub Error);

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'static str,
    message: &'a str,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match &self.0 {
            Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::UpstreamRateLimited(_) | Error::UpstreamUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Error::UpstreamError(_) => StatusCode::BAD_GATEWAY,
            Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::warn!(code = self.0.code(), "request failed: {}", self.0);
        }
        let body = ErrorBody { error: self.0.code(), message: self.0.message() };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (Error::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (Error::NotFound("x".into()), StatusCode::NOT_FOUND),
            (Error::UpstreamRateLimited("x".into()), StatusCode::SERVICE_UNAVAILABLE),
            (Error::UpstreamUnavailable("x".into()), StatusCode::SERVICE_UNAVAILABLE),
            (Error::UpstreamError("x".into()), StatusCode::BAD_GATEWAY),
            (Error::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError(err).status_code(), status);
        }
    }

    #[test]
    fn test_into_response_status() {
        let response = ApiError(Error::NotFound("coin not found: nope".into())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
