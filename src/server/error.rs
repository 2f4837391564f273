//! Error-to-HTTP response conversion.
//!
//! Route handlers return `Result<T, AppError>`; every [`matserve_common::Error`]
//! converts into one.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use matserve_common::Error;
use serde_json::json;

/// Wrapper so we can implement `IntoResponse` for an external type.
#[derive(Debug)]
pub struct AppError(pub Error);

impl From<Error> for AppError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(status = %status, error = %self.0, "Server error in image handler");
        } else {
            tracing::debug!(status = %status, error = %self.0, "Request failed");
        }

        // Unsupported formats are answered without a body or content type.
        if matches!(self.0, Error::UnsupportedFormat(_)) {
            return status.into_response();
        }

        let body = json!({
            "error": self.0.to_string(),
            "code": self.0.code(),
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header;

    #[test]
    fn configuration_produces_400() {
        let response = AppError(Error::configuration("no container")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unavailable_produces_503() {
        let response = AppError(Error::unavailable("http://x", "timed out")).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn decode_produces_502_json() {
        let response = AppError(Error::decode("garbage")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[test]
    fn unsupported_format_is_content_less() {
        let response = AppError(Error::unsupported_format("bmp")).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().get(header::CONTENT_TYPE).is_none());
    }
}
