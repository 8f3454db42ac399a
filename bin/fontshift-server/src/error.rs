//! Unified server error type.
//!
//! Every handler returns `Result<T, ServerError>`, which implements
//! [`axum::response::IntoResponse`] so errors become a JSON body with the
//! matching status code. Internal errors are logged in full and reported to
//! the caller with a generic message.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use fontshift_core::{FontFormat, NegotiationError};
use thiserror::Error;
use tracing::{error, warn};

use crate::schemas::ErrorResponse;

#[derive(Debug, Error)]
pub enum ServerError {
    /// Missing, disallowed or oversized upload, or an unreadable form.
    #[error("{0}")]
    BadRequest(String),

    #[error("Invalid target format")]
    InvalidTargetFormat,

    #[error("Could not detect font format")]
    DetectionFailed,

    /// The converter failed; the message is passed through to the caller.
    #[error("Conversion failed: {0}")]
    ConversionFailed(String),

    #[error("Batch conversion failed: {0}")]
    BatchFailed(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<NegotiationError> for ServerError {
    fn from(e: NegotiationError) -> Self {
        match e {
            NegotiationError::InvalidTargetFormat(_) => ServerError::InvalidTargetFormat,
            NegotiationError::DetectionFailed(_) => ServerError::DetectionFailed,
            NegotiationError::ConversionFailed(source) => ServerError::ConversionFailed(source.to_string()),
            e @ NegotiationError::TooManyFiles { .. } => ServerError::BadRequest(e.to_string()),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ServerError::BadRequest(m) => {
                warn!(message = %m, "rejected request");
                (StatusCode::BAD_REQUEST, ErrorResponse::new(m))
            }
            ServerError::InvalidTargetFormat => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    supported_formats: Some(FontFormat::supported()),
                    ..ErrorResponse::new("Invalid target format")
                },
            ),
            ServerError::DetectionFailed => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("Could not detect font format"),
            ),
            ServerError::ConversionFailed(m) => {
                error!(message = %m, "conversion failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::with_message("Conversion failed", m),
                )
            }
            ServerError::BatchFailed(m) => {
                error!(message = %m, "batch conversion failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::with_message("Batch conversion failed", m),
                )
            }
            ServerError::Internal(m) => {
                error!(message = %m, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("internal server error"),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod test {
    use fontshift_core::ConverterError;

    use super::*;

    #[test]
    fn negotiation_errors_map_to_http_classes() {
        let cases = [
            (NegotiationError::InvalidTargetFormat("eot".into()), StatusCode::BAD_REQUEST),
            (
                NegotiationError::DetectionFailed(ConverterError::Other("x".into())),
                StatusCode::BAD_REQUEST,
            ),
            (
                NegotiationError::ConversionFailed(ConverterError::Other("x".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                NegotiationError::TooManyFiles { count: 3, limit: 2 },
                StatusCode::BAD_REQUEST,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ServerError::from(err).into_response().status(), status);
        }
    }

    #[test]
    fn conversion_message_is_passed_through() {
        let err = ServerError::from(NegotiationError::ConversionFailed(ConverterError::Other(
            "bad checksum".into(),
        )));
        assert!(matches!(&err, ServerError::ConversionFailed(m) if m == "bad checksum"));
    }
}
