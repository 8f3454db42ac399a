//! Request and response bodies shared by the routes and the OpenAPI document.

use fontshift_core::FontFormat;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supported_formats: Option<Vec<FontFormat>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            supported_formats: None,
            message: None,
        }
    }

    pub fn with_message(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::new(error)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub supported_formats: Vec<FontFormat>,
    pub version: String,
}

/// `multipart/form-data` body of `POST /api/convert`.
#[allow(dead_code)]
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConvertUpload {
    /// `.woff`, `.woff2`, `.ttf` or `.otf` file.
    #[schema(value_type = String, format = Binary)]
    pub font: Vec<u8>,
    /// One of `woff`, `woff2`, `ttf`, `otf` (case-insensitive).
    pub target_format: String,
}

/// `multipart/form-data` body of `POST /api/batch-convert`.
#[allow(dead_code)]
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpload {
    /// Up to 50 font files, each sent as a `fonts` part.
    #[schema(value_type = Vec<String>)]
    pub fonts: Vec<Vec<u8>>,
    pub target_format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchSuccess {
    pub filename: String,
    pub converted: bool,
    pub input_format: FontFormat,
    pub output_format: FontFormat,
    /// Output font, base64-encoded.
    pub data: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BatchFailure {
    pub filename: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum BatchItem {
    Success(BatchSuccess),
    Error(BatchFailure),
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BatchResponse {
    pub results: Vec<BatchItem>,
}
