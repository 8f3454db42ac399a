//! Multipart upload intake.
//!
//! File parts are checked against the extension allow-list and the size limit
//! while the stream is read, so a disallowed or oversized upload is rejected
//! before any of it reaches negotiation.

use axum::extract::Multipart;
use fontshift_core::{BatchFile, FontFormat};
use tracing::debug;

use crate::error::ServerError;

const TARGET_FORMAT_FIELD: &str = "targetFormat";
const INVALID_EXTENSION: &str = "Invalid format. Only WOFF, WOFF2, TTF, OTF are supported.";

/// What to accept from one multipart body.
#[derive(Debug, Clone, Copy)]
pub struct UploadLimits {
    /// Name of the part carrying files (`font` or `fonts`).
    pub file_field: &'static str,
    pub max_files: usize,
    pub max_file_bytes: usize,
}

#[derive(Debug, Default)]
pub struct Upload {
    pub files: Vec<BatchFile>,
    /// Raw `targetFormat` value, if the form carried one.
    pub target_format: Option<String>,
}

/// Reads every part of `multipart`.
///
/// Parts with a file name must use `limits.file_field`; other text fields
/// than `targetFormat` are ignored.
pub async fn read(multipart: &mut Multipart, limits: UploadLimits) -> Result<Upload, ServerError> {
    let mut upload = Upload::default();

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(format!("Failed to read multipart field: {e}")))?
    {
        let field_name = field.name().unwrap_or_default().to_owned();

        let Some(file_name) = field.file_name().map(str::to_owned) else {
            if field_name == TARGET_FORMAT_FIELD {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ServerError::BadRequest(format!("Failed to read {field_name}: {e}")))?;
                upload.target_format = Some(value);
            }
            continue;
        };

        if field_name != limits.file_field {
            return Err(ServerError::BadRequest(format!("Unexpected file field: {field_name}")));
        }
        if FontFormat::from_file_name(&file_name).is_none() {
            return Err(ServerError::BadRequest(INVALID_EXTENSION.to_owned()));
        }
        if upload.files.len() >= limits.max_files {
            return Err(ServerError::BadRequest(format!(
                "Too many files: at most {} per request",
                limits.max_files
            )));
        }

        let mut data = Vec::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| ServerError::BadRequest(format!("Failed to read file chunk: {e}")))?
        {
            data.extend_from_slice(&chunk);
            if data.len() > limits.max_file_bytes {
                return Err(ServerError::BadRequest(format!(
                    "File too large: {file_name} exceeds the limit of {} bytes",
                    limits.max_file_bytes
                )));
            }
        }

        debug!(file_name = %file_name, size_bytes = data.len(), "received font upload");
        upload.files.push(BatchFile {
            filename: file_name,
            data,
        });
    }

    Ok(upload)
}
