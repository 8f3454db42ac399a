//! Batch conversion (`POST /api/batch-convert`).
//!
//! Every file is negotiated against the same target; a file that cannot be
//! detected or converted yields an `error` item without failing the request.

use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::routing::post;
use axum::{Json, Router};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use fontshift_core::{BatchOutcome, FontFormat, NegotiationError};
use tracing::info;
use utoipa::OpenApi;

use crate::error::ServerError;
use crate::schemas::{BatchFailure, BatchItem, BatchResponse, BatchSuccess, BatchUpload, ErrorResponse};
use crate::state::AppState;
use crate::upload::{self, UploadLimits};

#[derive(OpenApi)]
#[openapi(
    paths(batch_convert),
    components(schemas(BatchUpload, BatchResponse, BatchItem, BatchSuccess, BatchFailure, ErrorResponse, FontFormat))
)]
pub struct BatchApi;

/// Register the batch route.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/batch-convert", post(batch_convert))
}

/// Convert up to 50 fonts to one `targetFormat`.
///
/// Results come back in upload order with the output base64-encoded.
#[utoipa::path(
    post,
    path = "/api/batch-convert",
    tag = "convert",
    request_body(content = BatchUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Per-file results", body = BatchResponse),
        (status = 400, description = "No files, too many files, or unknown target format", body = ErrorResponse),
        (status = 500, description = "Batch conversion failed", body = ErrorResponse),
    )
)]
pub async fn batch_convert(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<BatchResponse>, ServerError> {
    let limit = state.config.max_batch_files;
    let limits = UploadLimits {
        file_field: "fonts",
        max_files: limit,
        max_file_bytes: state.config.max_upload_bytes,
    };
    let upload = upload::read(&mut multipart, limits).await?;
    if upload.files.is_empty() {
        return Err(ServerError::BadRequest("No font files uploaded".to_owned()));
    }
    let token = upload.target_format.unwrap_or_default();

    let negotiator = Arc::clone(&state.negotiator);
    let outcomes = tokio::task::spawn_blocking(move || negotiator.negotiate_batch(upload.files, &token, limit))
        .await
        .map_err(|e| ServerError::BatchFailed(format!("batch task failed: {e}")))??;

    let results: Vec<BatchItem> = outcomes.into_iter().map(batch_item).collect();
    let failed = results
        .iter()
        .filter(|item| matches!(item, BatchItem::Error(_)))
        .count();
    info!(total = results.len(), failed, "batch request finished");
    Ok(Json(BatchResponse { results }))
}

fn batch_item(outcome: BatchOutcome) -> BatchItem {
    match outcome.result {
        Ok(result) => BatchItem::Success(BatchSuccess {
            filename: outcome.filename,
            converted: result.converted(),
            input_format: result.input_format(),
            output_format: result.output_format,
            data: STANDARD.encode(&result.data),
        }),
        Err(NegotiationError::DetectionFailed(_)) => BatchItem::Error(BatchFailure {
            filename: outcome.filename,
            error: "Could not detect format".to_owned(),
        }),
        Err(err) => BatchItem::Error(BatchFailure {
            filename: outcome.filename,
            error: err.to_string(),
        }),
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use axum::http::StatusCode;
    use fontshift_codec::{Container, detect};

    use super::*;
    use crate::config::Config;
    use crate::routes::test_support::{Part, app, body_json, multipart, otf, send, ttf, woff};

    fn font<'a>(filename: &'a str, data: &'a [u8]) -> Part<'a> {
        Part::File {
            field: "fonts",
            filename,
            data,
        }
    }

    fn target(value: &str) -> Part<'_> {
        Part::Text {
            field: "targetFormat",
            value,
        }
    }

    async fn post(config: Config, parts: &[Part<'_>]) -> (StatusCode, serde_json::Value) {
        let resp = send(app(config), multipart("/api/batch-convert", parts)).await;
        let status = resp.status();
        (status, body_json(resp).await)
    }

    #[tokio::test]
    async fn mixed_batch_reports_each_file() {
        let (ttf, otf, woff) = (ttf(), otf(), woff());
        let (status, body) = post(
            Config::default(),
            &[
                target("woff2"),
                font("a.ttf", &ttf),
                font("b.woff", b"definitely not a font"),
                font("c.otf", &otf),
                font("d.woff", &woff),
            ],
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let results = body["results"].as_array().unwrap();
        assert_eq!(results.len(), 4);

        assert_eq!(results[0]["status"], "success");
        assert_eq!(results[0]["filename"], "a.ttf");
        assert_eq!(results[0]["converted"], true);
        assert_eq!(results[0]["inputFormat"], "ttf");
        assert_eq!(results[0]["outputFormat"], "woff2");
        let data = STANDARD.decode(results[0]["data"].as_str().unwrap()).unwrap();
        assert_eq!(detect(&data).unwrap(), Container::Woff2);

        assert_eq!(results[1]["status"], "error");
        assert_eq!(results[1]["filename"], "b.woff");
        assert_eq!(results[1]["error"], "Could not detect format");

        assert_eq!(results[2]["status"], "success");
        assert_eq!(results[2]["inputFormat"], "otf");
        assert_eq!(results[3]["inputFormat"], "woff");
    }

    #[tokio::test]
    async fn unchanged_files_keep_their_bytes() {
        let data = woff();
        let (status, body) = post(Config::default(), &[font("a.woff", &data), target("woff")]).await;
        assert_eq!(status, StatusCode::OK);
        let item = &body["results"][0];
        assert_eq!(item["converted"], false);
        assert_eq!(item["data"], STANDARD.encode(&data));
    }

    #[tokio::test]
    async fn no_files_is_rejected() {
        let (status, body) = post(Config::default(), &[target("woff")]).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No font files uploaded");
    }

    #[tokio::test]
    async fn unknown_target_is_rejected_for_the_whole_batch() {
        let data = ttf();
        let (status, body) = post(Config::default(), &[font("a.ttf", &data), target("svg")]).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid target format");
        assert!(body["supportedFormats"].is_array());
    }

    #[tokio::test]
    async fn too_many_files_is_rejected() {
        let config = Config {
            max_batch_files: 2,
            ..Config::default()
        };
        let data = ttf();
        let (status, _) = post(
            config,
            &[
                font("a.ttf", &data),
                font("b.ttf", &data),
                font("c.ttf", &data),
                target("woff"),
            ],
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn single_file_field_is_not_accepted() {
        let data = ttf();
        let parts = [
            Part::File {
                field: "font",
                filename: "a.ttf",
                data: &data,
            },
            target("woff"),
        ];
        let (status, _) = post(Config::default(), &parts).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
