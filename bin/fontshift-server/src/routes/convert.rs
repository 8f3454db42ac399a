//! Single-file conversion (`POST /api/convert`).

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::extract::{Multipart, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use axum::routing::post;
use fontshift_core::{ConversionResult, Negotiator};
use tracing::{debug, info};
use utoipa::OpenApi;

use crate::error::ServerError;
use crate::schemas::{ConvertUpload, ErrorResponse};
use crate::state::AppState;
use crate::upload::{self, UploadLimits};

pub const X_FONT_CONVERTED: &str = "x-font-converted";
pub const X_FONT_INPUT_FORMAT: &str = "x-font-input-format";

#[derive(OpenApi)]
#[openapi(paths(convert), components(schemas(ConvertUpload, ErrorResponse)))]
pub struct ConvertApi;

/// Register the conversion route.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/convert", post(convert))
}

/// Convert one font to `targetFormat`.
///
/// The response body is the font itself. An upload already in the requested
/// format (or a bare SFNT asked for as `ttf`/`otf`) comes back unchanged with
/// `x-font-converted: false`.
#[utoipa::path(
    post,
    path = "/api/convert",
    tag = "convert",
    request_body(content = ConvertUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Converted font; Content-Type follows the target format",
            headers(
                ("x-font-converted" = bool, description = "Whether the font was re-encoded"),
                ("x-font-input-format" = String, description = "Detected format of the upload"),
            )),
        (status = 400, description = "Missing or invalid upload, unknown target format, or undetectable font", body = ErrorResponse),
        (status = 500, description = "Conversion failed", body = ErrorResponse),
    )
)]
pub async fn convert(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Response, ServerError> {
    let limits = UploadLimits {
        file_field: "font",
        max_files: 1,
        max_file_bytes: state.config.max_upload_bytes,
    };
    let upload = upload::read(&mut multipart, limits).await?;

    let Some(file) = upload.files.into_iter().next() else {
        return Err(ServerError::BadRequest("No font file uploaded".to_owned()));
    };
    let target = Negotiator::parse_target(upload.target_format.as_deref().unwrap_or_default())?;
    debug!(filename = %file.filename, size_bytes = file.data.len(), %target, "convert request");

    let negotiator = Arc::clone(&state.negotiator);
    let result = tokio::task::spawn_blocking(move || negotiator.negotiate_format(file.data, target))
        .await
        .map_err(|e| ServerError::ConversionFailed(format!("conversion task failed: {e}")))??;

    info!(
        input = %result.input_format(),
        output = %result.output_format,
        converted = result.converted(),
        "convert request finished"
    );
    font_response(result)
}

fn font_response(result: ConversionResult) -> Result<Response, ServerError> {
    let converted = result.converted();
    let stem = if converted { "converted" } else { "font" };
    let format = result.output_format;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, format.mime_type())
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{stem}.{}\"", format.extension()),
        )
        .header(X_FONT_CONVERTED, converted.to_string())
        .header(X_FONT_INPUT_FORMAT, result.input_format().as_str())
        .body(Body::from(result.data))
        .map_err(|e| ServerError::Internal(format!("failed to build response: {e}")))
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use axum::http::StatusCode;
    use fontshift_codec::{Container, detect};

    use super::*;
    use crate::config::Config;
    use crate::middleware::trace::X_TRACE_ID;
    use crate::routes::test_support::{Part, app, body_bytes, body_json, multipart, otf, send, ttf, woff};

    async fn post(config: Config, parts: &[Part<'_>]) -> Response {
        send(app(config), multipart("/api/convert", parts)).await
    }

    fn font<'a>(filename: &'a str, data: &'a [u8]) -> Part<'a> {
        Part::File {
            field: "font",
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

    fn header_str<'a>(resp: &'a Response, name: &str) -> &'a str {
        resp.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn woff_to_woff2_is_converted() {
        let data = woff();
        let resp = post(Config::default(), &[font("a.woff", &data), target("woff2")]).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(header_str(&resp, "content-type"), "font/woff2");
        assert_eq!(
            header_str(&resp, "content-disposition"),
            "attachment; filename=\"converted.woff2\""
        );
        assert_eq!(header_str(&resp, X_FONT_CONVERTED), "true");
        assert_eq!(header_str(&resp, X_FONT_INPUT_FORMAT), "woff");
        assert!(!header_str(&resp, X_TRACE_ID).is_empty());

        let body = body_bytes(resp).await;
        assert_eq!(detect(&body).unwrap(), Container::Woff2);
    }

    #[tokio::test]
    async fn same_format_is_returned_untouched() {
        let data = ttf();
        let resp = post(Config::default(), &[font("a.ttf", &data), target("TTF")]).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(header_str(&resp, X_FONT_CONVERTED), "false");
        assert_eq!(
            header_str(&resp, "content-disposition"),
            "attachment; filename=\"font.ttf\""
        );
        assert_eq!(body_bytes(resp).await, data);
    }

    #[tokio::test]
    async fn cff_font_is_labelled_otf() {
        let data = otf();
        let resp = post(Config::default(), &[font("a.otf", &data), target("ttf")]).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(header_str(&resp, X_FONT_CONVERTED), "false");
        assert_eq!(header_str(&resp, X_FONT_INPUT_FORMAT), "otf");
        assert_eq!(body_bytes(resp).await, data);
    }

    #[tokio::test]
    async fn target_may_precede_the_file() {
        let data = ttf();
        let resp = post(Config::default(), &[target("woff"), font("a.ttf", &data)]).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(header_str(&resp, "content-type"), "font/woff");
    }

    #[tokio::test]
    async fn missing_file_is_rejected() {
        let resp = post(Config::default(), &[target("woff")]).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["error"], "No font file uploaded");
    }

    #[tokio::test]
    async fn disallowed_extension_is_rejected() {
        let resp = post(Config::default(), &[font("notes.txt", b"hello"), target("woff")]).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(resp).await["error"],
            "Invalid format. Only WOFF, WOFF2, TTF, OTF are supported."
        );
    }

    #[tokio::test]
    async fn unknown_target_lists_supported_formats() {
        let data = ttf();
        let resp = post(Config::default(), &[font("a.ttf", &data), target("eot")]).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        assert_eq!(body["error"], "Invalid target format");
        assert_eq!(
            body["supportedFormats"],
            serde_json::json!(["woff", "woff2", "ttf", "otf"])
        );
    }

    #[tokio::test]
    async fn missing_target_is_invalid() {
        let data = ttf();
        let resp = post(Config::default(), &[font("a.ttf", &data)]).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["error"], "Invalid target format");
    }

    #[tokio::test]
    async fn unrecognised_bytes_fail_detection() {
        let resp = post(Config::default(), &[font("a.ttf", b"GIF89a not a font"), target("woff")]).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["error"], "Could not detect font format");
    }

    #[tokio::test]
    async fn corrupt_woff_fails_conversion() {
        let mut data = woff();
        data.truncate(60);
        let resp = post(Config::default(), &[font("a.woff", &data), target("ttf")]).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(resp).await;
        assert_eq!(body["error"], "Conversion failed");
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn oversized_upload_is_rejected() {
        let config = Config {
            max_upload_bytes: 16,
            ..Config::default()
        };
        let data = ttf();
        let resp = post(config, &[font("a.ttf", &data), target("woff")]).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn second_file_is_rejected() {
        let data = ttf();
        let resp = post(
            Config::default(),
            &[font("a.ttf", &data), font("b.ttf", &data), target("woff")],
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unexpected_file_field_is_rejected() {
        let data = ttf();
        let parts = [
            Part::File {
                field: "fonts",
                filename: "a.ttf",
                data: &data,
            },
            target("woff"),
        ];
        let resp = post(Config::default(), &parts).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
