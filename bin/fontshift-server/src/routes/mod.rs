//! Axum router construction.
//!
//! [`build`] assembles the complete application router, including:
//! - Middleware layers (CORS, per-request trace-ID injection)
//! - Optional Swagger UI / OpenAPI document (disable with `FONTSHIFT_ENABLE_SWAGGER=false`)
//! - `/api` routes: health, single conversion and batch conversion

mod batch;
mod convert;
pub mod doc;
mod health;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use tower::ServiceBuilder;
use utoipa_swagger_ui::SwaggerUi;

use crate::middleware::{cors, trace};
use crate::state::AppState;

/// Headroom on top of the file payload for multipart boundaries and text fields.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

// ── Router builder ────────────────────────────────────────────────────────────

/// Build the complete Axum [`Router`] for the application.
pub fn build(state: Arc<AppState>) -> Router {
    let api_router = Router::new()
        .merge(health::router())
        .merge(convert::router())
        .merge(batch::router());

    let mut app = Router::new().nest("/api", api_router);

    if state.config.enable_swagger {
        app = app.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", doc::get_docs()));
    }

    app.layer(DefaultBodyLimit::max(body_limit(&state)))
        .layer(ServiceBuilder::new().layer(cors::cors_layer(&state)))
        .layer(middleware::from_fn(trace::trace_middleware))
        .with_state(state)
}

/// The whole-body cap: every file of a full batch at its size limit.
fn body_limit(state: &AppState) -> usize {
    state
        .config
        .max_upload_bytes
        .saturating_mul(state.config.max_batch_files)
        .saturating_add(FORM_OVERHEAD_BYTES)
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Helpers for driving the router in-process.

    use axum::body::Body;
    use axum::http::{Request, Response, header};
    use fontshift_codec::sfnt::{self, Font};
    use fontshift_codec::{Container, Tag};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use fontshift_core::Negotiator;

    const BOUNDARY: &str = "fontshift-test-boundary";

    pub enum Part<'a> {
        File {
            field: &'a str,
            filename: &'a str,
            data: &'a [u8],
        },
        Text {
            field: &'a str,
            value: &'a str,
        },
    }

    pub fn app(config: Config) -> Router {
        build(Arc::new(AppState::new(config, Negotiator::default())))
    }

    pub fn multipart(uri: &str, parts: &[Part<'_>]) -> Request<Body> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                Part::File {
                    field,
                    filename,
                    data,
                } => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
                             Content-Type: application/octet-stream\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(data);
                }
                Part::Text { field, value } => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{field}\"\r\n\r\n{value}").as_bytes(),
                    );
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    pub async fn send(app: Router, req: Request<Body>) -> Response<Body> {
        app.oneshot(req).await.unwrap()
    }

    pub async fn body_bytes(resp: Response<Body>) -> Vec<u8> {
        resp.into_body().collect().await.unwrap().to_bytes().to_vec()
    }

    pub async fn body_json(resp: Response<Body>) -> serde_json::Value {
        serde_json::from_slice(&body_bytes(resp).await).unwrap()
    }

    fn head() -> Vec<u8> {
        let mut head = vec![0u8; 54];
        head[0..4].copy_from_slice(&0x0001_0000u32.to_be_bytes());
        head[4..8].copy_from_slice(&0x0001_8000u32.to_be_bytes());
        head[12..16].copy_from_slice(&0x5F0F_3CF5u32.to_be_bytes());
        head[18..20].copy_from_slice(&1000u16.to_be_bytes());
        head
    }

    fn font(sfnt_version: u32, outlines: (&[u8; 4], Vec<u8>)) -> Vec<u8> {
        let mut font = Font::new(sfnt_version);
        font.push_table(Tag(*outlines.0), outlines.1);
        font.push_table(Tag::HEAD, head());
        font.push_table(Tag(*b"name"), b"fontshift".to_vec());
        font.to_sfnt()
    }

    /// A minimal CFF-flavoured font.
    pub fn otf() -> Vec<u8> {
        font(sfnt::CFF_VERSION, (b"CFF ", vec![1, 0, 4, 1, 0, 0, 0, 0]))
    }

    /// A minimal TrueType-flavoured font with no outlines, so every
    /// container round-trips without table transforms.
    pub fn ttf() -> Vec<u8> {
        font(sfnt::TRUETYPE_VERSION, (b"post", vec![0, 3, 0, 0]))
    }

    pub fn woff() -> Vec<u8> {
        fontshift_codec::convert(&ttf(), Container::Woff).unwrap()
    }
}
