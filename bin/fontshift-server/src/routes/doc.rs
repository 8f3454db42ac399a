use utoipa::OpenApi;

use crate::routes::batch::BatchApi;
use crate::routes::convert::ConvertApi;
use crate::routes::health::HealthApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "fontshift-server",
        description = "Font format conversion API (WOFF, WOFF2, TTF, OTF)",
        version = "0.1.0"
    ),
    tags(
        (name = "health", description = "Liveness"),
        (name = "convert", description = "Font conversion")
    )
)]
pub struct ApiDoc;

pub fn get_docs() -> utoipa::openapi::OpenApi {
    let mut root = ApiDoc::openapi();
    root.merge(HealthApi::openapi());
    root.merge(ConvertApi::openapi());
    root.merge(BatchApi::openapi());
    root
}

#[cfg(test)]
mod test {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};

    use super::*;
    use crate::config::Config;
    use crate::routes::test_support::{app, body_json, send};

    #[test]
    fn document_lists_every_route() {
        let doc = get_docs();
        for path in ["/api/health", "/api/convert", "/api/batch-convert"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn format_schema_lists_every_token() {
        let doc = serde_json::to_value(get_docs()).unwrap();
        assert_eq!(
            doc["components"]["schemas"]["FontFormat"]["enum"],
            serde_json::json!(["woff", "woff2", "ttf", "otf"])
        );
    }

    #[tokio::test]
    async fn swagger_follows_config() {
        let req = || Request::get("/api-docs/openapi.json").body(Body::empty()).unwrap();

        let resp = send(app(Config::default()), req()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["info"]["title"], "fontshift-server");

        let config = Config {
            enable_swagger: false,
            ..Config::default()
        };
        let resp = send(app(config), req()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
