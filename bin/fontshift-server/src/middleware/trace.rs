use std::time::Instant;

use axum::body::Body;
use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

pub static X_TRACE_ID: &str = "x-trace-id";

/// Wraps each request in an `http_request` span keyed by a trace id, taken
/// from the incoming `x-trace-id` header when it is a UUID, and echoes the id
/// on the response.
pub async fn trace_middleware(mut req: Request<Body>, next: Next) -> Response {
    let start_time = Instant::now();

    let trace_id = req
        .headers()
        .get(X_TRACE_ID)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4);
    let header_value = HeaderValue::try_from(trace_id.to_string()).ok();

    let span = info_span!(
        "http_request",
        trace_id = %trace_id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    async move {
        info!("→ request started");
        if let Some(value) = &header_value {
            req.headers_mut().insert(X_TRACE_ID, value.clone());
        }

        let mut response = next.run(req).await;

        if let Some(value) = header_value {
            response.headers_mut().insert(X_TRACE_ID, value);
        }
        info!(
            status = response.status().as_u16(),
            latency_ms = start_time.elapsed().as_millis(),
            "← response finished"
        );
        response
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod test {
    use axum::Router;
    use axum::http::StatusCode;
    use axum::routing::get;
    use tower::ServiceExt;

    use super::*;

    fn app() -> Router {
        Router::new()
            .route("/", get(|| async { StatusCode::NO_CONTENT }))
            .layer(axum::middleware::from_fn(trace_middleware))
    }

    async fn trace_id(req: Request<Body>) -> Option<String> {
        let resp = app().oneshot(req).await.unwrap();
        resp.headers()
            .get(X_TRACE_ID)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
    }

    #[tokio::test]
    async fn incoming_uuid_is_echoed() {
        let id = "6f1c1b8e-4d1a-4c3e-9f57-2b0a8d6e1f00";
        let req = axum::http::Request::builder()
            .uri("/")
            .header(X_TRACE_ID, id)
            .body(Body::empty())
            .unwrap();
        assert_eq!(trace_id(req).await.as_deref(), Some(id));
    }

    #[tokio::test]
    async fn malformed_id_is_replaced() {
        let req = axum::http::Request::builder()
            .uri("/")
            .header(X_TRACE_ID, "nope")
            .body(Body::empty())
            .unwrap();
        let id = trace_id(req).await.unwrap();
        assert!(Uuid::parse_str(&id).is_ok());
    }
}
