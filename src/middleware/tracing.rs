use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{info, info_span, warn, Instrument};

/// Wrap each request in an `http_request` span and log its outcome.
pub async fn observability_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start_time = Instant::now();

    // Extract route pattern if available
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str())
        .unwrap_or("unknown")
        .to_string();

    let user_agent = request
        .headers()
        .get("user-agent")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let tracing_span = info_span!(
        "http_request",
        method = %method,
        uri = %uri,
        route = %route,
        request_id = %uuid::Uuid::now_v7(),
    );

    let response = next.run(request).instrument(tracing_span.clone()).await;

    let duration = start_time.elapsed();
    let status_code = response.status().as_u16();
    let _guard = tracing_span.enter();
    if status_code >= 500 {
        warn!(
            status = status_code,
            duration_ms = duration.as_millis() as u64,
            user_agent = %user_agent,
            "Request failed"
        );
    } else {
        info!(
            status = status_code,
            duration_ms = duration.as_millis() as u64,
            "Request completed"
        );
    }

    response
}
