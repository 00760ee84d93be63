//! Common middleware stack: tracing, timeout, body limit, CORS. No
//! rate-limiter/IP whitelist/circuit-breaker layer — the subset every
//! Beckn service actually needs.

use std::time::Duration;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// 1 MiB: comfortably above any realistic catalog/order payload, well
/// below what a misbehaving peer could use to exhaust memory.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Applies the standard layer order: `Trace -> Timeout -> BodyLimit ->
/// Cors -> Handler`, request timeout defaulting to `MAX_RESPONSE_TIME_MS`
/// (§6, 30s).
pub fn apply(router: Router, request_timeout: Duration) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(request_timeout))
            .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
            .layer(CorsLayer::permissive()),
    )
}
