//! Maps the domain-layer [`BecknError`] onto the wire. Every adapter in
//! this workspace turns its own error enum into an HTTP response at this
//! boundary and nowhere else.
//!
//! Two shapes exist because the protocol itself uses two response
//! conventions: `action`/`on_action` endpoints always answer `HTTP 200`
//! with an `{ack, error?}` body (§7 — the ack *is* the error channel),
//! while registry/admin endpoints answer with a real status code and a
//! bare `{type, code, message}` body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use beckn_types::{AckResponse, BecknError, ErrorKind};

/// Registry/admin-style error response: a real HTTP status derived from
/// the error kind, body is the bare wire error.
pub struct ApiError(pub BecknError);

impl From<BecknError> for ApiError {
    fn from(err: BecknError) -> Self {
        Self(err)
    }
}

fn status_for(err: &BecknError) -> StatusCode {
    match err.kind {
        ErrorKind::Context if err.code == beckn_types::codes::CONTEXT_SIGNATURE_INVALID => StatusCode::UNAUTHORIZED,
        ErrorKind::Context => StatusCode::BAD_REQUEST,
        ErrorKind::Domain => StatusCode::NOT_FOUND,
        ErrorKind::Policy if err.code == beckn_types::codes::POLICY_UNAUTHORIZED => StatusCode::UNAUTHORIZED,
        ErrorKind::Policy if err.code == beckn_types::codes::POLICY_RATE_LIMITED => StatusCode::TOO_MANY_REQUESTS,
        ErrorKind::Policy => StatusCode::FORBIDDEN,
        ErrorKind::Business => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::Technical if err.code == beckn_types::codes::TECHNICAL_UPSTREAM_TIMEOUT => StatusCode::BAD_GATEWAY,
        ErrorKind::Technical => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (status_for(&self.0), Json(self.0.to_wire())).into_response()
    }
}

/// The protocol's `action`/`on_action` response: always `200 OK`, the
/// outcome carried entirely in the body (§7).
pub fn ack_response(result: Result<(), BecknError>) -> (StatusCode, Json<AckResponse>) {
    match result {
        Ok(()) => (StatusCode::OK, Json(AckResponse::ack())),
        Err(err) => (StatusCode::OK, Json(AckResponse::nack(err.to_wire()))),
    }
}
