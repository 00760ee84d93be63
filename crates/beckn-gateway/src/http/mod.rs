//! `POST /search`, `POST /on_search` (§4.5), wired the same one-`AppState`,
//! one-router-chain way `beckn_registry::http` assembles its surface.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use beckn_context::{validate, MessageDedup};
use beckn_crypto::auth_header::verify_auth_header;
use beckn_registry::{apply_filter, LookupCache, LookupFilter, SubscriberRepository};
use beckn_types::{codes, AckResponse, BecknError, Envelope, Subscriber};
use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::domain::{envelope_for_bpp, matching_bpps};
use crate::worker::{deadline_from_ttl, FanoutJob, GatewayIdentity};

pub struct GatewayState {
    pub repo: Arc<dyn SubscriberRepository>,
    pub cache: LookupCache,
    pub dedup: MessageDedup,
    pub identity: Arc<GatewayIdentity>,
    pub job_tx: mpsc::Sender<FanoutJob>,
    pub request_timeout: Duration,
}

pub fn router(state: Arc<GatewayState>, request_timeout: Duration) -> Router {
    let router = Router::new()
        .route("/search", post(search_handler))
        .route("/on_search", post(on_search_handler))
        .route("/healthz", axum::routing::get(beckn_http::healthz))
        .with_state(state);
    beckn_http::middleware::apply(router, request_timeout)
}

async fn resolve_subscriber(state: &GatewayState, subscriber_id: &str) -> Result<Subscriber, BecknError> {
    let filter = LookupFilter { subscriber_id: Some(subscriber_id.to_string()), r#type: None, domain: None, city: None };
    let matches = if let Some(cached) = state.cache.get(&filter.cache_key()) {
        cached
    } else {
        let subscribers = state.repo.list().await.map_err(|e| BecknError::technical(codes::TECHNICAL_DATABASE, e.to_string()))?;
        let extensions = state
            .repo
            .list_domain_extensions()
            .await
            .map_err(|e| BecknError::technical(codes::TECHNICAL_DATABASE, e.to_string()))?;
        let matches = apply_filter(&subscribers, &extensions, &filter, Utc::now());
        state.cache.put(filter.cache_key(), matches.clone());
        matches
    };
    matches
        .into_iter()
        .next()
        .ok_or_else(|| BecknError::domain(codes::DOMAIN_UNKNOWN_PROVIDER, format!("no subscribed participant '{subscriber_id}'")))
}

async fn authenticate(state: &GatewayState, headers: &HeaderMap, body: &serde_json::Value, sender_id: &str) -> Result<(), BecknError> {
    let header = headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| BecknError::context(codes::CONTEXT_MALFORMED, "missing Authorization header"))?;
    let sender = resolve_subscriber(state, sender_id).await?;
    verify_auth_header(header, body, &sender.signing_public_key)
}

async fn search_handler(
    State(state): State<Arc<GatewayState>>,
    headers: HeaderMap,
    Json(envelope): Json<Envelope>,
) -> (StatusCode, Json<AckResponse>) {
    let result = handle_search(&state, &headers, envelope).await;
    beckn_http::ack_response(result)
}

async fn handle_search(state: &Arc<GatewayState>, headers: &HeaderMap, envelope: Envelope) -> Result<(), BecknError> {
    let body = serde_json::to_value(&envelope).map_err(|e| BecknError::technical(codes::TECHNICAL_SERIALIZATION, e.to_string()))?;
    authenticate(state, headers, &body, &envelope.context.bap_id).await?;
    validate(&envelope.context)?;

    let is_first_sighting = state.dedup.check_and_record(envelope.context.message_id);
    if !is_first_sighting {
        info!(message_id = %envelope.context.message_id, "duplicate search suppressed, ACKed only");
        return Ok(());
    }

    let state = state.clone();
    tokio::spawn(async move {
        if let Err(e) = fan_out(&state, envelope).await {
            warn!(error = %e, "search fan-out failed before any BPP was queued");
        }
    });
    Ok(())
}

async fn fan_out(state: &GatewayState, envelope: Envelope) -> Result<(), BecknError> {
    let subscribers = state.repo.list().await.map_err(|e| BecknError::technical(codes::TECHNICAL_DATABASE, e.to_string()))?;
    let extensions = state
        .repo
        .list_domain_extensions()
        .await
        .map_err(|e| BecknError::technical(codes::TECHNICAL_DATABASE, e.to_string()))?;
    let bpps = matching_bpps(&subscribers, &extensions, &envelope.context);
    let deadline = deadline_from_ttl(envelope.context.ttl.as_deref(), state.request_timeout);

    for bpp in bpps {
        let job = FanoutJob { target_url: format!("{}/search", bpp.subscriber_url), envelope: envelope_for_bpp(&envelope), deadline };
        if state.job_tx.send(job).await.is_err() {
            warn!(bpp = %bpp.subscriber_id, "fan-out worker pool is gone, dropping job");
        }
    }
    Ok(())
}

async fn on_search_handler(
    State(state): State<Arc<GatewayState>>,
    headers: HeaderMap,
    Json(envelope): Json<Envelope>,
) -> (StatusCode, Json<AckResponse>) {
    let result = handle_on_search(&state, &headers, envelope).await;
    beckn_http::ack_response(result)
}

async fn handle_on_search(state: &Arc<GatewayState>, headers: &HeaderMap, envelope: Envelope) -> Result<(), BecknError> {
    let body = serde_json::to_value(&envelope).map_err(|e| BecknError::technical(codes::TECHNICAL_SERIALIZATION, e.to_string()))?;
    let bpp_id = envelope
        .context
        .bpp_id
        .clone()
        .ok_or_else(|| BecknError::context(codes::CONTEXT_MISSING_COUNTERPARTY, "on_search requires bpp_id"))?;
    authenticate(state, headers, &body, &bpp_id).await?;
    validate(&envelope.context)?;

    if !state.dedup.check_and_record(envelope.context.message_id) {
        info!(message_id = %envelope.context.message_id, "duplicate on_search suppressed, ACKed only");
        return Ok(());
    }

    let bap = resolve_subscriber(state, &envelope.context.bap_id).await?;
    let deadline = deadline_from_ttl(envelope.context.ttl.as_deref(), state.request_timeout);
    let job = FanoutJob { target_url: format!("{}/on_search", bap.subscriber_url), envelope, deadline };
    if state.job_tx.send(job).await.is_err() {
        warn!(bap = %bap.subscriber_id, "fan-out worker pool is gone, dropping on_search forward");
    }
    Ok(())
}
