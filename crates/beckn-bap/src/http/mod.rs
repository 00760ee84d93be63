//! `/api/*` outbound surface and `/on_*` inbound callback router (§4.6),
//! wired the same one-`AppState`, one-router-chain way
//! `beckn_gateway::http` and `beckn_registry::http` assemble theirs.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use beckn_context::{validate, MessageDedup};
use beckn_crypto::auth_header::verify_auth_header;
use beckn_net::webhook::WebhookRegistration;
use beckn_net::{HttpDispatcher, WebhookRegistry};
use beckn_txlog::TransactionLogRepository;
use beckn_types::{codes, AckResponse, BecknError, Envelope, TransactionLogEntry, TransactionStatus};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::config::BapConfig;
use crate::domain::{
    dispatch_search, dispatch_to_bpp, ApiAckResponse, OrderStatusResponse, OutboundAction, OutboundApiRequest,
    ProjectionStore, SearchApiRequest, WebhookRegistrationRequest,
};
use crate::ports::RegistryLookup;

pub struct BapState {
    pub config: Arc<BapConfig>,
    pub txlog: Arc<dyn TransactionLogRepository>,
    pub dispatcher: Arc<dyn HttpDispatcher>,
    pub registry: Arc<dyn RegistryLookup>,
    pub dedup: MessageDedup,
    pub webhooks: WebhookRegistry,
    pub projections: ProjectionStore,
}

const CALLBACK_ACTIONS: &[&str] =
    &["search", "select", "init", "confirm", "status", "track", "cancel", "update", "rating", "support", "issue"];

pub fn router(state: Arc<BapState>, request_timeout: Duration) -> Router {
    let mut router = Router::new()
        .route("/api/search", post(search_handler))
        .route("/api/webhooks", post(register_webhook_handler))
        .route("/api/orders/:transaction_id", get(order_status_handler))
        .route("/api/:action", post(outbound_action_handler))
        .route("/healthz", get(beckn_http::healthz));

    for action in CALLBACK_ACTIONS.iter().copied() {
        router = router.route(
            &format!("/on_{action}"),
            post(move |State(state): State<Arc<BapState>>, headers: HeaderMap, Json(envelope): Json<Envelope>| async move {
                callback_handler(state, headers, envelope, action).await
            }),
        );
    }

    let router = router.with_state(state);
    beckn_http::middleware::apply(router, request_timeout)
}

fn parse_outbound_action(raw: &str) -> Option<OutboundAction> {
    match raw {
        "select" => Some(OutboundAction::Select),
        "init" => Some(OutboundAction::Init),
        "confirm" => Some(OutboundAction::Confirm),
        "status" => Some(OutboundAction::Status),
        "track" => Some(OutboundAction::Track),
        "cancel" => Some(OutboundAction::Cancel),
        "update" => Some(OutboundAction::Update),
        "rating" => Some(OutboundAction::Rating),
        "support" => Some(OutboundAction::Support),
        _ => None,
    }
}

async fn search_handler(
    State(state): State<Arc<BapState>>,
    Json(request): Json<SearchApiRequest>,
) -> Result<Json<ApiAckResponse>, beckn_http::ApiError> {
    let ack = dispatch_search(&state.config, &state.txlog, &state.dispatcher, request).await?;
    Ok(Json(ack))
}

async fn outbound_action_handler(
    State(state): State<Arc<BapState>>,
    Path(action): Path<String>,
    Json(request): Json<OutboundApiRequest>,
) -> Result<Json<ApiAckResponse>, beckn_http::ApiError> {
    let action = parse_outbound_action(&action)
        .ok_or_else(|| BecknError::context(codes::CONTEXT_MALFORMED, format!("unknown outbound action '{action}'")))?;
    let ack = dispatch_to_bpp(&state.config, &state.txlog, &state.dispatcher, action, request).await?;
    Ok(Json(ack))
}

async fn register_webhook_handler(
    State(state): State<Arc<BapState>>,
    Json(request): Json<WebhookRegistrationRequest>,
) -> StatusCode {
    let events = if request.events.is_empty() { vec!["*".to_string()] } else { request.events };
    state.webhooks.register(state.config.subscriber_id.clone(), WebhookRegistration { url: request.url, events });
    StatusCode::NO_CONTENT
}

async fn order_status_handler(
    State(state): State<Arc<BapState>>,
    Path(transaction_id): Path<String>,
) -> Result<Json<OrderStatusResponse>, beckn_http::ApiError> {
    let transaction_id = Uuid::parse_str(&transaction_id)
        .map_err(|_| BecknError::context(codes::CONTEXT_MALFORMED, "transaction_id is not a valid UUID"))?;
    let entries = state
        .txlog
        .list_by_transaction_id(transaction_id)
        .await
        .map_err(|e| BecknError::technical(codes::TECHNICAL_DATABASE, e.to_string()))?;
    let latest = entries
        .into_iter()
        .max_by_key(|e| e.created_at)
        .ok_or_else(|| BecknError::domain(codes::DOMAIN_UNKNOWN_PROVIDER, format!("no transaction '{transaction_id}'")))?;
    let callback_data = state.projections.get(&transaction_id).map(|p| p.body);
    Ok(Json(OrderStatusResponse { transaction_id, status: latest.status, callback_data }))
}

async fn authenticate(
    state: &BapState,
    headers: &HeaderMap,
    body: &serde_json::Value,
    sender_id: &str,
) -> Result<(), BecknError> {
    let header = headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| BecknError::context(codes::CONTEXT_MALFORMED, "missing Authorization header"))?;
    let public_key = state
        .registry
        .signing_public_key(sender_id)
        .await
        .map_err(BecknError::from)?
        .ok_or_else(|| BecknError::domain(codes::DOMAIN_UNKNOWN_PROVIDER, format!("no subscribed participant '{sender_id}'")))?;
    verify_auth_header(header, body, &public_key)
}

async fn callback_handler(
    state: Arc<BapState>,
    headers: HeaderMap,
    envelope: Envelope,
    action: &'static str,
) -> (StatusCode, Json<AckResponse>) {
    let event = format!("on_{action}");
    let result = handle_callback(&state, &event, &headers, envelope).await;
    beckn_http::ack_response(result)
}

async fn handle_callback(state: &BapState, event: &str, headers: &HeaderMap, envelope: Envelope) -> Result<(), BecknError> {
    let body = serde_json::to_value(&envelope).map_err(|e| BecknError::technical(codes::TECHNICAL_SERIALIZATION, e.to_string()))?;
    let bpp_id = envelope
        .context
        .bpp_id
        .clone()
        .ok_or_else(|| BecknError::context(codes::CONTEXT_MISSING_COUNTERPARTY, format!("{event} requires bpp_id")))?;
    authenticate(state, headers, &body, &bpp_id).await?;
    validate(&envelope.context)?;

    if !state.dedup.check_and_record(envelope.context.message_id) {
        info!(message_id = %envelope.context.message_id, event, "duplicate callback suppressed, ACKed only");
        return Ok(());
    }

    let entry = TransactionLogEntry {
        id: Uuid::new_v4(),
        transaction_id: envelope.context.transaction_id,
        message_id: envelope.context.message_id,
        action: envelope.context.action.clone(),
        bap_id: envelope.context.bap_id.clone(),
        bpp_id: Some(bpp_id),
        domain: envelope.context.domain.clone(),
        city: envelope.context.city.clone(),
        request_body: body.clone(),
        response_body: None,
        status: TransactionStatus::CallbackReceived,
        latency_ms: None,
        error: None,
        created_at: Utc::now(),
    };
    state.txlog.record(entry).await.map_err(|e| BecknError::technical(codes::TECHNICAL_DATABASE, e.to_string()))?;

    state.projections.record(envelope.context.transaction_id, event, body.clone());

    state.webhooks.deliver(state.dispatcher.as_ref(), &state.config.subscriber_id, event, &body).await;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_outbound_actions() {
        assert_eq!(parse_outbound_action("select"), Some(OutboundAction::Select));
        assert_eq!(parse_outbound_action("cancel"), Some(OutboundAction::Cancel));
        assert_eq!(parse_outbound_action("bogus"), None);
    }
}
