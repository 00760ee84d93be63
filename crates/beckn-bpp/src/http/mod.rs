//! Inbound action router (§4.7): one literal route per Beckn action the
//! BPP answers directly, plus the BPP-owned catalog admin surface, wired
//! the same one-`AppState`, one-router-chain way `beckn_bap::http` and
//! `beckn_gateway::http` assemble theirs.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use beckn_catalog::{build_on_search_response, CatalogRepository, CatalogUpdate, ItemPatch};
use beckn_context::{validate, MessageDedup};
use beckn_crypto::auth_header::verify_auth_header;
use beckn_net::HttpDispatcher;
use beckn_orders::{OrderRepository, TransactionLockTable};
use beckn_txlog::TransactionLogRepository;
use beckn_types::{codes, AckResponse, BecknError, Envelope, Intent, Provider};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use crate::config::BppConfig;
use crate::domain::{process_order_action, reply_context, spawn_reply, BppError, Issue, MutatingAction, ReconStatus, Settlement};
use crate::ports::{IssueRepository, RegistryLookup, SettlementRepository};

pub struct BppState {
    pub config: Arc<BppConfig>,
    pub txlog: Arc<dyn TransactionLogRepository>,
    pub dispatcher: Arc<dyn HttpDispatcher>,
    pub registry: Arc<dyn RegistryLookup>,
    pub dedup: MessageDedup,
    pub order_repo: Arc<dyn OrderRepository>,
    pub catalog_repo: Arc<dyn CatalogRepository>,
    pub issue_repo: Arc<dyn IssueRepository>,
    pub settlement_repo: Arc<dyn SettlementRepository>,
    pub locks: TransactionLockTable,
}

const INBOUND_ACTIONS: &[&str] =
    &["search", "select", "init", "confirm", "status", "track", "cancel", "update", "rating", "support"];

pub fn router(state: Arc<BppState>, request_timeout: Duration) -> Router {
    let mut router = Router::new()
        .route("/issue", post(issue_handler))
        .route("/issue/:issue_id", patch(issue_transition_handler))
        .route("/settlement/:order_id/recon", patch(settlement_recon_handler))
        .route("/catalog", post(store_catalog_handler))
        .route("/catalog/items/:item_id", patch(update_item_handler))
        .route("/catalog/updates", post(record_update_handler))
        .route("/healthz", get(beckn_http::healthz));

    for action in INBOUND_ACTIONS.iter().copied() {
        router = router.route(
            &format!("/{action}"),
            post(move |State(state): State<Arc<BppState>>, headers: HeaderMap, Json(envelope): Json<Envelope>| async move {
                action_handler(state, headers, envelope, action).await
            }),
        );
    }

    let router = router.with_state(state);
    beckn_http::middleware::apply(router, request_timeout)
}

async fn authenticate(state: &BppState, headers: &HeaderMap, body: &serde_json::Value, sender_id: &str) -> Result<(), BecknError> {
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

async fn action_handler(
    state: Arc<BppState>,
    headers: HeaderMap,
    envelope: Envelope,
    action: &'static str,
) -> (StatusCode, Json<AckResponse>) {
    let result = handle_action(&state, &headers, envelope, action).await;
    beckn_http::ack_response(result)
}

async fn handle_action(state: &BppState, headers: &HeaderMap, envelope: Envelope, action: &'static str) -> Result<(), BecknError> {
    let body = serde_json::to_value(&envelope).map_err(|e| BecknError::technical(codes::TECHNICAL_SERIALIZATION, e.to_string()))?;
    authenticate(state, headers, &body, &envelope.context.bap_id).await?;
    validate(&envelope.context)?;

    if !state.dedup.check_and_record(envelope.context.message_id) {
        info!(message_id = %envelope.context.message_id, action, "duplicate request suppressed, ACKed only");
        return Ok(());
    }

    match action {
        "search" => handle_search(state, envelope).await,
        "status" => handle_status(state, envelope).await,
        "track" => handle_track(state, envelope).await,
        "support" => handle_support(state, envelope).await,
        _ => handle_mutating(state, envelope, action).await,
    }
}

#[derive(Deserialize)]
struct SearchMessage {
    intent: Intent,
}

async fn handle_search(state: &BppState, envelope: Envelope) -> Result<(), BecknError> {
    let SearchMessage { intent } = envelope.message_as()?;
    let Some(stored) = state.catalog_repo.get(&state.config.subscriber_id).await.map_err(BppError::from)? else {
        info!(transaction_id = %envelope.context.transaction_id, "search received with no catalog stored, nothing to reply");
        return Ok(());
    };
    let Some(catalog) = build_on_search_response(&stored, &intent, Utc::now()) else {
        info!(transaction_id = %envelope.context.transaction_id, "incremental search matched no item, nothing to reply");
        return Ok(());
    };

    let reply_ctx = reply_context(&state.config, &envelope.context, "search");
    let message = serde_json::json!({ "catalog": catalog });
    spawn_reply(state.config.clone(), state.txlog.clone(), state.dispatcher.clone(), reply_ctx, message);
    Ok(())
}

async fn handle_status(state: &BppState, envelope: Envelope) -> Result<(), BecknError> {
    let order = state
        .order_repo
        .get_by_transaction_id(envelope.context.transaction_id)
        .await
        .map_err(BppError::from)?
        .ok_or_else(|| BecknError::domain(codes::DOMAIN_UNKNOWN_PROVIDER, format!("no order for transaction '{}'", envelope.context.transaction_id)))?;

    let reply_ctx = reply_context(&state.config, &envelope.context, "status");
    let message = serde_json::json!({ "order": order });
    spawn_reply(state.config.clone(), state.txlog.clone(), state.dispatcher.clone(), reply_ctx, message);
    Ok(())
}

async fn handle_track(state: &BppState, envelope: Envelope) -> Result<(), BecknError> {
    let order = state
        .order_repo
        .get_by_transaction_id(envelope.context.transaction_id)
        .await
        .map_err(BppError::from)?
        .ok_or_else(|| BecknError::domain(codes::DOMAIN_UNKNOWN_PROVIDER, format!("no order for transaction '{}'", envelope.context.transaction_id)))?;

    let reply_ctx = reply_context(&state.config, &envelope.context, "track");
    let message = serde_json::json!({ "fulfillments": order.fulfillments });
    spawn_reply(state.config.clone(), state.txlog.clone(), state.dispatcher.clone(), reply_ctx, message);
    Ok(())
}

async fn handle_support(state: &BppState, envelope: Envelope) -> Result<(), BecknError> {
    let reply_ctx = reply_context(&state.config, &envelope.context, "support");
    let message = serde_json::json!({
        "support": { "bpp_id": state.config.subscriber_id, "bpp_uri": state.config.subscriber_url },
    });
    spawn_reply(state.config.clone(), state.txlog.clone(), state.dispatcher.clone(), reply_ctx, message);
    Ok(())
}

async fn handle_mutating(state: &BppState, envelope: Envelope, action: &'static str) -> Result<(), BecknError> {
    let mutating = MutatingAction::parse(action).expect("only mutating actions are routed here");
    let outcome = process_order_action(mutating, &envelope.context, &envelope.message, &state.order_repo, &state.locks).await?;

    let message = match mutating {
        MutatingAction::Rating => serde_json::json!({}),
        _ => serde_json::json!({ "order": outcome.order }),
    };
    let reply_ctx = reply_context(&state.config, &envelope.context, action);
    spawn_reply(state.config.clone(), state.txlog.clone(), state.dispatcher.clone(), reply_ctx, message);

    if mutating == MutatingAction::Confirm {
        let price = outcome.order.quote.as_ref().and_then(|q| q.price.as_ref());
        let settlement = Settlement::for_confirmed_order(
            outcome.order.order_id.clone(),
            outcome.order.bap_id.clone(),
            outcome.order.bpp_id.clone(),
            outcome.order.payment.as_ref(),
            price.map(|p| p.value.clone()).unwrap_or_default(),
            price.map(|p| p.currency.clone()).unwrap_or_default(),
        );
        if let Some(settlement) = settlement {
            state.settlement_repo.record(settlement).await.map_err(BppError::from)?;
        }
    }

    Ok(())
}

#[derive(Deserialize)]
struct IssueRequestPayload {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    order_id: Option<String>,
    category: String,
    sub_category: String,
    short_desc: String,
    #[serde(default)]
    expected_response_time: Option<String>,
    #[serde(default)]
    expected_resolution_time: Option<String>,
}

#[derive(Deserialize)]
struct IssueRequestMessage {
    issue: IssueRequestPayload,
}

async fn issue_handler(
    State(state): State<Arc<BppState>>,
    headers: HeaderMap,
    Json(envelope): Json<Envelope>,
) -> (StatusCode, Json<AckResponse>) {
    let result = handle_issue(&state, &headers, envelope).await;
    beckn_http::ack_response(result)
}

async fn handle_issue(state: &BppState, headers: &HeaderMap, envelope: Envelope) -> Result<(), BecknError> {
    let body = serde_json::to_value(&envelope).map_err(|e| BecknError::technical(codes::TECHNICAL_SERIALIZATION, e.to_string()))?;
    authenticate(state, headers, &body, &envelope.context.bap_id).await?;
    validate(&envelope.context)?;

    if !state.dedup.check_and_record(envelope.context.message_id) {
        info!(message_id = %envelope.context.message_id, "duplicate issue request suppressed, ACKed only");
        return Ok(());
    }

    let IssueRequestMessage { issue: payload } = envelope.message_as()?;
    let issue_id = payload.id.unwrap_or_else(|| envelope.context.transaction_id.to_string());
    let issue = Issue::open(
        issue_id,
        payload.order_id,
        payload.category,
        payload.sub_category,
        payload.short_desc,
        payload.expected_response_time,
        payload.expected_resolution_time,
    );
    state.issue_repo.insert(issue.clone()).await.map_err(BppError::from)?;

    let reply_ctx = reply_context(&state.config, &envelope.context, "issue");
    let message = serde_json::json!({ "issue": issue });
    spawn_reply(state.config.clone(), state.txlog.clone(), state.dispatcher.clone(), reply_ctx, message);
    Ok(())
}

/// Drives the `OPEN -> ESCALATED -> RESOLVED -> CLOSED` transitions from
/// §4.10 that never arrive as an inbound Beckn action — mirroring the
/// registry's own `/admin/subscribers/:id/{approve,suspend,revoke}` shape.
#[derive(Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum IssueTransitionRequest {
    Escalate { respondent_action: String },
    Resolve { resolution: String },
    Close,
}

async fn issue_transition_handler(
    State(state): State<Arc<BppState>>,
    Path(issue_id): Path<String>,
    Json(request): Json<IssueTransitionRequest>,
) -> Result<Json<Issue>, beckn_http::ApiError> {
    let mut issue =
        state.issue_repo.get(&issue_id).await.map_err(BppError::from)?.ok_or_else(|| BppError::UnknownIssue(issue_id.clone()))?;
    match request {
        IssueTransitionRequest::Escalate { respondent_action } => issue.escalate(respondent_action)?,
        IssueTransitionRequest::Resolve { resolution } => issue.resolve(resolution)?,
        IssueTransitionRequest::Close => issue.close()?,
    }
    state.issue_repo.save(issue.clone()).await.map_err(BppError::from)?;
    Ok(Json(issue))
}

/// Recorded by the out-of-band reconciliation job, not by any inbound
/// Beckn action.
#[derive(Deserialize)]
struct SettlementReconRequest {
    recon_status: ReconStatus,
}

async fn settlement_recon_handler(
    State(state): State<Arc<BppState>>,
    Path(order_id): Path<String>,
    Json(request): Json<SettlementReconRequest>,
) -> Result<Json<Settlement>, beckn_http::ApiError> {
    let settlement = state.settlement_repo.update_recon_status(&order_id, request.recon_status).await.map_err(BppError::from)?;
    Ok(Json(settlement))
}

#[derive(Deserialize)]
struct StoreCatalogRequest {
    provider: Provider,
    items: Vec<beckn_types::Item>,
    #[serde(default)]
    ttl: Option<String>,
}

async fn store_catalog_handler(
    State(state): State<Arc<BppState>>,
    Json(request): Json<StoreCatalogRequest>,
) -> Result<StatusCode, beckn_http::ApiError> {
    let ttl = request
        .ttl
        .as_deref()
        .and_then(beckn_types::parse_iso8601_duration)
        .unwrap_or(state.config.catalog_default_ttl);
    state
        .catalog_repo
        .store_catalog(&state.config.subscriber_id, request.provider, request.items, ttl)
        .await
        .map_err(BppError::from)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn update_item_handler(
    State(state): State<Arc<BppState>>,
    Path(item_id): Path<String>,
    Json(patch): Json<ItemPatch>,
) -> Result<StatusCode, beckn_http::ApiError> {
    state.catalog_repo.update_item(&state.config.subscriber_id, &item_id, patch).await.map_err(BppError::from)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn record_update_handler(
    State(state): State<Arc<BppState>>,
    Json(update): Json<CatalogUpdate>,
) -> Result<StatusCode, beckn_http::ApiError> {
    state.catalog_repo.record_update(&state.config.subscriber_id, update).await.map_err(BppError::from)?;
    Ok(StatusCode::NO_CONTENT)
}
