//! `/subscribe`, `/on_subscribe`, `/lookup`, `/vlookup`, `/ondc/vlookup`
//! and the internal admin surface: one `AppState` bundle, one
//! `Router::new().route(...)` chain, the common middleware stack from
//! `beckn_http` layered on top.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use beckn_crypto::auth_header::build_auth_header;
use beckn_crypto::signatures::Ed25519KeyPair;
use beckn_http::ApiError;
use beckn_types::{codes, BecknError, Subscriber, SubscriberDomain};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::cache::LookupCache;
use crate::domain::{
    apply_filter, on_subscribe, sign_ondc_response, subscribe, verify_ondc_signature, AdminAction, AuditAction,
    AuditEntry, LookupFilter, OnSubscribeRequest, OndcVlookupRequest, RegistryError, SubscribeRequest,
};
use crate::ports::SubscriberRepository;

pub struct RegistryState {
    pub repo: Arc<dyn SubscriberRepository>,
    pub cache: LookupCache,
    pub subscriber_id: String,
    pub unique_key_id: String,
    pub signing_key: Ed25519KeyPair,
}

pub fn router(state: Arc<RegistryState>, request_timeout: Duration) -> Router {
    let router = Router::new()
        .route("/subscribe", post(subscribe_handler))
        .route("/on_subscribe", post(on_subscribe_handler))
        .route("/lookup", post(lookup_handler))
        .route("/vlookup", post(vlookup_handler))
        .route("/ondc/vlookup", post(ondc_vlookup_handler))
        .route("/admin/subscribers", get(admin_list_handler))
        .route("/admin/subscribers/:id", delete(admin_delete_handler))
        .route("/admin/subscribers/:id/approve", post(admin_approve_handler))
        .route("/admin/subscribers/:id/suspend", post(admin_suspend_handler))
        .route("/admin/subscribers/:id/revoke", post(admin_revoke_handler))
        .route("/healthz", get(beckn_http::healthz))
        .with_state(state);
    beckn_http::middleware::apply(router, request_timeout)
}

async fn subscribe_handler(
    State(state): State<Arc<RegistryState>>,
    Json(req): Json<SubscribeRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let now = Utc::now();
    let existing = state.repo.get(&req.subscriber_id).await.map_err(BecknError::from)?;
    let (subscriber, pending, response) = subscribe(existing.as_ref(), req, now).map_err(BecknError::from)?;
    state.repo.upsert(subscriber).await.map_err(BecknError::from)?;
    state.repo.put_pending_challenge(pending).await.map_err(BecknError::from)?;
    Ok(Json(json!({ "status": response.status, "challenge": response.challenge })))
}

async fn on_subscribe_handler(
    State(state): State<Arc<RegistryState>>,
    Json(req): Json<OnSubscribeRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let now = Utc::now();
    let mut subscriber = state
        .repo
        .get(&req.subscriber_id)
        .await
        .map_err(BecknError::from)?
        .ok_or_else(|| BecknError::from(RegistryError::NotFound(req.subscriber_id.clone())))?;
    let previous_status = subscriber.status;
    let pending = state
        .repo
        .take_pending_challenge(&req.subscriber_id)
        .await
        .map_err(BecknError::from)?
        .ok_or_else(|| BecknError::from(RegistryError::NoPendingChallenge(req.subscriber_id.clone())))?;

    match on_subscribe(&mut subscriber, &pending, &req.answer, now) {
        Ok(()) => {
            state.repo.upsert(subscriber).await.map_err(BecknError::from)?;
            state.cache.invalidate_all();
            let entry = AuditEntry::new(req.subscriber_id, AuditAction::Subscribed, Some(previous_status), "self", now);
            state.repo.append_audit(entry).await.map_err(BecknError::from)?;
            Ok(Json(json!({ "status": "SUBSCRIBED" })))
        }
        Err(err) => {
            let entry =
                AuditEntry::new(req.subscriber_id, AuditAction::SubscriptionFailed, Some(previous_status), "self", now);
            let _ = state.repo.append_audit(entry).await;
            Err(BecknError::from(err).into())
        }
    }
}

async fn resolve_matches(state: &RegistryState, filter: &LookupFilter) -> Result<Vec<Subscriber>, ApiError> {
    if let Some(cached) = state.cache.get(&filter.cache_key()) {
        return Ok(cached);
    }
    let subscribers = state.repo.list().await.map_err(BecknError::from)?;
    let extensions: Vec<SubscriberDomain> = state.repo.list_domain_extensions().await.map_err(BecknError::from)?;
    let matches = apply_filter(&subscribers, &extensions, filter, Utc::now());
    state.cache.put(filter.cache_key(), matches.clone());
    Ok(matches)
}

async fn lookup_handler(
    State(state): State<Arc<RegistryState>>,
    Json(filter): Json<LookupFilter>,
) -> Result<Json<Vec<Subscriber>>, ApiError> {
    Ok(Json(resolve_matches(&state, &filter).await?))
}

async fn vlookup_handler(State(state): State<Arc<RegistryState>>, Json(filter): Json<LookupFilter>) -> Result<Response, ApiError> {
    let matches = resolve_matches(&state, &filter).await?;
    let body = json!(matches);
    let header = build_auth_header(&state.subscriber_id, &state.unique_key_id, &state.signing_key, &body)
        .map_err(ApiError::from)?;
    let mut response = Json(matches).into_response();
    let value = HeaderValue::from_str(&header).map_err(|e| {
        ApiError::from(BecknError::technical(codes::TECHNICAL_SERIALIZATION, e.to_string()))
    })?;
    response.headers_mut().insert("Authorization", value);
    Ok(response)
}

async fn ondc_vlookup_handler(
    State(state): State<Arc<RegistryState>>,
    Json(req): Json<OndcVlookupRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let sender = state
        .repo
        .get(&req.sender_subscriber_id)
        .await
        .map_err(BecknError::from)?
        .ok_or_else(|| BecknError::from(RegistryError::NotFound(req.sender_subscriber_id.clone())))?;
    verify_ondc_signature(&req, &sender.signing_public_key).map_err(BecknError::from)?;

    let filter = LookupFilter {
        subscriber_id: req.search_parameters.subscriber_id.clone(),
        r#type: None,
        domain: Some(req.search_parameters.domain.clone()),
        city: Some(req.search_parameters.city.clone()),
    };
    let matches = resolve_matches(&state, &filter).await?;
    let response = sign_ondc_response(&state.subscriber_id, &req.request_id, req.timestamp, &matches, &state.signing_key)
        .map_err(ApiError::from)?;
    Ok(Json(serde_json::to_value(response).expect("OndcVlookupResponse serializes")))
}

#[derive(Debug, Deserialize, Default)]
struct AdminListQuery {
    subscriber_id: Option<String>,
    domain: Option<String>,
    city: Option<String>,
}

async fn admin_list_handler(
    State(state): State<Arc<RegistryState>>,
    axum::extract::Query(q): axum::extract::Query<AdminListQuery>,
) -> Result<Json<Vec<Subscriber>>, ApiError> {
    let subscribers = state.repo.list().await.map_err(BecknError::from)?;
    let filtered = subscribers
        .into_iter()
        .filter(|s| q.subscriber_id.as_deref().is_none_or(|id| id == s.subscriber_id))
        .filter(|s| q.domain.as_deref().is_none_or(|d| d == s.domain))
        .filter(|s| q.city.as_deref().is_none_or(|c| c == s.city))
        .collect();
    Ok(Json(filtered))
}

async fn admin_transition(state: Arc<RegistryState>, id: String, action: AdminAction) -> Result<Json<Subscriber>, ApiError> {
    let mut subscriber =
        state.repo.get(&id).await.map_err(BecknError::from)?.ok_or_else(|| BecknError::from(RegistryError::NotFound(id.clone())))?;
    let entry = crate::domain::admin::transition(&mut subscriber, action, "admin", Utc::now());
    state.repo.upsert(subscriber.clone()).await.map_err(BecknError::from)?;
    state.repo.append_audit(entry).await.map_err(BecknError::from)?;
    state.cache.invalidate_all();
    Ok(Json(subscriber))
}

async fn admin_approve_handler(State(state): State<Arc<RegistryState>>, Path(id): Path<String>) -> Result<Json<Subscriber>, ApiError> {
    admin_transition(state, id, AdminAction::Approve).await
}

async fn admin_suspend_handler(State(state): State<Arc<RegistryState>>, Path(id): Path<String>) -> Result<Json<Subscriber>, ApiError> {
    admin_transition(state, id, AdminAction::Suspend).await
}

async fn admin_revoke_handler(State(state): State<Arc<RegistryState>>, Path(id): Path<String>) -> Result<Json<Subscriber>, ApiError> {
    admin_transition(state, id, AdminAction::Revoke).await
}

async fn admin_delete_handler(State(state): State<Arc<RegistryState>>, Path(id): Path<String>) -> Result<StatusCode, ApiError> {
    state.repo.get(&id).await.map_err(BecknError::from)?.ok_or_else(|| BecknError::from(RegistryError::NotFound(id.clone())))?;
    state.repo.delete(&id).await.map_err(BecknError::from)?;
    let entry = AuditEntry::new(id, AuditAction::Delete, None, "admin", Utc::now());
    state.repo.append_audit(entry).await.map_err(BecknError::from)?;
    state.cache.invalidate_all();
    Ok(StatusCode::NO_CONTENT)
}
