//! # Outbound dispatch (§4.6)
//!
//! Turns a simplified `/api/<action>` request into a signed protocol
//! envelope, records it as `SENT` in the transaction log, and fires the
//! network call in the background — the caller gets `{ACK, transaction_id,
//! message_id}` back before the BPP has even been reached.

use std::sync::Arc;
use std::time::Duration;

use beckn_crypto::auth_header::build_auth_header;
use beckn_net::HttpDispatcher;
use beckn_txlog::TransactionLogRepository;
use beckn_types::{codes, BecknError, Context, ContextBuilder, Envelope, TransactionLogEntry, TransactionStatus};
use chrono::Utc;
use tracing::{error, info};
use uuid::Uuid;

use crate::config::BapConfig;
use crate::domain::errors::BapError;
use crate::domain::requests::{ApiAckResponse, OutboundAction, OutboundApiRequest, SearchApiRequest};

const DEFAULT_TTL: &str = "PT30S";

/// Dispatch `search`: no counterparty yet, addressed at the configured
/// gateway.
pub async fn dispatch_search(
    config: &BapConfig,
    txlog: &Arc<dyn TransactionLogRepository>,
    dispatcher: &Arc<dyn HttpDispatcher>,
    request: SearchApiRequest,
) -> Result<ApiAckResponse, BapError> {
    let context = ContextBuilder {
        domain: request.domain.clone(),
        country: config.country.clone(),
        city: request.city.clone().unwrap_or_else(|| config.default_city.clone()),
        action: OutboundAction::Search.as_str().to_string(),
        core_version: config.beckn_core_version.clone(),
        bap_id: config.subscriber_id.clone(),
        bap_uri: config.subscriber_url.clone(),
        bpp_id: None,
        bpp_uri: None,
        transaction_id: None,
        ttl: Some(DEFAULT_TTL.to_string()),
        max_callbacks: None,
    }
    .build();

    let target_url = format!("{}/search", config.gateway_url);
    dispatch(config, txlog, dispatcher, context, request.to_intent(), target_url).await
}

/// Dispatch any other action: already bound to a transaction and a BPP.
/// `domain`/`city` are inherited from the transaction's first logged
/// entry rather than re-supplied by the caller, so a follow-up action
/// can't silently drift the context away from the one the BPP opened the
/// transaction under.
pub async fn dispatch_to_bpp(
    config: &BapConfig,
    txlog: &Arc<dyn TransactionLogRepository>,
    dispatcher: &Arc<dyn HttpDispatcher>,
    action: OutboundAction,
    request: OutboundApiRequest,
) -> Result<ApiAckResponse, BapError> {
    let prior = txlog.list_by_transaction_id(request.transaction_id).await?;
    let opening_entry = prior.first().ok_or(BapError::UnknownTransaction(request.transaction_id))?;

    let context = ContextBuilder {
        domain: opening_entry.domain.clone(),
        country: config.country.clone(),
        city: opening_entry.city.clone(),
        action: action.as_str().to_string(),
        core_version: config.beckn_core_version.clone(),
        bap_id: config.subscriber_id.clone(),
        bap_uri: config.subscriber_url.clone(),
        bpp_id: Some(request.bpp_id.clone()),
        bpp_uri: Some(request.bpp_uri.clone()),
        transaction_id: Some(request.transaction_id),
        ttl: Some(DEFAULT_TTL.to_string()),
        max_callbacks: None,
    }
    .build();

    let target_url = format!("{}/{}", request.bpp_uri, action.as_str());
    dispatch(config, txlog, dispatcher, context, request.message, target_url).await
}

async fn dispatch(
    config: &BapConfig,
    txlog: &Arc<dyn TransactionLogRepository>,
    dispatcher: &Arc<dyn HttpDispatcher>,
    context: Context,
    message: serde_json::Value,
    target_url: String,
) -> Result<ApiAckResponse, BapError> {
    let envelope = Envelope::new(context, message);
    let body = serde_json::to_value(&envelope)
        .map_err(|e| BapError::Beckn(BecknError::technical(codes::TECHNICAL_SERIALIZATION, e.to_string())))?;
    let signature = build_auth_header(&config.subscriber_id, &config.unique_key_id, &config.signing_key, &body)?;

    let entry = TransactionLogEntry {
        id: Uuid::new_v4(),
        transaction_id: envelope.context.transaction_id,
        message_id: envelope.context.message_id,
        action: envelope.context.action.clone(),
        bap_id: envelope.context.bap_id.clone(),
        bpp_id: envelope.context.bpp_id.clone(),
        domain: envelope.context.domain.clone(),
        city: envelope.context.city.clone(),
        request_body: body.clone(),
        response_body: None,
        status: TransactionStatus::Sent,
        latency_ms: None,
        error: None,
        created_at: Utc::now(),
    };
    txlog.record(entry).await?;

    let response = ApiAckResponse::new(envelope.context.transaction_id, envelope.context.message_id);

    let txlog = txlog.clone();
    let dispatcher = dispatcher.clone();
    let message_id = envelope.context.message_id;
    let request_timeout = config.request_timeout;
    tokio::spawn(async move {
        send_and_record(txlog, dispatcher, target_url, body, signature, message_id, request_timeout).await;
    });

    Ok(response)
}

async fn send_and_record(
    txlog: Arc<dyn TransactionLogRepository>,
    dispatcher: Arc<dyn HttpDispatcher>,
    target_url: String,
    body: serde_json::Value,
    signature: String,
    message_id: Uuid,
    timeout: Duration,
) {
    let started = std::time::Instant::now();
    let headers = vec![("Authorization".to_string(), signature)];
    let outcome = tokio::time::timeout(timeout, dispatcher.post_json(&target_url, &headers, &body)).await;

    let (status, response_body, error) = match outcome {
        Ok(Ok(resp)) if resp.is_success() => (TransactionStatus::Ack, Some(resp.body), None),
        Ok(Ok(resp)) => {
            let err = serde_json::json!({"http_status": resp.status});
            (TransactionStatus::Nack, Some(resp.body), Some(err))
        }
        Ok(Err(e)) => {
            error!(url = %target_url, error = %e, "outbound dispatch failed");
            (TransactionStatus::Error, None, Some(serde_json::json!({"message": e.to_string()})))
        }
        Err(_) => {
            error!(url = %target_url, "outbound dispatch timed out");
            (TransactionStatus::Timeout, None, Some(serde_json::json!({"message": "deadline exceeded"})))
        }
    };

    let latency_ms = started.elapsed().as_millis() as u64;
    if let Err(e) = txlog.mark_status(message_id, status, response_body, Some(latency_ms), error).await {
        error!(%message_id, error = %e, "failed to record outbound dispatch outcome");
        return;
    }
    info!(%message_id, url = %target_url, ?status, "outbound dispatch completed");
}
