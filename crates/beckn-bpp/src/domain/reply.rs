//! # Outbound `on_*` reply (§4.7 step 6)
//!
//! Mirrors `beckn_bap::domain::dispatch`'s fire-and-forget shape, reversed:
//! the BPP is the signer here and the BAP's `bap_uri + "/on_<action>"` is
//! the target. The synchronous inbound handler has already ACKed by the
//! time `spawn_reply` runs.

use std::sync::Arc;

use beckn_crypto::auth_header::build_auth_header;
use beckn_net::HttpDispatcher;
use beckn_txlog::TransactionLogRepository;
use beckn_types::{codes, BecknError, Context, ContextBuilder, Envelope, TransactionLogEntry, TransactionStatus};
use chrono::Utc;
use tracing::{error, info};
use uuid::Uuid;

use crate::config::BppConfig;
use crate::domain::errors::BppError;

/// Build the `on_<action>` context addressed back at the inbound
/// caller's `bap_uri`, reusing `transaction_id` and inheriting
/// `domain`/`country`/`city`/`ttl` from the inbound request.
pub fn reply_context(config: &BppConfig, inbound: &Context, action: &str) -> Context {
    ContextBuilder {
        domain: inbound.domain.clone(),
        country: inbound.country.clone(),
        city: inbound.city.clone(),
        action: format!("on_{action}"),
        core_version: config.beckn_core_version.clone(),
        bap_id: inbound.bap_id.clone(),
        bap_uri: inbound.bap_uri.clone(),
        bpp_id: Some(config.subscriber_id.clone()),
        bpp_uri: Some(config.subscriber_url.clone()),
        transaction_id: Some(inbound.transaction_id),
        ttl: inbound.ttl.clone(),
        max_callbacks: None,
    }
    .build()
}

/// Sign and fire the callback in the background.
pub fn spawn_reply(
    config: Arc<BppConfig>,
    txlog: Arc<dyn TransactionLogRepository>,
    dispatcher: Arc<dyn HttpDispatcher>,
    context: Context,
    message: serde_json::Value,
) {
    tokio::spawn(async move {
        if let Err(e) = send_reply(&config, &txlog, &dispatcher, context, message).await {
            error!(error = %e, "failed to dispatch on_* callback");
        }
    });
}

async fn send_reply(
    config: &BppConfig,
    txlog: &Arc<dyn TransactionLogRepository>,
    dispatcher: &Arc<dyn HttpDispatcher>,
    context: Context,
    message: serde_json::Value,
) -> Result<(), BppError> {
    let target_url = format!("{}/{}", context.bap_uri, context.action);
    let envelope = Envelope::new(context, message);
    let body = serde_json::to_value(&envelope)
        .map_err(|e| BppError::Beckn(BecknError::technical(codes::TECHNICAL_SERIALIZATION, e.to_string())))?;
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

    let started = std::time::Instant::now();
    let headers = vec![("Authorization".to_string(), signature)];
    let outcome = tokio::time::timeout(config.request_timeout, dispatcher.post_json(&target_url, &headers, &body)).await;

    let (status, response_body, error) = match outcome {
        Ok(Ok(resp)) if resp.is_success() => (TransactionStatus::Ack, Some(resp.body), None),
        Ok(Ok(resp)) => (TransactionStatus::Nack, Some(resp.body), Some(serde_json::json!({"http_status": resp.status}))),
        Ok(Err(e)) => {
            error!(url = %target_url, error = %e, "on_* callback dispatch failed");
            (TransactionStatus::Error, None, Some(serde_json::json!({"message": e.to_string()})))
        }
        Err(_) => {
            error!(url = %target_url, "on_* callback dispatch timed out");
            (TransactionStatus::Timeout, None, Some(serde_json::json!({"message": "deadline exceeded"})))
        }
    };

    let latency_ms = started.elapsed().as_millis() as u64;
    let message_id = envelope.context.message_id;
    txlog.mark_status(message_id, status, response_body, Some(latency_ms), error).await?;
    info!(%message_id, url = %target_url, ?status, "on_* callback dispatch completed");
    Ok(())
}
