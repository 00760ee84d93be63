//! Single-process runner: binds the registry, gateway, BAP and BPP HTTP
//! surfaces each to their own configured port and drives them
//! concurrently, the same `axum::serve` shape any listener in this
//! workspace would use standing alone. Registry and gateway share one
//! subscriber repository in-process the way they'd otherwise only agree
//! via the registry's own `/subscribe`/`/lookup` wire surface — the
//! gateway already depends on `beckn_registry::SubscriberRepository`
//! directly rather than over HTTP.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::Router;
use beckn_bap::{BapConfig, BapState};
use beckn_bpp::{BppConfig, BppState};
use beckn_catalog::InMemoryCatalogRepository;
use beckn_context::MessageDedup;
use beckn_gateway::worker::{spawn_workers, GatewayIdentity};
use beckn_gateway::{GatewayConfig, GatewayState};
use beckn_net::{HttpDispatcher, ReqwestDispatcher, WebhookRegistry};
use beckn_orders::{InMemoryOrderRepository, TransactionLockTable};
use beckn_registry::{InMemorySubscriberRepository, LookupCache, RegistryConfig, RegistryState, SubscriberRepository};
use beckn_txlog::InMemoryTransactionLog;
use beckn_txlog::TransactionLogRepository;
use tokio::task::JoinHandle;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let subscribers: Arc<dyn SubscriberRepository> = Arc::new(InMemorySubscriberRepository::new());

    let registry = spawn_registry(subscribers.clone());
    let gateway = spawn_gateway(subscribers.clone());
    let bap = spawn_bap();
    let bpp = spawn_bpp();

    tracing::info!("beckn-node services listening; press Ctrl+C to stop");
    tokio::select! {
        res = registry => res??,
        res = gateway => res??,
        res = bap => res??,
        res = bpp => res??,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown signal received");
        }
    }
    Ok(())
}

async fn serve(bind_addr: String, router: Router, name: &'static str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(service = name, addr = %bind_addr, "listening");
    axum::serve(listener, router).await?;
    Ok(())
}

fn spawn_registry(subscribers: Arc<dyn SubscriberRepository>) -> JoinHandle<Result<()>> {
    let config = RegistryConfig::from_env();
    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(RegistryState {
        repo: subscribers,
        cache: LookupCache::new(),
        subscriber_id: config.subscriber_id,
        unique_key_id: config.unique_key_id,
        signing_key: config.signing_key,
    });
    let router = beckn_registry::router(state, Duration::from_millis(30_000));
    tokio::spawn(serve(bind_addr, router, "registry"))
}

fn spawn_gateway(subscribers: Arc<dyn SubscriberRepository>) -> JoinHandle<Result<()>> {
    let config = GatewayConfig::from_env();
    let bind_addr = config.bind_addr.clone();
    let dispatcher: Arc<dyn HttpDispatcher> = Arc::new(ReqwestDispatcher::new(config.request_timeout));
    let identity = Arc::new(GatewayIdentity {
        subscriber_id: config.subscriber_id,
        unique_key_id: config.unique_key_id,
        signing_key: config.signing_key,
    });
    let job_tx = spawn_workers(config.fanout_workers, dispatcher, identity.clone(), config.fanout_queue_capacity);
    let state = Arc::new(GatewayState {
        repo: subscribers,
        cache: LookupCache::new(),
        dedup: MessageDedup::new(),
        identity,
        job_tx,
        request_timeout: config.request_timeout,
    });
    let router = beckn_gateway::router(state, config.request_timeout);
    tokio::spawn(serve(bind_addr, router, "gateway"))
}

fn spawn_bap() -> JoinHandle<Result<()>> {
    let config = BapConfig::from_env();
    let bind_addr = config.bind_addr.clone();
    let request_timeout = config.request_timeout;
    let dispatcher: Arc<dyn HttpDispatcher> = Arc::new(ReqwestDispatcher::new(request_timeout));
    let registry = Arc::new(beckn_bap::HttpRegistryLookup::new(dispatcher.clone(), config.registry_url.clone()));
    let state = Arc::new(BapState {
        config: Arc::new(config),
        txlog: Arc::new(InMemoryTransactionLog::new()) as Arc<dyn TransactionLogRepository>,
        dispatcher,
        registry,
        dedup: MessageDedup::new(),
        webhooks: WebhookRegistry::new(),
        projections: beckn_bap::ProjectionStore::new(),
    });
    let router = beckn_bap::router(state, request_timeout);
    tokio::spawn(serve(bind_addr, router, "bap"))
}

fn spawn_bpp() -> JoinHandle<Result<()>> {
    let config = BppConfig::from_env();
    let bind_addr = config.bind_addr.clone();
    let request_timeout = config.request_timeout;
    let dispatcher: Arc<dyn HttpDispatcher> = Arc::new(ReqwestDispatcher::new(request_timeout));
    let registry = Arc::new(beckn_bpp::adapters::HttpRegistryLookup::new(dispatcher.clone(), config.registry_url.clone()));
    let state = Arc::new(BppState {
        config: Arc::new(config),
        txlog: Arc::new(InMemoryTransactionLog::new()) as Arc<dyn TransactionLogRepository>,
        dispatcher,
        registry,
        dedup: MessageDedup::new(),
        order_repo: Arc::new(InMemoryOrderRepository::new()),
        catalog_repo: Arc::new(InMemoryCatalogRepository::new()),
        issue_repo: Arc::new(beckn_bpp::adapters::InMemoryIssueRepository::new()),
        settlement_repo: Arc::new(beckn_bpp::adapters::InMemorySettlementRepository::new()),
        locks: TransactionLockTable::new(),
    });
    let router = beckn_bpp::router(state, request_timeout);
    tokio::spawn(serve(bind_addr, router, "bpp"))
}
