//! Seller application platform engine (C8, §4.7): the inbound action
//! router driving the order state machine (C10) and catalog store (C9),
//! a BPP-owned catalog admin surface, grievance and settlement tracking,
//! and the signed outbound `on_*` callback.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod http;
pub mod ports;

pub use config::BppConfig;
pub use domain::{
    process_order_action, reply_context, spawn_reply, ActionOutcome, BppError, Issue, IssueStatus, MutatingAction,
    ReconStatus, Settlement, SettlementStatus,
};
pub use http::{router, BppState};
pub use ports::{IssueRepository, RegistryLookup, SettlementRepository};
