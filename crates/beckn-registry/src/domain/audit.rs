//! Audit trail for every subscriber status transition, onboarding or
//! admin-initiated.

use beckn_types::SubscriberStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditAction {
    Subscribed,
    SubscriptionFailed,
    Approve,
    Suspend,
    Revoke,
    Delete,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub subscriber_id: String,
    pub action: AuditAction,
    pub previous_status: Option<SubscriberStatus>,
    pub requester: String,
    pub at: DateTime<Utc>,
}

impl AuditEntry {
    pub fn new(subscriber_id: impl Into<String>, action: AuditAction, previous_status: Option<SubscriberStatus>, requester: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self { subscriber_id: subscriber_id.into(), action, previous_status, requester: requester.into(), at }
    }
}
