//! Internal admin operations (§4.4: "list with filters, status
//! transitions `approve | suspend | revoke`, delete").

use beckn_types::{Subscriber, SubscriberStatus};
use chrono::{DateTime, Utc};

use crate::domain::audit::{AuditAction, AuditEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    Approve,
    Suspend,
    Revoke,
}

impl AdminAction {
    fn target_status(self) -> SubscriberStatus {
        match self {
            AdminAction::Approve => SubscriberStatus::Subscribed,
            AdminAction::Suspend => SubscriberStatus::Suspended,
            AdminAction::Revoke => SubscriberStatus::Revoked,
        }
    }

    fn audit_action(self) -> AuditAction {
        match self {
            AdminAction::Approve => AuditAction::Approve,
            AdminAction::Suspend => AuditAction::Suspend,
            AdminAction::Revoke => AuditAction::Revoke,
        }
    }
}

/// Applies an admin status transition, unconditionally (the protocol
/// names no transition table for admin operations, unlike the order
/// state machine) and returns the audit entry recording what the status
/// was before.
pub fn transition(subscriber: &mut Subscriber, action: AdminAction, requester: &str, now: DateTime<Utc>) -> AuditEntry {
    let previous = subscriber.status;
    subscriber.status = action.target_status();
    if action == AdminAction::Approve {
        subscriber.valid_from = now;
        subscriber.valid_until = now + chrono::Duration::days(super::types::VALIDITY_PERIOD_DAYS);
    }
    AuditEntry::new(subscriber.subscriber_id.clone(), action.audit_action(), Some(previous), requester, now)
}
