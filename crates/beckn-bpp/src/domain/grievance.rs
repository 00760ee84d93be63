//! # Grievance handling — Issue lifecycle
//!
//! `OPEN -> ESCALATED -> RESOLVED -> CLOSED`, with a direct `OPEN ->
//! RESOLVED` shortcut when the first respondent action already settles
//! it. Issues are BPP-owned the same way orders are (§3 Ownership); the
//! BAP side only ever sees the `on_issue` projection.

use beckn_types::{codes, BecknError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::errors::BppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueStatus {
    Open,
    Escalated,
    Resolved,
    Closed,
}

impl IssueStatus {
    fn can_transition_to(self, to: IssueStatus) -> bool {
        use IssueStatus::*;
        matches!((self, to), (Open, Escalated) | (Open, Resolved) | (Escalated, Resolved) | (Resolved, Closed))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub issue_id: String,
    pub order_id: Option<String>,
    pub category: String,
    pub sub_category: String,
    pub status: IssueStatus,
    pub short_desc: String,
    #[serde(default)]
    pub respondent_actions: Vec<String>,
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(default)]
    pub expected_response_time: Option<String>,
    #[serde(default)]
    pub expected_resolution_time: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Issue {
    pub fn open(
        issue_id: impl Into<String>,
        order_id: Option<String>,
        category: impl Into<String>,
        sub_category: impl Into<String>,
        short_desc: impl Into<String>,
        expected_response_time: Option<String>,
        expected_resolution_time: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            issue_id: issue_id.into(),
            order_id,
            category: category.into(),
            sub_category: sub_category.into(),
            status: IssueStatus::Open,
            short_desc: short_desc.into(),
            respondent_actions: Vec::new(),
            resolution: None,
            expected_response_time,
            expected_resolution_time,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn escalate(&mut self, respondent_action: impl Into<String>) -> Result<(), BppError> {
        self.transition(IssueStatus::Escalated)?;
        self.respondent_actions.push(respondent_action.into());
        Ok(())
    }

    pub fn resolve(&mut self, resolution: impl Into<String>) -> Result<(), BppError> {
        self.transition(IssueStatus::Resolved)?;
        self.resolution = Some(resolution.into());
        Ok(())
    }

    pub fn close(&mut self) -> Result<(), BppError> {
        self.transition(IssueStatus::Closed)
    }

    fn transition(&mut self, to: IssueStatus) -> Result<(), BppError> {
        if !self.status.can_transition_to(to) {
            return Err(BppError::Beckn(BecknError::business(
                codes::BUSINESS_INVALID_ISSUE_TRANSITION,
                format!("issue '{}' cannot move from {:?} to {to:?}", self.issue_id, self.status),
            )));
        }
        self.status = to;
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue() -> Issue {
        Issue::open("I1", None, "fulfillment", "delay", "order running late", None, None)
    }

    #[test]
    fn escalate_then_resolve_then_close() {
        let mut issue = issue();
        issue.escalate("contacted rider").unwrap();
        assert_eq!(issue.status, IssueStatus::Escalated);
        issue.resolve("rider dispatched").unwrap();
        assert_eq!(issue.status, IssueStatus::Resolved);
        issue.close().unwrap();
        assert_eq!(issue.status, IssueStatus::Closed);
    }

    #[test]
    fn open_may_resolve_directly() {
        let mut issue = issue();
        issue.resolve("refunded").unwrap();
        assert_eq!(issue.status, IssueStatus::Resolved);
    }

    #[test]
    fn closed_rejects_further_transitions() {
        let mut issue = issue();
        issue.resolve("refunded").unwrap();
        issue.close().unwrap();
        assert!(issue.close().is_err());
    }

    #[test]
    fn escalated_cannot_jump_straight_to_closed() {
        let mut issue = issue();
        issue.escalate("contacted rider").unwrap();
        assert!(issue.close().is_err());
    }
}
