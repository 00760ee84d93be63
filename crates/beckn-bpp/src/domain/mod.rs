pub mod actions;
pub mod errors;
pub mod grievance;
pub mod reply;
pub mod settlement;

pub use actions::{process_order_action, ActionOutcome, MutatingAction};
pub use errors::BppError;
pub use grievance::{Issue, IssueStatus};
pub use reply::{reply_context, spawn_reply};
pub use settlement::{ReconStatus, Settlement, SettlementStatus};
