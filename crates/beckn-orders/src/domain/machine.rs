//! # Order state machine (C10)
//!
//! Every mutating entry point returns the [`StateTransition`] it recorded,
//! or `None` when the action changed order fields without moving the
//! state (per §8 scenario 3, only the three actual state changes —
//! `CREATED→ACCEPTED`, `ACCEPTED→IN_PROGRESS`, `IN_PROGRESS→COMPLETED` —
//! are logged transitions; the initial `select` insertion and the
//! state-preserving `init`/`update`/`rating` calls are not).

use beckn_types::{codes, BecknError};
use chrono::Utc;
use serde_json::json;

use crate::domain::errors::OrderError;
use crate::domain::messages::{CancelPayload, ConfirmPayload, InitPayload, RatingPayload, SelectPayload, UpdatePayload};
use crate::domain::types::{is_valid_cancel_reason, is_valid_return_reason, Actor, Order, OrderState, StateTransition};

/// `select` (new `transaction_id`): populate the freshly created order at
/// `CREATED`. No transition row — this is the initial insertion.
pub fn select(order: &mut Order, payload: SelectPayload) {
    order.provider = payload.provider;
    order.items = payload.items;
    order.fulfillments = payload.fulfillments;
    order.updated_at = Utc::now();
}

/// `init`: billing/fulfillments attach, state stays `CREATED`.
pub fn init(order: &mut Order, payload: InitPayload) {
    order.billing = payload.billing;
    if !payload.fulfillments.is_empty() {
        order.fulfillments = payload.fulfillments;
    }
    order.updated_at = Utc::now();
}

/// `confirm`: `CREATED → ACCEPTED`, attaching payment/quote.
pub fn confirm(order: &mut Order, payload: ConfirmPayload) -> Result<StateTransition, OrderError> {
    let transition = transition_to(order, OrderState::Accepted, "confirm", Actor::Buyer, json!({}))?;
    order.payment = payload.payment;
    order.quote = payload.quote;
    Ok(transition)
}

/// `cancel`: current state `→ CANCELLED`, with a validated standardized
/// reason code (buyer `001`-`016`, seller `017`-`020`).
pub fn cancel(order: &mut Order, actor: Actor, payload: CancelPayload) -> Result<StateTransition, OrderError> {
    if !is_valid_cancel_reason(actor, &payload.cancellation_reason_id) {
        return Err(OrderError::UnknownReasonCode(payload.cancellation_reason_id));
    }
    let transition = transition_to(
        order,
        OrderState::Cancelled,
        "cancel",
        actor,
        json!({"reason_code": payload.cancellation_reason_id}),
    )?;
    order.cancellation_reason_code = Some(payload.cancellation_reason_id);
    Ok(transition)
}

/// `update`: a `return_request` fulfillment tag routes to `→ RETURNED`
/// with a validated return reason code (buyer `001`-`008`, seller
/// `009`-`011`); otherwise the diff is applied in place and state is
/// unchanged (no transition row).
pub fn update(order: &mut Order, actor: Actor, payload: UpdatePayload) -> Result<Option<StateTransition>, OrderError> {
    if payload.is_return_request() {
        let reason = payload.reason_id.clone().unwrap_or_default();
        if !is_valid_return_reason(actor, &reason) {
            return Err(OrderError::UnknownReasonCode(reason));
        }
        let transition =
            transition_to(order, OrderState::Returned, "update", actor, json!({"reason_code": reason}))?;
        order.cancellation_reason_code = Some(reason);
        return Ok(Some(transition));
    }

    if let Some(billing) = payload.billing {
        order.billing = Some(billing);
    }
    if !payload.fulfillments.is_empty() {
        order.fulfillments = payload.fulfillments;
    }
    order.updated_at = Utc::now();
    Ok(None)
}

/// `rating`: persist a 1-5 rating; state unchanged. Out-of-range values
/// are rejected rather than clamped.
pub fn rating(payload: RatingPayload) -> Result<(), OrderError> {
    if !(1..=5).contains(&payload.value) {
        return Err(OrderError::RatingOutOfRange(payload.value));
    }
    Ok(())
}

/// BPP-internal fulfillment progression, not driven by an inbound action:
/// `ACCEPTED → IN_PROGRESS` and `IN_PROGRESS → COMPLETED`.
pub fn advance(order: &mut Order, to: OrderState, details: serde_json::Value) -> Result<StateTransition, OrderError> {
    transition_to(order, to, "fulfillment_progress", Actor::Seller, details)
}

fn transition_to(
    order: &mut Order,
    to: OrderState,
    action: &str,
    actor: Actor,
    details: serde_json::Value,
) -> Result<StateTransition, OrderError> {
    let from = order.state;
    if !from.can_transition_to(to) {
        return Err(OrderError::InvalidTransition { from, action: action.to_string() });
    }
    order.state = to;
    order.updated_at = Utc::now();
    Ok(StateTransition { order_id: order.order_id.clone(), from, to, action: action.to_string(), actor, details, ts: order.updated_at })
}

impl From<OrderError> for BecknError {
    fn from(e: OrderError) -> Self {
        match &e {
            OrderError::InvalidTransition { .. } => BecknError::business(codes::BUSINESS_INVALID_TRANSITION, e.to_string()),
            OrderError::UnknownReasonCode(_) => {
                BecknError::business(codes::BUSINESS_CANCELLATION_REJECTED, e.to_string())
            }
            OrderError::RatingOutOfRange(_) => {
                BecknError::business(codes::BUSINESS_RATING_OUT_OF_RANGE, e.to_string())
            }
            OrderError::NotFound(_) => BecknError::domain(codes::DOMAIN_UNKNOWN_PROVIDER, e.to_string()),
            OrderError::Storage(_) => BecknError::technical(codes::TECHNICAL_DATABASE, e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn order() -> Order {
        Order::new("O1", Uuid::new_v4(), "bap1", "bpp1", "ONDC:RET10", "std:011")
    }

    #[test]
    fn happy_path_select_init_confirm_progress_complete() {
        let mut o = order();
        select(&mut o, SelectPayload { provider: None, items: vec![], fulfillments: vec![] });
        assert_eq!(o.state, OrderState::Created);

        init(&mut o, InitPayload { billing: None, fulfillments: vec![] });
        assert_eq!(o.state, OrderState::Created);

        let t1 = confirm(&mut o, ConfirmPayload { payment: None, quote: None }).unwrap();
        assert_eq!((t1.from, t1.to), (OrderState::Created, OrderState::Accepted));

        let t2 = advance(&mut o, OrderState::InProgress, json!({})).unwrap();
        assert_eq!((t2.from, t2.to), (OrderState::Accepted, OrderState::InProgress));

        let t3 = advance(&mut o, OrderState::Completed, json!({})).unwrap();
        assert_eq!((t3.from, t3.to), (OrderState::InProgress, OrderState::Completed));
    }

    #[test]
    fn cancel_from_completed_is_rejected() {
        let mut o = order();
        o.state = OrderState::Completed;
        let err = cancel(&mut o, Actor::Buyer, CancelPayload { cancellation_reason_id: "001".into() }).unwrap_err();
        assert!(matches!(err, OrderError::InvalidTransition { .. }));
        assert_eq!(o.state, OrderState::Completed);
    }

    #[test]
    fn cancel_with_unknown_reason_is_rejected_without_mutating_state() {
        let mut o = order();
        let err = cancel(&mut o, Actor::Buyer, CancelPayload { cancellation_reason_id: "999".into() }).unwrap_err();
        assert!(matches!(err, OrderError::UnknownReasonCode(_)));
        assert_eq!(o.state, OrderState::Created);
    }

    #[test]
    fn update_with_return_tag_transitions_to_returned() {
        use beckn_types::{Fulfillment, Tag, TagGroup};
        let mut o = order();
        o.state = OrderState::InProgress;
        let payload = UpdatePayload {
            billing: None,
            fulfillments: vec![Fulfillment {
                id: "f1".into(),
                r#type: None,
                state: None,
                tags: vec![TagGroup { code: "return_request".into(), list: vec![Tag { code: "x".into(), value: "y".into() }] }],
            }],
            reason_id: Some("009".into()),
        };
        let transition = update(&mut o, Actor::Seller, payload).unwrap().unwrap();
        assert_eq!(transition.to, OrderState::Returned);
        assert_eq!(o.cancellation_reason_code.as_deref(), Some("009"));
    }

    #[test]
    fn plain_update_does_not_log_transition() {
        let mut o = order();
        let payload = UpdatePayload { billing: None, fulfillments: vec![], reason_id: None };
        let result = update(&mut o, Actor::Buyer, payload).unwrap();
        assert!(result.is_none());
        assert_eq!(o.state, OrderState::Created);
    }

    #[test]
    fn rating_out_of_range_is_rejected() {
        assert!(rating(RatingPayload { value: 0 }).is_err());
        assert!(rating(RatingPayload { value: 6 }).is_err());
        assert!(rating(RatingPayload { value: 3 }).is_ok());
    }
}
