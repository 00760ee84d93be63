//! # Order-action dispatch (§4.7 step 4)
//!
//! Routes an inbound `select|init|confirm|cancel|update|rating` envelope
//! into `beckn_orders::machine`, serialized per `transaction_id` through
//! the shared lock table so concurrent calls on the same transaction
//! never race (§4.7 scheduling, §5).

use std::sync::Arc;

use beckn_orders::{
    machine, Actor, CancelPayload, ConfirmPayload, InitPayload, Order, OrderError, OrderRepository, RatingPayload,
    SelectPayload, StateTransition, TransactionLockTable, UpdatePayload,
};
use beckn_types::{codes, BecknError, Context};
use serde_json::Value;

use crate::domain::errors::BppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutatingAction {
    Select,
    Init,
    Confirm,
    Cancel,
    Update,
    Rating,
}

impl MutatingAction {
    pub fn parse(action: &str) -> Option<Self> {
        match action {
            "select" => Some(Self::Select),
            "init" => Some(Self::Init),
            "confirm" => Some(Self::Confirm),
            "cancel" => Some(Self::Cancel),
            "update" => Some(Self::Update),
            "rating" => Some(Self::Rating),
            _ => None,
        }
    }
}

/// The order as it now stands (already persisted) plus the transition it
/// logged, if the action moved the state machine.
pub struct ActionOutcome {
    pub order: Order,
    pub transition: Option<StateTransition>,
}

pub async fn process_order_action(
    action: MutatingAction,
    context: &Context,
    message: &Value,
    order_repo: &Arc<dyn OrderRepository>,
    locks: &TransactionLockTable,
) -> Result<ActionOutcome, BppError> {
    let _guard = locks.lock(context.transaction_id).await;

    if action == MutatingAction::Select {
        let payload: SelectPayload = parse_message(message)?;
        let bpp_id = context.bpp_id.clone().ok_or_else(|| BppError::MissingCounterparty(context.action.clone()))?;
        let mut order = Order::new(
            context.transaction_id.to_string(),
            context.transaction_id,
            context.bap_id.clone(),
            bpp_id,
            context.domain.clone(),
            context.city.clone(),
        );
        machine::select(&mut order, payload);
        order_repo.insert(order.clone()).await?;
        return Ok(ActionOutcome { order, transition: None });
    }

    let mut order =
        order_repo.get_by_transaction_id(context.transaction_id).await?.ok_or(OrderError::NotFound(context.transaction_id))?;

    let transition = match action {
        MutatingAction::Select => unreachable!("handled above"),
        MutatingAction::Init => {
            let payload: InitPayload = parse_message(message)?;
            machine::init(&mut order, payload);
            None
        }
        MutatingAction::Confirm => {
            let payload: ConfirmPayload = parse_message(message)?;
            Some(machine::confirm(&mut order, payload)?)
        }
        MutatingAction::Cancel => {
            let payload: CancelPayload = parse_message(message)?;
            Some(machine::cancel(&mut order, Actor::Buyer, payload)?)
        }
        MutatingAction::Update => {
            let payload: UpdatePayload = parse_message(message)?;
            machine::update(&mut order, Actor::Buyer, payload)?
        }
        MutatingAction::Rating => {
            let payload: RatingPayload = parse_message(message)?;
            machine::rating(payload)?;
            None
        }
    };

    order_repo.save(order.clone()).await?;
    if let Some(t) = &transition {
        order_repo.append_transition(t.clone()).await?;
    }

    Ok(ActionOutcome { order, transition })
}

fn parse_message<T: serde::de::DeserializeOwned>(message: &Value) -> Result<T, BppError> {
    serde_json::from_value(message.clone())
        .map_err(|e| BppError::Beckn(BecknError::context(codes::CONTEXT_MALFORMED, e.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use beckn_orders::InMemoryOrderRepository;
    use beckn_types::ContextBuilder;
    use serde_json::json;
    use uuid::Uuid;

    fn ctx(action: &str, transaction_id: Uuid) -> Context {
        ContextBuilder {
            domain: "ONDC:RET10".into(),
            country: "IND".into(),
            city: "std:011".into(),
            action: action.into(),
            core_version: "1.2.0".into(),
            bap_id: "bap1.example.com".into(),
            bap_uri: "https://bap1.example.com".into(),
            bpp_id: Some("bpp1.example.com".into()),
            bpp_uri: Some("https://bpp1.example.com".into()),
            transaction_id: Some(transaction_id),
            ttl: None,
            max_callbacks: None,
        }
        .build()
    }

    #[tokio::test]
    async fn select_then_confirm_moves_state_to_accepted() {
        let repo: Arc<dyn OrderRepository> = Arc::new(InMemoryOrderRepository::new());
        let locks = TransactionLockTable::new();
        let txn = Uuid::new_v4();

        let outcome = process_order_action(MutatingAction::Select, &ctx("select", txn), &json!({}), &repo, &locks).await.unwrap();
        assert!(outcome.transition.is_none());

        let outcome =
            process_order_action(MutatingAction::Confirm, &ctx("confirm", txn), &json!({}), &repo, &locks).await.unwrap();
        let transition = outcome.transition.unwrap();
        assert_eq!(transition.to, beckn_orders::OrderState::Accepted);
    }

    #[tokio::test]
    async fn confirm_without_prior_select_is_not_found() {
        let repo: Arc<dyn OrderRepository> = Arc::new(InMemoryOrderRepository::new());
        let locks = TransactionLockTable::new();
        let txn = Uuid::new_v4();
        let err = process_order_action(MutatingAction::Confirm, &ctx("confirm", txn), &json!({}), &repo, &locks).await.unwrap_err();
        assert!(matches!(err, BppError::Order(OrderError::NotFound(_))));
    }
}
