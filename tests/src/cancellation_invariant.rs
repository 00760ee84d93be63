//! §8 scenario 4: `cancel` from `COMPLETED` is rejected and leaves the
//! order's state untouched.

#[cfg(test)]
mod tests {
    use beckn_orders::machine::cancel;
    use beckn_orders::{Actor, CancelPayload, Order, OrderError, OrderState};
    use uuid::Uuid;

    #[tokio::test]
    async fn cancel_from_completed_is_rejected_and_state_is_unchanged() {
        let mut order = Order::new("O-2", Uuid::new_v4(), "bap1.example.com", "bpp1.example.com", "ONDC:RET10", "std:011");
        order.state = OrderState::Completed;

        let err = cancel(&mut order, Actor::Buyer, CancelPayload { cancellation_reason_id: "001".into() }).unwrap_err();
        assert!(matches!(err, OrderError::InvalidTransition { from: OrderState::Completed, .. }));
        assert_eq!(order.state, OrderState::Completed);

        let beckn_error: beckn_types::BecknError = err.into();
        assert_eq!(beckn_error.code, beckn_types::codes::BUSINESS_INVALID_TRANSITION);
    }
}
