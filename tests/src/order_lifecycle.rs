//! §8 scenario 3: select → init → confirm → BPP-internal progress →
//! completed, with exactly three logged transitions beyond the initial
//! insertion.

#[cfg(test)]
mod tests {
    use beckn_orders::machine::{advance, confirm, init, select};
    use beckn_orders::{Order, OrderRepository, OrderState};
    use beckn_types::{Payment, PaymentStatus, Price, Quote};
    use uuid::Uuid;

    #[tokio::test]
    async fn select_init_confirm_progress_complete_logs_exactly_three_transitions() {
        let repo = beckn_orders::InMemoryOrderRepository::new();
        let transaction_id = Uuid::new_v4();
        let mut order = Order::new("O-1", transaction_id, "bap1.example.com", "bpp1.example.com", "ONDC:RET10", "std:011");

        select(&mut order, beckn_orders::SelectPayload { provider: None, items: vec![], fulfillments: vec![] });
        assert_eq!(order.state, OrderState::Created);
        repo.insert(order.clone()).await.unwrap();

        let mut order = repo.get_by_transaction_id(transaction_id).await.unwrap().unwrap();
        init(&mut order, beckn_orders::InitPayload { billing: None, fulfillments: vec![] });
        assert_eq!(order.state, OrderState::Created);
        repo.save(order.clone()).await.unwrap();

        let payment = Payment { status: Some(PaymentStatus::Paid), collected_by: Some("BPP".into()), r#type: Some("ON-ORDER".into()) };
        let quote = Quote { price: Some(Price { currency: "INR".into(), value: "250".into() }), breakup: vec![] };
        let t1 = confirm(&mut order, beckn_orders::ConfirmPayload { payment: Some(payment), quote: Some(quote) }).unwrap();
        assert_eq!((t1.from, t1.to), (OrderState::Created, OrderState::Accepted));
        repo.save(order.clone()).await.unwrap();
        repo.append_transition(t1).await.unwrap();

        // Reflects the state at this point, as an inbound `status` action would observe.
        let observed = repo.get_by_transaction_id(transaction_id).await.unwrap().unwrap();
        assert_eq!(observed.state, OrderState::Accepted);
        assert!(observed.payment.as_ref().map(|p| p.status) == Some(Some(PaymentStatus::Paid)));

        let t2 = advance(&mut order, OrderState::InProgress, serde_json::json!({})).unwrap();
        assert_eq!((t2.from, t2.to), (OrderState::Accepted, OrderState::InProgress));
        repo.save(order.clone()).await.unwrap();
        repo.append_transition(t2).await.unwrap();

        let t3 = advance(&mut order, OrderState::Completed, serde_json::json!({})).unwrap();
        assert_eq!((t3.from, t3.to), (OrderState::InProgress, OrderState::Completed));
        repo.save(order.clone()).await.unwrap();
        repo.append_transition(t3).await.unwrap();

        let transitions = repo.list_transitions("O-1").await.unwrap();
        assert_eq!(transitions.len(), 3);
        assert_eq!(
            transitions.iter().map(|t| (t.from, t.to)).collect::<Vec<_>>(),
            vec![
                (OrderState::Created, OrderState::Accepted),
                (OrderState::Accepted, OrderState::InProgress),
                (OrderState::InProgress, OrderState::Completed),
            ]
        );

        let final_order = repo.get_by_order_id("O-1").await.unwrap().unwrap();
        assert_eq!(final_order.state, OrderState::Completed);
    }
}
