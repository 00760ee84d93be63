//! §8 scenario 2: a `search` reaches every matching `SUBSCRIBED` BPP
//! exactly once per `message_id`, each under a freshly minted envelope.

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::{Duration, Instant};

    use beckn_context::MessageDedup;
    use beckn_gateway::worker::{spawn_workers, FanoutJob, GatewayIdentity};
    use beckn_gateway::{envelope_for_bpp, matching_bpps};
    use beckn_net::{DispatchResponse, HttpDispatcher, NetError};
    use beckn_types::{ContextBuilder, Envelope, Subscriber, SubscriberStatus, SubscriberType};
    use chrono::{Duration as ChronoDuration, Utc};
    use serde_json::Value;

    struct RecordingDispatcher {
        calls: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait::async_trait]
    impl HttpDispatcher for RecordingDispatcher {
        async fn post_json(&self, url: &str, _headers: &[(String, String)], _body: &Value) -> Result<DispatchResponse, NetError> {
            self.calls.lock().unwrap().push(url.to_string());
            Ok(DispatchResponse { status: 200, body: Value::Null })
        }
    }

    fn bpp(id: &str, city: &str, status: SubscriberStatus) -> Subscriber {
        let now = Utc::now();
        Subscriber {
            subscriber_id: id.into(),
            subscriber_url: format!("https://{id}"),
            r#type: SubscriberType::Bpp,
            signing_public_key: "x".into(),
            encr_public_key: "y".into(),
            unique_key_id: "k1".into(),
            domain: "ONDC:RET10".into(),
            city: city.into(),
            status,
            valid_from: now - ChronoDuration::days(1),
            valid_until: now + ChronoDuration::days(1),
        }
    }

    fn search_context() -> beckn_types::Context {
        ContextBuilder {
            domain: "ONDC:RET10".into(),
            country: "IND".into(),
            city: "std:011".into(),
            action: "search".into(),
            core_version: "1.2.0".into(),
            bap_id: "bap1.example.com".into(),
            bap_uri: "https://bap1.example.com".into(),
            bpp_id: None,
            bpp_uri: None,
            transaction_id: None,
            ttl: Some("PT30S".into()),
            max_callbacks: None,
        }
        .build()
    }

    #[tokio::test]
    async fn search_reaches_every_matching_bpp_with_distinct_message_ids() {
        let subscribers = vec![
            bpp("bpp1.example.com", "std:011", SubscriberStatus::Subscribed),
            bpp("bpp2.example.com", "std:011", SubscriberStatus::Subscribed),
            bpp("bpp3.example.com", "std:080", SubscriberStatus::Subscribed),
        ];

        let ctx = search_context();
        let matched = matching_bpps(&subscribers, &[], &ctx);
        assert_eq!(matched.len(), 2);

        let original = Envelope::new(ctx.clone(), serde_json::json!({"intent": {"category_id": "grocery"}}));
        let jobs: Vec<FanoutJob> = matched
            .iter()
            .map(|b| FanoutJob {
                target_url: format!("{}/search", b.subscriber_url),
                envelope: envelope_for_bpp(&original),
                deadline: Instant::now() + Duration::from_secs(5),
            })
            .collect();

        let message_ids: Vec<_> = jobs.iter().map(|j| j.envelope.context.message_id).collect();
        assert_ne!(message_ids[0], message_ids[1]);
        assert!(jobs.iter().all(|j| j.envelope.context.transaction_id == ctx.transaction_id));

        let calls = Arc::new(Mutex::new(Vec::new()));
        let dispatcher: Arc<dyn HttpDispatcher> = Arc::new(RecordingDispatcher { calls: calls.clone() });
        let identity = Arc::new(GatewayIdentity {
            subscriber_id: "gateway.local".into(),
            unique_key_id: "gw-key-1".into(),
            signing_key: beckn_crypto::signatures::Ed25519KeyPair::generate(),
        });
        let tx = spawn_workers(2, dispatcher, identity, 16);
        for job in jobs {
            tx.send(job).await.unwrap();
        }
        drop(tx);
        tokio::time::sleep(Duration::from_millis(100)).await;

        let delivered = calls.lock().unwrap().clone();
        assert_eq!(delivered.len(), 2);
        assert!(delivered.contains(&"https://bpp1.example.com/search".to_string()));
        assert!(delivered.contains(&"https://bpp2.example.com/search".to_string()));
    }

    #[tokio::test]
    async fn repeated_message_id_is_suppressed_before_fan_out() {
        let dedup = MessageDedup::new();
        let message_id = uuid::Uuid::new_v4();

        let fanout_count = AtomicUsize::new(0);
        for _ in 0..2 {
            if dedup.check_and_record(message_id) {
                fanout_count.fetch_add(1, Ordering::SeqCst);
            }
        }

        assert_eq!(fanout_count.load(Ordering::SeqCst), 1);
    }
}
