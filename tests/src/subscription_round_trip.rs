//! §8 scenario 1: a subscriber onboards through the challenge-response
//! flow and becomes visible to `/lookup` only once `SUBSCRIBED`.

#[cfg(test)]
mod tests {
    use beckn_crypto::ecies::{self, X25519KeyPair};
    use beckn_registry::{apply_filter, on_subscribe, subscribe, LookupFilter, OnSubscribeRequest, SubscribeRequest, SubscriberRepository};
    use beckn_types::{SubscriberStatus, SubscriberType};
    use chrono::Utc;

    fn subscribe_request(encr_public_key: String) -> SubscribeRequest {
        SubscribeRequest {
            subscriber_id: "bap.example.com".into(),
            subscriber_url: "https://bap.example.com/beckn".into(),
            r#type: SubscriberType::Bap,
            domain: "ONDC:RET10".into(),
            city: "std:011".into(),
            signing_public_key: "sig-pub-b64".into(),
            encr_public_key,
            unique_key_id: "k1".into(),
        }
    }

    #[tokio::test]
    async fn subscribe_then_on_subscribe_makes_subscriber_lookupable() {
        let repo = beckn_registry::InMemorySubscriberRepository::new();
        let encr_keypair = X25519KeyPair::generate();
        let now = Utc::now();

        let (subscriber, pending, response) = subscribe(None, subscribe_request(encr_keypair.public_key_b64()), now).unwrap();
        assert_eq!(response.status, "INITIATED");
        repo.upsert(subscriber).await.unwrap();
        repo.put_pending_challenge(pending).await.unwrap();

        let filter = LookupFilter { subscriber_id: Some("bap.example.com".into()), ..Default::default() };
        let subs = repo.list().await.unwrap();
        let extensions = repo.list_domain_extensions().await.unwrap();
        assert!(apply_filter(&subs, &extensions, &filter, Utc::now()).is_empty());

        let answer_plaintext = ecies::decrypt(&response.challenge, &encr_keypair).unwrap();
        let on_subscribe_req = OnSubscribeRequest {
            subscriber_id: "bap.example.com".into(),
            answer: String::from_utf8(answer_plaintext).unwrap(),
        };

        let pending = repo.take_pending_challenge(&on_subscribe_req.subscriber_id).await.unwrap().unwrap();
        let mut subscriber = repo.get(&on_subscribe_req.subscriber_id).await.unwrap().unwrap();
        on_subscribe(&mut subscriber, &pending, &on_subscribe_req.answer, Utc::now()).unwrap();
        assert_eq!(subscriber.status, SubscriberStatus::Subscribed);
        repo.upsert(subscriber).await.unwrap();

        let subs = repo.list().await.unwrap();
        let extensions = repo.list_domain_extensions().await.unwrap();
        let matches = apply_filter(&subs, &extensions, &filter, Utc::now());
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].subscriber_id, "bap.example.com");
        assert_eq!(matches[0].status, SubscriberStatus::Subscribed);
        assert!(matches[0].valid_until > matches[0].valid_from);
    }

    #[tokio::test]
    async fn wrong_answer_leaves_subscriber_unreachable_via_lookup() {
        let repo = beckn_registry::InMemorySubscriberRepository::new();
        let encr_keypair = X25519KeyPair::generate();
        let now = Utc::now();

        let (subscriber, pending, _response) = subscribe(None, subscribe_request(encr_keypair.public_key_b64()), now).unwrap();
        repo.upsert(subscriber).await.unwrap();
        repo.put_pending_challenge(pending.clone()).await.unwrap();

        let mut subscriber = repo.get("bap.example.com").await.unwrap().unwrap();
        let err = on_subscribe(&mut subscriber, &pending, "not-the-right-answer", Utc::now()).unwrap_err();
        assert!(matches!(err, beckn_registry::RegistryError::ChallengeMismatch));

        let filter = LookupFilter { subscriber_id: Some("bap.example.com".into()), ..Default::default() };
        let subs = repo.list().await.unwrap();
        assert!(apply_filter(&subs, &[], &filter, Utc::now()).is_empty());
    }
}
