//! Challenge-response onboarding (§4.4 `/subscribe`, `/on_subscribe`).

use base64::{engine::general_purpose::STANDARD, Engine};
use beckn_crypto::ecies;
use beckn_types::{Subscriber, SubscriberStatus};
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;

use crate::domain::errors::RegistryError;
use crate::domain::types::{PendingChallenge, SubscribeRequest, SubscribeResponse, VALIDITY_PERIOD_DAYS};

/// Build (or re-seat) the subscriber record for `/subscribe` and seal a
/// fresh challenge under its `encr_public_key`.
///
/// The persisted `status` lands on `UNDER_SUBSCRIPTION` (the record has
/// moved past the bare `INITIATED` registration) while the response body
/// still reports `status: "INITIATED"`, matching the documented wire
/// contract.
pub fn subscribe(existing: Option<&Subscriber>, req: SubscribeRequest, now: DateTime<Utc>) -> Result<(Subscriber, PendingChallenge, SubscribeResponse), RegistryError> {
    if let Some(existing) = existing {
        if existing.status == SubscriberStatus::Subscribed {
            return Err(RegistryError::AlreadySubscribed(req.subscriber_id));
        }
    }

    let subscriber = Subscriber {
        subscriber_id: req.subscriber_id.clone(),
        subscriber_url: req.subscriber_url,
        r#type: req.r#type,
        signing_public_key: req.signing_public_key,
        encr_public_key: req.encr_public_key.clone(),
        unique_key_id: req.unique_key_id,
        domain: req.domain,
        city: req.city,
        status: SubscriberStatus::UnderSubscription,
        valid_from: now,
        valid_until: now,
    };

    let mut nonce = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut nonce);
    let plaintext_b64 = STANDARD.encode(nonce);
    let sealed = ecies::encrypt(plaintext_b64.as_bytes(), &req.encr_public_key)
        .map_err(|e| RegistryError::Storage(e.to_string()))?;

    let pending = PendingChallenge { subscriber_id: req.subscriber_id, plaintext_b64, created_at: now };
    let response = SubscribeResponse { status: "INITIATED", challenge: sealed };

    Ok((subscriber, pending, response))
}

/// `/on_subscribe`: the caller has decrypted the challenge and returns the
/// plaintext. A match promotes the subscriber to `SUBSCRIBED` with a
/// fresh one-year validity window; a mismatch leaves the record as-is and
/// is the caller's job to audit as a failure.
pub fn on_subscribe(subscriber: &mut Subscriber, pending: &PendingChallenge, answer_b64: &str, now: DateTime<Utc>) -> Result<(), RegistryError> {
    if pending.plaintext_b64 != answer_b64 {
        return Err(RegistryError::ChallengeMismatch);
    }
    subscriber.status = SubscriberStatus::Subscribed;
    subscriber.valid_from = now;
    subscriber.valid_until = now + Duration::days(VALIDITY_PERIOD_DAYS);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use beckn_crypto::ecies::X25519KeyPair;
    use beckn_types::SubscriberType;

    fn req(encr_public_key: String) -> SubscribeRequest {
        SubscribeRequest {
            subscriber_id: "bap.example.com".into(),
            subscriber_url: "https://bap.example.com/beckn".into(),
            r#type: SubscriberType::Bap,
            domain: "ONDC:RET10".into(),
            city: "std:011".into(),
            signing_public_key: "sig-pub".into(),
            encr_public_key,
            unique_key_id: "k1".into(),
        }
    }

    #[test]
    fn subscribe_seals_challenge_decryptable_by_caller() {
        let kp = X25519KeyPair::generate();
        let (subscriber, pending, response) = subscribe(None, req(kp.public_key_b64()), Utc::now()).unwrap();
        assert_eq!(subscriber.status, SubscriberStatus::UnderSubscription);
        assert_eq!(response.status, "INITIATED");
        let decrypted = ecies::decrypt(&response.challenge, &kp).unwrap();
        assert_eq!(String::from_utf8(decrypted).unwrap(), pending.plaintext_b64);
    }

    #[test]
    fn subscribe_rejects_already_subscribed() {
        let kp = X25519KeyPair::generate();
        let mut existing = subscribe(None, req(kp.public_key_b64()), Utc::now()).unwrap().0;
        existing.status = SubscriberStatus::Subscribed;
        let err = subscribe(Some(&existing), req(kp.public_key_b64()), Utc::now()).unwrap_err();
        assert!(matches!(err, RegistryError::AlreadySubscribed(_)));
    }

    #[test]
    fn on_subscribe_matching_answer_promotes_to_subscribed() {
        let kp = X25519KeyPair::generate();
        let (mut subscriber, pending, response) = subscribe(None, req(kp.public_key_b64()), Utc::now()).unwrap();
        let answer = String::from_utf8(ecies::decrypt(&response.challenge, &kp).unwrap()).unwrap();
        on_subscribe(&mut subscriber, &pending, &answer, Utc::now()).unwrap();
        assert_eq!(subscriber.status, SubscriberStatus::Subscribed);
        assert!(subscriber.valid_until > subscriber.valid_from);
    }

    #[test]
    fn on_subscribe_mismatched_answer_leaves_status_unchanged() {
        let kp = X25519KeyPair::generate();
        let (mut subscriber, pending, _response) = subscribe(None, req(kp.public_key_b64()), Utc::now()).unwrap();
        let err = on_subscribe(&mut subscriber, &pending, "wrong-answer", Utc::now()).unwrap_err();
        assert!(matches!(err, RegistryError::ChallengeMismatch));
        assert_eq!(subscriber.status, SubscriberStatus::UnderSubscription);
    }
}
