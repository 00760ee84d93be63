//! `POST /ondc/vlookup` (§4.4): a distinct, ONDC-specific signature
//! scheme — Ed25519 over a pipe-joined field tuple rather than the usual
//! digest-over-created/expires header.

use beckn_crypto::hashing::hash_body;
use beckn_crypto::signatures::{sign, verify, Ed25519KeyPair};
use beckn_types::{BecknError, Subscriber};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::errors::RegistryError;

#[derive(Debug, Clone, Deserialize)]
pub struct OndcSearchParameters {
    pub country: String,
    pub domain: String,
    pub r#type: String,
    pub city: String,
    #[serde(default)]
    pub subscriber_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OndcVlookupRequest {
    pub sender_subscriber_id: String,
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
    pub signature: String,
    pub search_parameters: OndcSearchParameters,
}

#[derive(Debug, Clone, Serialize)]
pub struct OndcVlookupResponse {
    pub subscriber_id: String,
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
    pub subscribers: Vec<Subscriber>,
    pub signature: String,
}

/// `country|domain|type|city|subscriber_id`, the exact field order the
/// sender signed over.
fn signing_payload(params: &OndcSearchParameters) -> String {
    format!(
        "{}|{}|{}|{}|{}",
        params.country,
        params.domain,
        params.r#type,
        params.city,
        params.subscriber_id.as_deref().unwrap_or(""),
    )
}

/// Rejects with the CONTEXT-ERROR signature code on mismatch, which the
/// HTTP layer maps to a 401 (§4.4: "Reject on invalid signature (401)").
pub fn verify_ondc_signature(req: &OndcVlookupRequest, sender_signing_public_key: &str) -> Result<(), RegistryError> {
    let payload = signing_payload(&req.search_parameters);
    if verify(payload.as_bytes(), &req.signature, sender_signing_public_key) {
        Ok(())
    } else {
        Err(RegistryError::InvalidSignature)
    }
}

/// Signs the registry's own response: a BLAKE-512 digest over the
/// canonical `{request_id, timestamp, subscribers}` body, Ed25519-signed
/// the same way every other signed payload in this workspace is — a
/// digest-then-sign, not a raw-bytes sign, so the signed surface doesn't
/// grow with the subscriber list's size.
pub fn sign_ondc_response(subscriber_id: &str, request_id: &str, timestamp: DateTime<Utc>, subscribers: &[Subscriber], key: &Ed25519KeyPair) -> Result<OndcVlookupResponse, BecknError> {
    let body = json!({ "request_id": request_id, "timestamp": timestamp, "subscribers": subscribers });
    let digest = hash_body(&body)
        .map_err(|e| BecknError::context(beckn_types::codes::CONTEXT_SIGNATURE_INVALID, e.to_string()))?;
    let signature = sign(digest.as_bytes(), key);
    Ok(OndcVlookupResponse { subscriber_id: subscriber_id.to_string(), request_id: request_id.to_string(), timestamp, subscribers: subscribers.to_vec(), signature })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_matching_payload_verifies() {
        let kp = Ed25519KeyPair::generate();
        let params = OndcSearchParameters { country: "IND".into(), domain: "ONDC:RET10".into(), r#type: "BPP".into(), city: "std:011".into(), subscriber_id: None };
        let signature = sign(signing_payload(&params).as_bytes(), &kp);
        let req = OndcVlookupRequest { sender_subscriber_id: "bap1".into(), request_id: "r1".into(), timestamp: Utc::now(), signature, search_parameters: params };
        assert!(verify_ondc_signature(&req, &kp.public_key_b64()).is_ok());
    }

    #[test]
    fn tampered_field_fails_verification() {
        let kp = Ed25519KeyPair::generate();
        let params = OndcSearchParameters { country: "IND".into(), domain: "ONDC:RET10".into(), r#type: "BPP".into(), city: "std:011".into(), subscriber_id: None };
        let signature = sign(signing_payload(&params).as_bytes(), &kp);
        let mut req = OndcVlookupRequest { sender_subscriber_id: "bap1".into(), request_id: "r1".into(), timestamp: Utc::now(), signature, search_parameters: params };
        req.search_parameters.city = "std:080".into();
        assert!(verify_ondc_signature(&req, &kp.public_key_b64()).is_err());
    }
}
