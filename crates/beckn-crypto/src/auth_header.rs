//! # `Authorization` / `X-Gateway-Authorization` header codec
//!
//! Builds and verifies the signed header every Beckn request and callback
//! carries. The gateway stamps an additional `X-Gateway-Authorization`
//! with its own signature over the same body; that header uses the
//! identical format and is built/verified with the same two functions.

use beckn_types::{codes, BecknError};
use chrono::Utc;
use serde_json::Value;

use crate::hashing::hash_body;
use crate::signatures::{sign, verify, Ed25519KeyPair};

const EXPIRY_SECONDS: i64 = 300;
/// Clock-skew tolerance the verifier allows a `created` timestamp that
/// claims to be slightly in the future.
const CREATED_SKEW_SECONDS: i64 = 30;

fn signing_string(created: i64, expires: i64, digest_b64: &str) -> String {
    format!("(created): {created}\n(expires): {expires}\ndigest: BLAKE-512={digest_b64}")
}

/// `buildAuthHeader(sub, key_id, privKey, body)`.
pub fn build_auth_header(
    subscriber_id: &str,
    unique_key_id: &str,
    private_key: &Ed25519KeyPair,
    body: &Value,
) -> Result<String, BecknError> {
    let created = Utc::now().timestamp();
    let expires = created + EXPIRY_SECONDS;
    let digest_b64 = hash_body(body)
        .map_err(|e| BecknError::context(codes::CONTEXT_SIGNATURE_INVALID, e.to_string()))?;
    let signing_string = signing_string(created, expires, &digest_b64);
    let signature_b64 = sign(signing_string.as_bytes(), private_key);

    Ok(format!(
        "Signature keyId=\"{subscriber_id}|{unique_key_id}|ed25519\",algorithm=\"ed25519\",\
         created=\"{created}\",expires=\"{expires}\",headers=\"(created) (expires) digest\",\
         signature=\"{signature_b64}\""
    ))
}

/// The parsed fields of a `Signature ...` header value.
#[derive(Debug, Clone)]
pub struct ParsedAuthHeader {
    pub subscriber_id: String,
    pub unique_key_id: String,
    pub created: i64,
    pub expires: i64,
    pub signature_b64: String,
}

/// Parse `Signature keyId="a|b|ed25519",...,signature="..."` into its
/// component fields. Never panics on malformed input.
pub fn parse_auth_header(header: &str) -> Option<ParsedAuthHeader> {
    let rest = header.strip_prefix("Signature ")?;
    let mut key_id = None;
    let mut created = None;
    let mut expires = None;
    let mut signature = None;

    for field in split_quoted_fields(rest) {
        let (name, value) = field.split_once('=')?;
        let value = value.trim().trim_matches('"');
        match name.trim() {
            "keyId" => key_id = Some(value.to_string()),
            "created" => created = value.parse::<i64>().ok(),
            "expires" => expires = value.parse::<i64>().ok(),
            "signature" => signature = Some(value.to_string()),
            _ => {}
        }
    }

    let key_id = key_id?;
    let mut parts = key_id.splitn(3, '|');
    let subscriber_id = parts.next()?.to_string();
    let unique_key_id = parts.next()?.to_string();

    Some(ParsedAuthHeader {
        subscriber_id,
        unique_key_id,
        created: created?,
        expires: expires?,
        signature_b64: signature?,
    })
}

/// Split a comma-separated `name="value"` field list, tolerating commas
/// that appear inside a quoted value (none do in practice here, but the
/// header is otherwise free-form).
fn split_quoted_fields(s: &str) -> Vec<&str> {
    let mut fields = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(s[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    let last = s[start..].trim();
    if !last.is_empty() {
        fields.push(last);
    }
    fields
}

/// `verifyAuthHeader(header, body, pubKey)`. Rejects when any field is
/// missing, `expires < now`, `created > now + 30`, the signature doesn't
/// verify, or the recomputed body digest doesn't match what was signed —
/// the last three collapse to the same `CONTEXT_SIGNATURE_INVALID` code,
/// since a verifier can't distinguish "wrong key" from "wrong body" from
/// the header alone.
pub fn verify_auth_header(header: &str, body: &Value, public_key_b64: &str) -> Result<(), BecknError> {
    let parsed = parse_auth_header(header)
        .ok_or_else(|| BecknError::context(codes::CONTEXT_MALFORMED, "malformed Authorization header"))?;

    let now = Utc::now().timestamp();
    if parsed.expires < now {
        return Err(BecknError::signature_invalid());
    }
    if parsed.created > now + CREATED_SKEW_SECONDS {
        return Err(BecknError::signature_invalid());
    }

    let digest_b64 = hash_body(body)
        .map_err(|e| BecknError::context(codes::CONTEXT_SIGNATURE_INVALID, e.to_string()))?;
    let signing_string = signing_string(parsed.created, parsed.expires, &digest_b64);

    if verify(signing_string.as_bytes(), &parsed.signature_b64, public_key_b64) {
        Ok(())
    } else {
        Err(BecknError::signature_invalid())
    }
}
