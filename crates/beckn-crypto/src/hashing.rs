//! # Canonical JSON + BLAKE-512 body digest
//!
//! `hashBody` needs the same digest for the same logical body regardless of
//! the order a producer happened to serialize its fields in, so objects are
//! canonicalized (keys sorted, recursively, arrays left in order) before
//! hashing. [`blake2::Blake2b512`] is RustCrypto's 512-bit member of the
//! BLAKE2 family — the closest available crate to a literal BLAKE-512
//! hasher, and the same hashing family the protocol names.

use base64::{engine::general_purpose::STANDARD, Engine};
use blake2::{Blake2b512, Digest};
use serde_json::Value;

use crate::errors::CryptoError;

/// Recursively sort object keys so two JSON values that differ only in
/// field order canonicalize to the same bytes.
fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut sorted: std::collections::BTreeMap<String, Value> = std::collections::BTreeMap::new();
            for (k, v) in map {
                sorted.insert(k.clone(), canonicalize(v));
            }
            let mut out = serde_json::Map::new();
            for (k, v) in sorted {
                out.insert(k, v);
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

/// Canonical, compact JSON bytes for `body` (stable key ordering, no
/// incidental whitespace).
pub fn canonical_json_bytes(body: &Value) -> Result<Vec<u8>, CryptoError> {
    serde_json::to_vec(&canonicalize(body)).map_err(|e| CryptoError::CanonicalJson(e.to_string()))
}

/// `hashBody(body) -> digestB64`: canonical JSON of `body`, BLAKE-512 over
/// the UTF-8 bytes, base64-encoded (88 characters for the 64-byte digest).
pub fn hash_body(body: &Value) -> Result<String, CryptoError> {
    let bytes = canonical_json_bytes(body)?;
    let mut hasher = Blake2b512::new();
    hasher.update(&bytes);
    let digest = hasher.finalize();
    Ok(STANDARD.encode(digest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn digest_is_stable_across_key_order() {
        let a = json!({"b": 1, "a": 2});
        let b = json!({"a": 2, "b": 1});
        assert_eq!(hash_body(&a).unwrap(), hash_body(&b).unwrap());
    }

    #[test]
    fn digest_differs_on_value_change() {
        let a = json!({"a": 1});
        let b = json!({"a": 2});
        assert_ne!(hash_body(&a).unwrap(), hash_body(&b).unwrap());
    }

    #[test]
    fn digest_is_eighty_eight_characters() {
        let digest = hash_body(&json!({"x": "y"})).unwrap();
        assert_eq!(digest.len(), 88);
    }

    #[test]
    fn nested_object_key_order_does_not_affect_digest() {
        let a = json!({"outer": {"z": 1, "a": 2}, "top": true});
        let b = json!({"top": true, "outer": {"a": 2, "z": 1}});
        assert_eq!(hash_body(&a).unwrap(), hash_body(&b).unwrap());
    }
}
