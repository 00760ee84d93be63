//! # Ed25519 signing
//!
//! Deterministic Ed25519 over raw message bytes. `verify` is the one
//! function in this crate the rest of the workspace is allowed to treat as
//! infallible: any decode failure, any malformed key or signature, folds
//! into `false` rather than an error, matching the protocol's no-throw
//! contract for signature checks.

use base64::{engine::general_purpose::STANDARD, Engine};
use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use zeroize::Zeroize;

use crate::errors::CryptoError;

/// An Ed25519 keypair held only long enough to sign or to hand out its
/// public key; the signing key is zeroized on drop.
pub struct Ed25519KeyPair {
    signing_key: SigningKey,
}

impl Ed25519KeyPair {
    pub fn generate() -> Self {
        Self { signing_key: SigningKey::generate(&mut rand::thread_rng()) }
    }

    /// Construct from a 32-byte seed, as stored at rest.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self { signing_key: SigningKey::from_bytes(seed) }
    }

    pub fn from_seed_b64(seed_b64: &str) -> Result<Self, CryptoError> {
        let bytes = STANDARD.decode(seed_b64).map_err(|e| CryptoError::Base64(e.to_string()))?;
        let seed: [u8; 32] = bytes.try_into().map_err(|_| CryptoError::InvalidPrivateKey)?;
        Ok(Self::from_seed(&seed))
    }

    pub fn seed_b64(&self) -> String {
        STANDARD.encode(self.signing_key.to_bytes())
    }

    pub fn public_key_b64(&self) -> String {
        STANDARD.encode(self.signing_key.verifying_key().to_bytes())
    }
}

impl Drop for Ed25519KeyPair {
    fn drop(&mut self) {
        let mut bytes = self.signing_key.to_bytes();
        bytes.zeroize();
    }
}

/// `sign(message, privateKey) -> signatureB64`.
pub fn sign(message: &[u8], key_pair: &Ed25519KeyPair) -> String {
    let sig = key_pair.signing_key.sign(message);
    STANDARD.encode(sig.to_bytes())
}

/// `verify(message, signatureB64, publicKeyB64) -> bool`. Never returns an
/// error; any malformed input is simply not a valid signature.
pub fn verify(message: &[u8], signature_b64: &str, public_key_b64: &str) -> bool {
    verify_inner(message, signature_b64, public_key_b64).unwrap_or(false)
}

fn verify_inner(message: &[u8], signature_b64: &str, public_key_b64: &str) -> Option<bool> {
    let sig_bytes = STANDARD.decode(signature_b64).ok()?;
    let sig_bytes: [u8; 64] = sig_bytes.try_into().ok()?;
    let signature = ed25519_dalek::Signature::from_bytes(&sig_bytes);

    let key_bytes = STANDARD.decode(public_key_b64).ok()?;
    let key_bytes: [u8; 32] = key_bytes.try_into().ok()?;
    let verifying_key = VerifyingKey::from_bytes(&key_bytes).ok()?;

    Some(verifying_key.verify(message, &signature).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_then_verify_succeeds() {
        let kp = Ed25519KeyPair::generate();
        let sig = sign(b"hello beckn", &kp);
        assert!(verify(b"hello beckn", &sig, &kp.public_key_b64()));
    }

    #[test]
    fn tampered_message_fails_verify() {
        let kp = Ed25519KeyPair::generate();
        let sig = sign(b"original", &kp);
        assert!(!verify(b"tampered", &sig, &kp.public_key_b64()));
    }

    #[test]
    fn wrong_key_fails_verify() {
        let kp1 = Ed25519KeyPair::generate();
        let kp2 = Ed25519KeyPair::generate();
        let sig = sign(b"data", &kp1);
        assert!(!verify(b"data", &sig, &kp2.public_key_b64()));
    }

    #[test]
    fn malformed_signature_returns_false_not_panic() {
        let kp = Ed25519KeyPair::generate();
        assert!(!verify(b"data", "not-base64!!", &kp.public_key_b64()));
        assert!(!verify(b"data", "", &kp.public_key_b64()));
    }

    #[test]
    fn seed_roundtrip_preserves_public_key() {
        let kp = Ed25519KeyPair::generate();
        let restored = Ed25519KeyPair::from_seed_b64(&kp.seed_b64()).unwrap();
        assert_eq!(kp.public_key_b64(), restored.public_key_b64());
    }
}
