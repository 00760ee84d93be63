//! # X25519 ECIES
//!
//! `generateEncryptionKeyPair`/`encrypt`/`decrypt` per the subscriber
//! onboarding challenge-response: an ephemeral X25519 pair, a shared
//! secret via Diffie-Hellman, an HKDF-SHA256-derived AES-256-GCM key, and
//! a fixed wire layout of `ephemeral_pub(32) || iv(12) || authTag(16) ||
//! ciphertext(n)`. `x25519-dalek` is the `dalek-cryptography` sibling of
//! `ed25519-dalek`, used the same way the rest of this crate uses that
//! family.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::{engine::general_purpose::STANDARD, Engine};
use hkdf::Hkdf;
use rand::rngs::OsRng;
use sha2::Sha256;
use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::Zeroize;

use crate::errors::CryptoError;

const IV_LEN: usize = 12;
const TAG_LEN: usize = 16;
const PUB_LEN: usize = 32;

pub struct X25519KeyPair {
    secret: StaticSecret,
}

impl X25519KeyPair {
    /// `generateEncryptionKeyPair()`.
    pub fn generate() -> Self {
        Self { secret: StaticSecret::random_from_rng(OsRng) }
    }

    pub fn from_secret_b64(secret_b64: &str) -> Result<Self, CryptoError> {
        let bytes = STANDARD.decode(secret_b64).map_err(|e| CryptoError::Base64(e.to_string()))?;
        let bytes: [u8; 32] = bytes.try_into().map_err(|_| CryptoError::InvalidPrivateKey)?;
        Ok(Self { secret: StaticSecret::from(bytes) })
    }

    pub fn secret_b64(&self) -> String {
        STANDARD.encode(self.secret.to_bytes())
    }

    pub fn public_key_b64(&self) -> String {
        STANDARD.encode(PublicKey::from(&self.secret).to_bytes())
    }
}

impl Drop for X25519KeyPair {
    fn drop(&mut self) {
        let mut bytes = self.secret.to_bytes();
        bytes.zeroize();
    }
}

fn derive_key(shared_secret: &[u8; 32]) -> [u8; 32] {
    let hk = Hkdf::<Sha256>::new(None, shared_secret);
    let mut key = [0u8; 32];
    // The "info" label binds the derived key to this protocol's use,
    // mirroring how the rest of the ecosystem scopes HKDF output.
    hk.expand(b"beckn-subscriber-onboarding-aes-256-gcm", &mut key)
        .expect("32-byte output is within HKDF-SHA256's expand limit");
    key
}

/// `encrypt(plain, recipientPublicKey) -> b64`.
pub fn encrypt(plaintext: &[u8], recipient_public_key_b64: &str) -> Result<String, CryptoError> {
    let recipient_bytes = STANDARD
        .decode(recipient_public_key_b64)
        .map_err(|e| CryptoError::Base64(e.to_string()))?;
    let recipient_bytes: [u8; 32] =
        recipient_bytes.try_into().map_err(|_| CryptoError::InvalidPublicKey)?;
    let recipient_public = PublicKey::from(recipient_bytes);

    let ephemeral = StaticSecret::random_from_rng(OsRng);
    let ephemeral_public = PublicKey::from(&ephemeral);
    let shared_secret = ephemeral.diffie_hellman(&recipient_public);
    let key = derive_key(shared_secret.as_bytes());

    let cipher = Aes256Gcm::new((&key).into());
    let mut iv = [0u8; IV_LEN];
    rand::RngCore::fill_bytes(&mut OsRng, &mut iv);
    let nonce = Nonce::from_slice(&iv);

    let ct_with_tag =
        cipher.encrypt(nonce, plaintext).map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;
    let split_at = ct_with_tag.len() - TAG_LEN;
    let (ciphertext, tag) = ct_with_tag.split_at(split_at);

    let mut out = Vec::with_capacity(PUB_LEN + IV_LEN + TAG_LEN + ciphertext.len());
    out.extend_from_slice(ephemeral_public.as_bytes());
    out.extend_from_slice(&iv);
    out.extend_from_slice(tag);
    out.extend_from_slice(ciphertext);

    Ok(STANDARD.encode(out))
}

/// `decrypt(b64, recipientPrivateKey, _unused) -> plain`.
pub fn decrypt(b64: &str, recipient_key_pair: &X25519KeyPair) -> Result<Vec<u8>, CryptoError> {
    let raw = STANDARD.decode(b64).map_err(|e| CryptoError::Base64(e.to_string()))?;
    if raw.len() < PUB_LEN + IV_LEN + TAG_LEN {
        return Err(CryptoError::MalformedCiphertext("envelope shorter than fixed header".into()));
    }

    let (ephemeral_pub_bytes, rest) = raw.split_at(PUB_LEN);
    let (iv, rest) = rest.split_at(IV_LEN);
    let (tag, ciphertext) = rest.split_at(TAG_LEN);

    let ephemeral_pub_bytes: [u8; 32] =
        ephemeral_pub_bytes.try_into().map_err(|_| CryptoError::InvalidPublicKey)?;
    let ephemeral_public = PublicKey::from(ephemeral_pub_bytes);

    let shared_secret = recipient_key_pair.secret.diffie_hellman(&ephemeral_public);
    let key = derive_key(shared_secret.as_bytes());

    let cipher = Aes256Gcm::new((&key).into());
    let nonce = Nonce::from_slice(iv);

    let mut ct_with_tag = Vec::with_capacity(ciphertext.len() + TAG_LEN);
    ct_with_tag.extend_from_slice(ciphertext);
    ct_with_tag.extend_from_slice(tag);

    cipher
        .decrypt(nonce, ct_with_tag.as_slice())
        .map_err(|e| CryptoError::DecryptionFailed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encrypt_then_decrypt_roundtrips() {
        let kp = X25519KeyPair::generate();
        let sealed = encrypt(b"challenge-string", &kp.public_key_b64()).unwrap();
        let opened = decrypt(&sealed, &kp).unwrap();
        assert_eq!(opened, b"challenge-string");
    }

    #[test]
    fn wrong_recipient_key_fails_decrypt() {
        let kp1 = X25519KeyPair::generate();
        let kp2 = X25519KeyPair::generate();
        let sealed = encrypt(b"secret", &kp1.public_key_b64()).unwrap();
        assert!(decrypt(&sealed, &kp2).is_err());
    }

    #[test]
    fn tampered_ciphertext_fails_decrypt() {
        let kp = X25519KeyPair::generate();
        let sealed = encrypt(b"secret", &kp.public_key_b64()).unwrap();
        let mut raw = STANDARD.decode(&sealed).unwrap();
        let last = raw.len() - 1;
        raw[last] ^= 0xFF;
        let tampered = STANDARD.encode(raw);
        assert!(decrypt(&tampered, &kp).is_err());
    }

    #[test]
    fn secret_roundtrips_through_base64() {
        let kp = X25519KeyPair::generate();
        let restored = X25519KeyPair::from_secret_b64(&kp.secret_b64()).unwrap();
        assert_eq!(kp.public_key_b64(), restored.public_key_b64());
    }
}
