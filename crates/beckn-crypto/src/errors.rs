//! Crypto error types. Kept separate from [`beckn_types::BecknError`]: this
//! crate never decides which taxonomy code a failure maps to, it only
//! reports what went wrong. `verify`/`verify_auth_header` never propagate
//! these — they collapse every variant to `false`/`Err` at their own
//! boundary, matching the no-throw contract.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("invalid private key")]
    InvalidPrivateKey,

    #[error("invalid signature encoding")]
    InvalidSignatureFormat,

    #[error("signature verification failed")]
    SignatureVerificationFailed,

    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("malformed ciphertext envelope: {0}")]
    MalformedCiphertext(String),

    #[error("base64 decode failed: {0}")]
    Base64(String),

    #[error("canonical JSON encoding failed: {0}")]
    CanonicalJson(String),
}
