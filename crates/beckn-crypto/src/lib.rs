//! # Crypto primitives and auth header codec
//!
//! | Module | Algorithm | Use case |
//! |--------|-----------|----------|
//! | `signatures` | Ed25519 | `sign`/`verify` over request bodies |
//! | `hashing` | BLAKE2b-512 | canonical-JSON body digest (`hashBody`) |
//! | `ecies` | X25519 + HKDF-SHA256 + AES-256-GCM | subscriber onboarding challenge |
//! | `auth_header` | — | `Authorization`/`X-Gateway-Authorization` codec |

pub mod auth_header;
pub mod ecies;
pub mod errors;
pub mod hashing;
pub mod signatures;

pub use auth_header::{build_auth_header, parse_auth_header, verify_auth_header, ParsedAuthHeader};
pub use ecies::{decrypt, encrypt, X25519KeyPair};
pub use errors::CryptoError;
pub use hashing::{canonical_json_bytes, hash_body};
pub use signatures::{sign, verify, Ed25519KeyPair};
