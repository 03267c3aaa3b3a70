//! Cryptographic primitives for the key search.
//!
//! Provides the timestamp-seeded key generator and AES-GCM attempts.

pub mod aead;
pub mod kdf;
pub mod mt19937;

pub use aead::{AttemptOutcome, attempt, encrypt, generate_nonce};
pub use kdf::derive_key;
pub use mt19937::Mt19937;

/// Length of the AES-GCM nonce (16 bytes).
pub const NONCE_LEN: usize = 16;
/// Length of the authentication tag (16 bytes).
pub const TAG_LEN: usize = 16;
/// Length of the derived key (16 bytes / AES-128).
pub const KEY_LEN: usize = 16;
