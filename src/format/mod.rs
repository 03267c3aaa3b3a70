//! Ciphertext container format.
//!
//! ```text
//! NONCE (16) | TAG (16) | CIPHERTEXT
//! ```

use std::path::Path;

use anyhow::{Context, Result};

use crate::{
    FormatError,
    crypto::{self, NONCE_LEN, TAG_LEN},
};

/// Length of the fixed header preceding the ciphertext body.
pub const HEADER_LEN: usize = NONCE_LEN + TAG_LEN;

/// A parsed ciphertext file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CiphertextContainer {
    nonce: [u8; NONCE_LEN],
    tag: [u8; TAG_LEN],
    body: Vec<u8>,
}

impl CiphertextContainer {
    pub fn new(nonce: [u8; NONCE_LEN], tag: [u8; TAG_LEN], body: Vec<u8>) -> Self {
        Self { nonce, tag, body }
    }

    /// Splits raw file bytes into nonce, tag and body.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::TooShort`] if `data` is shorter than the header.
    /// A file of exactly [`HEADER_LEN`] bytes has an empty body.
    pub fn parse(data: &[u8]) -> Result<Self, FormatError> {
        if data.len() < HEADER_LEN {
            return Err(FormatError::TooShort {
                len: data.len(),
                min: HEADER_LEN,
            });
        }

        let (nonce, rest) = data.split_at(NONCE_LEN);
        let (tag, body) = rest.split_at(TAG_LEN);

        let mut container = Self::new([0u8; NONCE_LEN], [0u8; TAG_LEN], body.to_vec());
        container.nonce.copy_from_slice(nonce);
        container.tag.copy_from_slice(tag);
        Ok(container)
    }

    /// Reads the whole file at `path` and parses it.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)
            .with_context(|| format!("failed to read ciphertext file {}", path.display()))?;
        let container = Self::parse(&data)
            .with_context(|| format!("invalid ciphertext file {}", path.display()))?;
        Ok(container)
    }

    /// Encrypts `plaintext` the way the weak tool did: key from the
    /// generator seeded with `timestamp`, fresh random nonce.
    pub fn seal(timestamp: i64, plaintext: &[u8]) -> Result<Self> {
        let nonce = crypto::generate_nonce()?;
        Self::seal_with_nonce(timestamp, nonce, plaintext)
    }

    /// Like [`seal`](Self::seal) with a caller-chosen nonce.
    pub fn seal_with_nonce(
        timestamp: i64,
        nonce: [u8; NONCE_LEN],
        plaintext: &[u8],
    ) -> Result<Self> {
        let key = crypto::derive_key(timestamp);
        let (body, tag) = crypto::encrypt(&key[..], &nonce, plaintext)?;
        Ok(Self::new(nonce, tag, body))
    }

    /// Serializes back to the on-disk layout.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(HEADER_LEN + self.body.len());
        buf.extend_from_slice(&self.nonce);
        buf.extend_from_slice(&self.tag);
        buf.extend_from_slice(&self.body);
        buf
    }

    pub fn nonce(&self) -> &[u8; NONCE_LEN] {
        &self.nonce
    }

    pub fn tag(&self) -> &[u8; TAG_LEN] {
        &self.tag
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}
