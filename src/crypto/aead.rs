use super::{NONCE_LEN, TAG_LEN};
use aes_gcm::{
    AesGcm, KeyInit, Nonce, Tag,
    aead::{AeadInPlace, consts::U16},
    aes::Aes128,
};
use anyhow::{Result, anyhow};
use getrandom::fill;
use zeroize::Zeroizing;

/// AES-128-GCM with the 16-byte nonce used by the container format.
type Aes128Gcm16 = AesGcm<Aes128, U16>;

/// Outcome of decrypting the container under one candidate key.
#[derive(Debug, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Tag verified; holds the plaintext.
    Verified(Vec<u8>),
    /// Tag did not match. The expected result for every wrong key.
    Mismatch,
    /// The cipher could not be set up for this key/nonce/tag.
    MalformedAttempt,
}

/// Fill buffer with cryptographically secure random bytes
fn secure_random(buf: &mut [u8]) -> Result<()> {
    fill(buf).map_err(|_| anyhow!("OS random generator unavailable"))
}

/// Generate nonce
pub fn generate_nonce() -> Result<[u8; NONCE_LEN]> {
    let mut nonce = [0u8; NONCE_LEN];
    secure_random(&mut nonce)?;
    Ok(nonce)
}

/// Encrypt plaintext, returning the ciphertext body and the detached tag
pub fn encrypt(
    key: &[u8],
    nonce: &[u8; NONCE_LEN],
    plaintext: &[u8],
) -> Result<(Vec<u8>, [u8; TAG_LEN])> {
    let cipher = Aes128Gcm16::new_from_slice(key).map_err(|_| anyhow!("invalid key length"))?;

    let mut body = plaintext.to_vec();
    let tag = cipher
        .encrypt_in_place_detached(Nonce::<U16>::from_slice(nonce), b"", &mut body)
        .map_err(|_| anyhow!("encryption failed"))?;

    let mut detached = [0u8; TAG_LEN];
    detached.copy_from_slice(&tag);
    Ok((body, detached))
}

/// Decrypt `body` and verify it against `tag` under `key`.
///
/// Never fails: every error is folded into the returned outcome.
pub fn attempt(key: &[u8], nonce: &[u8], tag: &[u8], body: &[u8]) -> AttemptOutcome {
    if nonce.len() != NONCE_LEN || tag.len() != TAG_LEN {
        return AttemptOutcome::MalformedAttempt;
    }
    let Ok(cipher) = Aes128Gcm16::new_from_slice(key) else {
        return AttemptOutcome::MalformedAttempt;
    };

    let mut buffer = Zeroizing::new(body.to_vec());
    match cipher.decrypt_in_place_detached(
        Nonce::<U16>::from_slice(nonce),
        b"",
        buffer.as_mut_slice(),
        Tag::<U16>::from_slice(tag),
    ) {
        Ok(()) => AttemptOutcome::Verified(std::mem::take(&mut *buffer)),
        Err(_) => AttemptOutcome::Mismatch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::KEY_LEN;

    #[test]
    fn encrypt_then_attempt_verifies() {
        let key = [7u8; KEY_LEN];
        let nonce = generate_nonce().unwrap();

        let (body, tag) = encrypt(&key, &nonce, b"secret data").unwrap();

        assert_eq!(
            attempt(&key, &nonce, &tag, &body),
            AttemptOutcome::Verified(b"secret data".to_vec())
        );
    }

    #[test]
    fn wrong_key_is_mismatch() {
        let nonce = [1u8; NONCE_LEN];
        let (body, tag) = encrypt(&[7u8; KEY_LEN], &nonce, b"secret data").unwrap();

        assert_eq!(
            attempt(&[8u8; KEY_LEN], &nonce, &tag, &body),
            AttemptOutcome::Mismatch
        );
    }

    #[test]
    fn tampered_tag_is_mismatch() {
        let key = [7u8; KEY_LEN];
        let nonce = [1u8; NONCE_LEN];
        let (body, mut tag) = encrypt(&key, &nonce, b"secret data").unwrap();
        tag[0] ^= 1;

        assert_eq!(attempt(&key, &nonce, &tag, &body), AttemptOutcome::Mismatch);
    }

    #[test]
    fn bad_lengths_are_malformed() {
        let nonce = [1u8; NONCE_LEN];
        let tag = [0u8; TAG_LEN];

        assert_eq!(
            attempt(&[0u8; 5], &nonce, &tag, b""),
            AttemptOutcome::MalformedAttempt
        );
        assert_eq!(
            attempt(&[0u8; KEY_LEN], &nonce[..12], &tag, b""),
            AttemptOutcome::MalformedAttempt
        );
        assert_eq!(
            attempt(&[0u8; KEY_LEN], &nonce, &tag[..8], b""),
            AttemptOutcome::MalformedAttempt
        );
    }

    #[test]
    fn empty_body_round_trips() {
        let key = [3u8; KEY_LEN];
        let nonce = [9u8; NONCE_LEN];
        let (body, tag) = encrypt(&key, &nonce, b"").unwrap();

        assert!(body.is_empty());
        assert_eq!(
            attempt(&key, &nonce, &tag, &body),
            AttemptOutcome::Verified(Vec::new())
        );
    }
}
