//! Cipher suite registry: a closed, stateless dispatch over [`Algorithm`].
//!
//! Every suite's `seal` returns a single self-framed blob
//! (`nonce ‖ ciphertext ‖ tag`); every `open` verifies authentication before
//! returning any plaintext, so a caller can never observe a partially
//! decrypted result. Suites are stateless — dispatch is a `match`, never a
//! heap-allocated trait object.

use aes::Aes256;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key as Aes256GcmKey};
use chacha20poly1305::{Key as XChaChaKey, XChaCha20Poly1305, XNonce};
use ctr::cipher::{KeyIvInit, StreamCipher};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::{CascadeError, Result};

type Aes256Ctr = ctr::Ctr128BE<Aes256>;
type HmacSha256 = Hmac<Sha256>;

/// The closed set of AEAD suites a cascade layer may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    Aes256Gcm,
    XChaCha20Poly1305,
    Aes256CtrHmacSha256,
}

impl Algorithm {
    /// Bytes of raw key material this suite's layer key must carry.
    #[must_use]
    pub const fn key_length(self) -> usize {
        match self {
            Self::Aes256Gcm | Self::XChaCha20Poly1305 => 32,
            // 32 cipher-key bytes ‖ 32 mac-key bytes.
            Self::Aes256CtrHmacSha256 => 64,
        }
    }

    const fn nonce_len(self) -> usize {
        match self {
            Self::Aes256Gcm => 12,
            Self::XChaCha20Poly1305 => 24,
            Self::Aes256CtrHmacSha256 => 16,
        }
    }

    const fn tag_len(self) -> usize {
        match self {
            Self::Aes256Gcm | Self::XChaCha20Poly1305 => 16,
            Self::Aes256CtrHmacSha256 => 32,
        }
    }

    /// Deterministic per-suite ciphertext expansion over the plaintext length.
    #[must_use]
    pub const fn overhead(self) -> usize {
        self.nonce_len() + self.tag_len()
    }

    /// Minimum valid `open` input: a zero-length plaintext still produces a
    /// full nonce ‖ tag frame.
    #[must_use]
    pub const fn min_blob_len(self) -> usize {
        self.overhead()
    }
}

fn check_key_len(algorithm: Algorithm, key: &[u8]) -> Result<()> {
    if key.len() != algorithm.key_length() {
        return Err(CascadeError::InvalidKey);
    }
    Ok(())
}

/// Seals `plaintext` under `key` with a fresh random nonce, returning
/// `nonce ‖ ciphertext ‖ tag`.
///
/// # Errors
///
/// [`CascadeError::InvalidKey`] if `key.len() != algorithm.key_length()`.
#[tracing::instrument(skip(plaintext, key))]
pub fn seal(algorithm: Algorithm, plaintext: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    check_key_len(algorithm, key)?;
    match algorithm {
        Algorithm::Aes256Gcm => seal_aes_gcm(plaintext, key),
        Algorithm::XChaCha20Poly1305 => seal_xchacha(plaintext, key),
        Algorithm::Aes256CtrHmacSha256 => seal_aes_ctr_hmac(plaintext, key),
    }
}

/// Verifies and opens `blob`, returning the plaintext.
///
/// # Errors
///
/// [`CascadeError::InvalidKey`] on a wrong-length key,
/// [`CascadeError::CiphertextTooShort`] if `blob` is smaller than the
/// suite's minimum framing, [`CascadeError::AuthFailure`] on any
/// authentication or integrity failure — never partial plaintext.
#[tracing::instrument(skip(blob, key))]
pub fn open(algorithm: Algorithm, blob: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    check_key_len(algorithm, key)?;
    if blob.len() < algorithm.min_blob_len() {
        return Err(CascadeError::CiphertextTooShort);
    }
    match algorithm {
        Algorithm::Aes256Gcm => open_aes_gcm(blob, key),
        Algorithm::XChaCha20Poly1305 => open_xchacha(blob, key),
        Algorithm::Aes256CtrHmacSha256 => open_aes_ctr_hmac(blob, key),
    }
}

fn seal_aes_gcm(plaintext: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new(Aes256GcmKey::<Aes256Gcm>::from_slice(key));
    let nonce_bytes = crate::random::random_bytes(Algorithm::Aes256Gcm.nonce_len())?;
    let nonce = aes_gcm::Nonce::from_slice(&nonce_bytes);
    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|_| CascadeError::AuthFailure)?;
    let mut blob = Vec::with_capacity(nonce_bytes.len() + ciphertext.len());
    blob.extend_from_slice(&nonce_bytes);
    blob.extend_from_slice(&ciphertext);
    Ok(blob)
}

fn open_aes_gcm(blob: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    let (nonce, body) = blob.split_at(Algorithm::Aes256Gcm.nonce_len());
    let cipher = Aes256Gcm::new(Aes256GcmKey::<Aes256Gcm>::from_slice(key));
    cipher
        .decrypt(aes_gcm::Nonce::from_slice(nonce), body)
        .map_err(|_| CascadeError::AuthFailure)
}

fn seal_xchacha(plaintext: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    let cipher = XChaCha20Poly1305::new(XChaChaKey::from_slice(key));
    let nonce_bytes = crate::random::random_bytes(Algorithm::XChaCha20Poly1305.nonce_len())?;
    let nonce = XNonce::from_slice(&nonce_bytes);
    let ciphertext = cipher.encrypt(nonce, plaintext).map_err(|_| CascadeError::AuthFailure)?;
    let mut blob = Vec::with_capacity(nonce_bytes.len() + ciphertext.len());
    blob.extend_from_slice(&nonce_bytes);
    blob.extend_from_slice(&ciphertext);
    Ok(blob)
}

fn open_xchacha(blob: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    let (nonce, body) = blob.split_at(Algorithm::XChaCha20Poly1305.nonce_len());
    let cipher = XChaCha20Poly1305::new(XChaChaKey::from_slice(key));
    cipher
        .decrypt(XNonce::from_slice(nonce), body)
        .map_err(|_| CascadeError::AuthFailure)
}

/// Encrypt-then-MAC: AES-256-CTR for confidentiality, HMAC-SHA256 over
/// `nonce ‖ ciphertext` for integrity, independent 32-byte sub-keys for each.
fn seal_aes_ctr_hmac(plaintext: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    let (cipher_key, mac_key) = key.split_at(32);
    let iv_bytes = crate::random::random_bytes(Algorithm::Aes256CtrHmacSha256.nonce_len())?;

    let mut ciphertext = plaintext.to_vec();
    let mut cipher = Aes256Ctr::new_from_slices(cipher_key, &iv_bytes)
        .map_err(|_| CascadeError::InvalidKey)?;
    cipher.apply_keystream(&mut ciphertext);

    let mut mac = <HmacSha256 as Mac>::new_from_slice(mac_key).map_err(|e| CascadeError::PrimitiveUnavailable(e.to_string()))?;
    mac.update(&iv_bytes);
    mac.update(&ciphertext);
    let tag = mac.finalize().into_bytes();

    let mut blob = Vec::with_capacity(iv_bytes.len() + ciphertext.len() + tag.len());
    blob.extend_from_slice(&iv_bytes);
    blob.extend_from_slice(&ciphertext);
    blob.extend_from_slice(&tag);
    Ok(blob)
}

fn open_aes_ctr_hmac(blob: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    let (cipher_key, mac_key) = key.split_at(32);
    let nonce_len = Algorithm::Aes256CtrHmacSha256.nonce_len();
    let tag_len = Algorithm::Aes256CtrHmacSha256.tag_len();

    let (iv_and_body, tag) = blob.split_at(blob.len() - tag_len);
    let (iv_bytes, body) = iv_and_body.split_at(nonce_len);

    // Authenticate before touching the ciphertext, constant-time compare.
    let mut mac = <HmacSha256 as Mac>::new_from_slice(mac_key).map_err(|e| CascadeError::PrimitiveUnavailable(e.to_string()))?;
    mac.update(iv_bytes);
    mac.update(body);
    mac.verify_slice(tag).map_err(|_| CascadeError::AuthFailure)?;

    let mut plaintext = body.to_vec();
    let mut cipher = Aes256Ctr::new_from_slices(cipher_key, iv_bytes)
        .map_err(|_| CascadeError::InvalidKey)?;
    cipher.apply_keystream(&mut plaintext);
    Ok(plaintext)
}
