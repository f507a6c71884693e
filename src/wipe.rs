//! Secure-wipe primitive and the zeroizing containers built on top of it.
//!
//! `zeroize` already guarantees the compiler cannot elide the overwrite
//! (it uses a volatile write internally), so every container here just
//! derives `Zeroize`/`ZeroizeOnDrop` rather than hand-rolling the memset.

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Overwrites `buf` with zeroes. A no-op on an empty slice.
pub fn secure_wipe(buf: &mut [u8]) {
    buf.zeroize();
}

/// A 32-byte root key material buffer (password-hash output, random master
/// material, random content material). Exists only in a local scope and is
/// wiped the moment it drops — including on an error or panic unwind path.
#[derive(ZeroizeOnDrop)]
pub struct RootKey(pub [u8; 32]);

impl RootKey {
    #[must_use]
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

/// A variable-length secret buffer — used for derived layer keys, whose
/// length depends on the owning suite (32 bytes for the AEAD suites, 64 for
/// the encrypt-then-MAC suite's split cipher/mac key).
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretBytes(Vec<u8>);

impl SecretBytes {
    #[must_use]
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for SecretBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SecretBytes").field(&"[REDACTED]").finish()
    }
}
