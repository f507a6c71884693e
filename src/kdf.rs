//! Domain-separated subkey expansion: HKDF-SHA256, expand-only.
//!
//! The root key handed in here must already be uniformly random (Argon2id
//! or CSPRNG output) — this module skips the HKDF *extract* step on purpose
//! (`Hkdf::from_prk`) because extracting again over already-uniform input
//! would be redundant, and including an extract step would let a caller
//! mistakenly feed in low-entropy material and get a false sense of safety.

use hkdf::Hkdf;
use sha2::Sha256;

use crate::error::{CascadeError, Result};

/// The three reserved derivation purposes, each producing independent
/// subkeys from the other two for the same `(root_key, index)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purpose {
    Password,
    Master,
    Content,
}

impl Purpose {
    const fn tag(self) -> &'static str {
        match self {
            Self::Password => "password",
            Self::Master => "master",
            Self::Content => "content",
        }
    }
}

/// `KDF(rootKey32, purpose, index, length) -> bytes`.
///
/// `info = "cascade-" ++ purpose ++ "-layer-" ++ decimal(index)`, matching
/// the spec's prescribed scheme exactly. For fixed `(root_key, purpose,
/// index)`, `kdf_expand(..., L1)` is a byte-for-byte prefix of
/// `kdf_expand(..., L2)` for `L2 >= L1`, since RFC 5869 expand blocks never
/// depend on the requested output length.
///
/// # Errors
///
/// [`CascadeError::PrimitiveUnavailable`] if `length` exceeds HKDF-SHA256's
/// maximum expand output (255 * 32 bytes) or the root key is shorter than a
/// SHA-256 digest (32 bytes), which would make `from_prk` reject it.
pub fn kdf_expand(root_key: &[u8], purpose: Purpose, index: u64, length: usize) -> Result<Vec<u8>> {
    let info = format!("cascade-{}-layer-{index}", purpose.tag());

    let hkdf = Hkdf::<Sha256>::from_prk(root_key).map_err(|e| CascadeError::PrimitiveUnavailable(e.to_string()))?;

    let mut out = vec![0u8; length];
    hkdf.expand(info.as_bytes(), &mut out)
        .map_err(|e| CascadeError::PrimitiveUnavailable(e.to_string()))?;
    Ok(out)
}
