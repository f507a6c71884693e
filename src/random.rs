//! CSPRNG adapter. The only randomness source the rest of the crate is
//! allowed to touch — no layer, KDF, or hierarchy function calls
//! `getrandom` directly.

use crate::error::{CascadeError, Result};

/// Returns `n` cryptographically secure random bytes.
///
/// # Errors
///
/// Returns [`CascadeError::RandomnessUnavailable`] if the OS CSPRNG cannot be
/// read. There is no fallback source — a failure here is fatal to the
/// calling operation.
pub fn random_bytes(n: usize) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; n];
    getrandom::fill(&mut buf).map_err(|_| CascadeError::RandomnessUnavailable)?;
    Ok(buf)
}
