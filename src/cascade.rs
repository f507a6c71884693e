//! The cascade engine: applying an ordered list of cipher suites in sequence
//! to seal, and in reverse sequence to open.

use crate::error::{CascadeError, Result};
use crate::suites::{self, Algorithm};
use crate::wipe::SecretBytes;

/// One cascade layer's algorithm plus its derived key material.
pub struct LayerKey {
    pub algorithm: Algorithm,
    pub raw_key: SecretBytes,
}

impl LayerKey {
    #[must_use]
    pub fn new(algorithm: Algorithm, raw_key: Vec<u8>) -> Self {
        Self {
            algorithm,
            raw_key: SecretBytes::new(raw_key),
        }
    }
}

/// Validates a layer list per the cascade's construction-time invariants.
///
/// # Errors
///
/// [`CascadeError::InvalidConfig`] if `layers` is empty or longer than 10.
pub fn validate_layers(layers: &[Algorithm]) -> Result<()> {
    if layers.is_empty() {
        return Err(CascadeError::InvalidConfig("at least one layer".into()));
    }
    if layers.len() > 10 {
        return Err(CascadeError::InvalidConfig("at most 10 layers".into()));
    }
    Ok(())
}

/// `cascadeSeal`: `c0 = plaintext`; for `i` in `0..L`, `c[i+1] = seal(c[i], key[i])`. Returns `c[L]`.
///
/// Layers are applied strictly in the order given, each depending on the
/// previous layer's output — there is no concurrency within one cascade.
#[tracing::instrument(skip(plaintext, layer_keys))]
pub fn cascade_seal(plaintext: &[u8], layer_keys: &[LayerKey]) -> Result<Vec<u8>> {
    let mut current = plaintext.to_vec();
    for layer in layer_keys {
        current = suites::seal(layer.algorithm, &current, layer.raw_key.as_slice())?;
    }
    Ok(current)
}

/// `cascadeOpen`: `c[L] = blob`; for `i` in `L-1..=0`, `c[i] = open(c[i+1], key[i])`. Returns `c[0]`.
///
/// Any layer's `AuthFailure` aborts immediately and surfaces unchanged —
/// nothing about *which* layer failed is exposed to the caller.
#[tracing::instrument(skip(blob, layer_keys))]
pub fn cascade_open(blob: &[u8], layer_keys: &[LayerKey]) -> Result<Vec<u8>> {
    let mut current = blob.to_vec();
    for layer in layer_keys.iter().rev() {
        current = suites::open(layer.algorithm, &current, layer.raw_key.as_slice())?;
    }
    Ok(current)
}
