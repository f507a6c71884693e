//! The closed error taxonomy for every fallible operation this crate exposes.
//!
//! Every variant maps to exactly one condition in the library's contract.
//! None of them carry plaintext, key material, or enough detail to tell a
//! caller *which* cascade layer failed — `AuthFailure` and its two wrapping
//! variants are deliberately a single unified message.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CascadeError {
    /// The layer list is empty, too long, or otherwise malformed.
    #[error("invalid cascade configuration: {0}")]
    InvalidConfig(String),

    /// A parameter (salt length, cost below the floor, missing field) is invalid.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// An AEAD key does not match its suite's required length.
    #[error("invalid key")]
    InvalidKey,

    /// An `open` input was shorter than the suite's minimum framing.
    #[error("ciphertext too short")]
    CiphertextTooShort,

    /// An AEAD authentication or integrity check failed.
    #[error("authentication failed")]
    AuthFailure,

    /// `unlock_master_key` failed: wrong password, or the envelope was tampered with.
    #[error("wrong password or tampered data")]
    WrongPasswordOrTampered,

    /// `decrypt` failed: wrong master key, or the envelope was tampered with.
    #[error("wrong key or tampered data")]
    WrongKeyOrTampered,

    /// The CSPRNG failed to produce random bytes.
    #[error("randomness source unavailable")]
    RandomnessUnavailable,

    /// The underlying cryptographic backend refused to perform an operation.
    #[error("cryptographic primitive unavailable: {0}")]
    PrimitiveUnavailable(String),
}

pub type Result<T> = std::result::Result<T, CascadeError>;
