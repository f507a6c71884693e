//! Cascading authenticated encryption with a three-level key hierarchy.
//!
//! A [`Cascade`] instance is configured once with an ordered list of 1-10
//! [`Algorithm`] layers. Every seal operation — wrapping a master key under
//! a password, wrapping a content key under a master key, sealing user data
//! under a content key — applies all configured layers in sequence, each
//! independently keyed via HKDF-SHA256 from its own root material. Opening
//! reverses the layer order. See each module for the primitives this
//! composes:
//!
//! - [`password_hash`]: Argon2id password-to-key derivation.
//! - [`kdf`]: domain-separated HKDF-SHA256 subkey expansion.
//! - [`suites`]: the closed set of AEAD/ETM cipher suites a layer may use.
//! - [`cascade`]: applying an ordered list of suites in sequence.
//! - [`hierarchy`]: the password → master → content key orchestration.
//! - [`wipe`]: zeroizing containers for key material.
//! - [`random`]: the crate's single CSPRNG entry point.

pub mod cascade;
pub mod error;
pub mod hierarchy;
pub mod kdf;
pub mod password_hash;
pub mod random;
pub mod suites;
pub mod wipe;

pub use error::{CascadeError, Result};
pub use hierarchy::{EncryptedData, EncryptedMasterKey, MasterKey, PasswordKey};
pub use password_hash::CostParams;
pub use suites::Algorithm;

use std::sync::OnceLock;

static READY: OnceLock<()> = OnceLock::new();

/// Idempotent readiness hook. Every primitive this crate currently uses
/// (`argon2`, `hkdf`, `aes-gcm`, `chacha20poly1305`, `aes`/`ctr`/`hmac`/
/// `sha2`, `getrandom`) needs no process-wide setup, so this is a no-op
/// today. It exists as a seam: a future backend that does need one-time
/// initialization (e.g. a native HSM binding) can hook in here without
/// changing any other public signature. Safe to call from multiple threads
/// or multiple times; only the first call does anything.
pub fn ensure_ready() {
    READY.get_or_init(|| ());
}

/// A configured cascade: an ordered, immutable list of 1-10 cipher suite
/// layers, applied to every seal/open this instance performs.
///
/// Construction validates the layer list once; every subsequent operation
/// trusts it without re-checking, so a `Cascade` that exists is always
/// usable.
#[derive(Debug, Clone)]
pub struct Cascade {
    layers: Vec<Algorithm>,
}

impl Cascade {
    /// Builds a cascade from an ordered layer list.
    ///
    /// # Errors
    ///
    /// [`CascadeError::InvalidConfig`] if `layers` is empty or longer than 10.
    pub fn new(layers: Vec<Algorithm>) -> Result<Self> {
        cascade::validate_layers(&layers)?;
        Ok(Self { layers })
    }

    /// The configured layer list, in the order layers are applied on seal.
    #[must_use]
    pub fn layers(&self) -> &[Algorithm] {
        &self.layers
    }

    /// `derivePasswordKey(password, costParams, salt?)`.
    pub fn derive_password_key(
        &self,
        password: &[u8],
        cost: CostParams,
        salt: Option<Vec<u8>>,
    ) -> Result<PasswordKey> {
        hierarchy::derive_password_key(password, cost, salt, &self.layers)
    }

    /// `generateMasterKey(passwordKey) -> { MasterKey, EncryptedMasterKey }`.
    pub fn generate_master_key(&self, password_key: &PasswordKey) -> Result<(MasterKey, EncryptedMasterKey)> {
        hierarchy::generate_master_key(password_key, &self.layers)
    }

    /// `unlockMasterKey(encryptedMasterKey, passwordKey) -> MasterKey`.
    pub fn unlock_master_key(
        &self,
        encrypted_master_key: &EncryptedMasterKey,
        password_key: &PasswordKey,
    ) -> Result<MasterKey> {
        hierarchy::unlock_master_key(encrypted_master_key, password_key, &self.layers)
    }

    /// `encrypt(data, masterKey) -> EncryptedData`.
    pub fn encrypt(&self, data: &[u8], master_key: &MasterKey) -> Result<EncryptedData> {
        hierarchy::encrypt(data, master_key, &self.layers)
    }

    /// `decrypt({wrappedContentKey, ciphertext}, masterKey) -> plaintext`.
    pub fn decrypt(&self, encrypted: &EncryptedData, master_key: &MasterKey) -> Result<Vec<u8>> {
        hierarchy::decrypt(encrypted, master_key, &self.layers)
    }

    /// `changePassword(encryptedMasterKey, oldPasswordKey, newPasswordKey) -> EncryptedMasterKey`.
    ///
    /// Does not touch any previously encrypted data or the master key
    /// itself — only the password-layer wrapping changes.
    pub fn change_password(
        &self,
        encrypted_master_key: &EncryptedMasterKey,
        old_password_key: &PasswordKey,
        new_password_key: &PasswordKey,
    ) -> Result<EncryptedMasterKey> {
        hierarchy::change_password(encrypted_master_key, old_password_key, new_password_key)
    }

    /// `wipePasswordKey(passwordKey)`.
    ///
    /// Consumes `password_key`, dropping it (and zeroizing its layer keys)
    /// on the spot rather than leaving that to whenever the caller's own
    /// scope ends.
    pub fn wipe_password_key(&self, password_key: PasswordKey) {
        hierarchy::wipe_password_key(password_key);
    }

    /// `wipeMasterKey(masterKey)`. See [`Cascade::wipe_password_key`].
    pub fn wipe_master_key(&self, master_key: MasterKey) {
        hierarchy::wipe_master_key(master_key);
    }
}
