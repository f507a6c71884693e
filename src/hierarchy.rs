//! The key-hierarchy orchestrator: Password Key → Master Key → Content Key.
//!
//! This is the central algorithm of the crate. Every function here owns its
//! root key material in a local [`RootKey`]/[`SecretBytes`] scope that wipes
//! on every exit path, success or failure, by virtue of Rust's own drop
//! order — no explicit "finally" block is needed.

use crate::cascade::{self, LayerKey};
use crate::error::{CascadeError, Result};
use crate::kdf::{kdf_expand, Purpose};
use crate::password_hash::{self, CostParams};
use crate::random::random_bytes;
use crate::suites::Algorithm;
use crate::wipe::RootKey;

/// A password-derived key: one layer key per configured cascade layer,
/// derived from the Argon2id output under the `PASSWORD` purpose.
/// `salt` and `cost` must be persisted by the caller to re-derive this
/// across sessions; `layer_keys` are session-only.
pub struct PasswordKey {
    pub salt: Vec<u8>,
    pub cost: CostParams,
    pub layer_keys: Vec<LayerKey>,
}

/// A master key: one layer key per configured cascade layer, derived from
/// 32 bytes of random master material under the `MASTER` purpose.
/// Session-only — the raw master material itself is never retained.
pub struct MasterKey {
    pub layer_keys: Vec<LayerKey>,
}

/// The sealed 32-byte raw master material — opaque, self-framed, safe to
/// persist. Produced by [`generate_master_key`], consumed by
/// [`unlock_master_key`].
pub type EncryptedMasterKey = Vec<u8>;

/// A sealed user item: a freshly random 32-byte content key wrapped under
/// the master key's layers, plus the plaintext sealed under that content
/// key's own layers.
pub struct EncryptedData {
    pub wrapped_content_key: Vec<u8>,
    pub ciphertext: Vec<u8>,
}

/// `deriveLayerKeys(rootKey32, purpose, layers) -> [LayerKey]`.
///
/// `root_key` must be wiped by the caller immediately after this returns,
/// success or failure — callers pass it in as a [`RootKey`] precisely so
/// that wipe happens automatically when it drops at the end of the calling
/// scope.
fn derive_layer_keys(root_key: &[u8; 32], purpose: Purpose, layers: &[Algorithm]) -> Result<Vec<LayerKey>> {
    layers
        .iter()
        .enumerate()
        .map(|(i, &algorithm)| {
            let raw = kdf_expand(root_key, purpose, i as u64, algorithm.key_length())?;
            Ok(LayerKey::new(algorithm, raw))
        })
        .collect()
}

/// `derivePasswordKey(password, costParams, salt?)`.
///
/// Generates a fresh salt via the CSPRNG when `salt` is `None`. On success
/// or failure the Argon2id output is wiped before returning — it never
/// outlives this function.
///
/// # Errors
///
/// Propagates [`CascadeError::InvalidParameter`] from the password hash or
/// [`CascadeError::RandomnessUnavailable`] if a salt had to be generated and
/// the CSPRNG failed.
#[tracing::instrument(skip(password, salt))]
pub fn derive_password_key(
    password: &[u8],
    cost: CostParams,
    salt: Option<Vec<u8>>,
    layers: &[Algorithm],
) -> Result<PasswordKey> {
    let salt = match salt {
        Some(s) => s,
        None => password_hash::generate_salt()?,
    };

    let base = password_hash::derive_password_base_key(password, &salt, &cost)?;
    let layer_keys = derive_layer_keys(base.as_bytes(), Purpose::Password, layers);
    // `base` drops here regardless of the `derive_layer_keys` outcome, wiping it.
    let layer_keys = layer_keys?;

    Ok(PasswordKey {
        salt,
        cost,
        layer_keys,
    })
}

/// `generateMasterKey(passwordKey) -> { MasterKey, EncryptedMasterKey }`.
#[tracing::instrument(skip(password_key))]
pub fn generate_master_key(password_key: &PasswordKey, layers: &[Algorithm]) -> Result<(MasterKey, EncryptedMasterKey)> {
    let raw_master = RootKey::new(random_bytes(32)?.try_into().map_err(|_| CascadeError::RandomnessUnavailable)?);

    let master_layer_keys = derive_layer_keys(raw_master.as_bytes(), Purpose::Master, layers);
    let encrypted_master_key = cascade::cascade_seal(raw_master.as_bytes(), &password_key.layer_keys);
    // `raw_master` drops at the end of this scope either way.

    let master_layer_keys = master_layer_keys?;
    let encrypted_master_key = encrypted_master_key?;

    Ok((MasterKey { layer_keys: master_layer_keys }, encrypted_master_key))
}

/// `unlockMasterKey(encryptedMasterKey, passwordKey) -> MasterKey`.
///
/// # Errors
///
/// [`CascadeError::WrongPasswordOrTampered`] if the outer cascade fails to
/// authenticate — this is the only error this function can return besides
/// ones propagated from construction, by design: a wrong password and a
/// tampered envelope must be indistinguishable to the caller.
#[tracing::instrument(skip(encrypted_master_key, password_key))]
pub fn unlock_master_key(
    encrypted_master_key: &EncryptedMasterKey,
    password_key: &PasswordKey,
    layers: &[Algorithm],
) -> Result<MasterKey> {
    let raw = cascade::cascade_open(encrypted_master_key, &password_key.layer_keys)
        .map_err(|_| CascadeError::WrongPasswordOrTampered)?;
    let raw_master = RootKey::new(
        raw.try_into()
            .map_err(|_| CascadeError::WrongPasswordOrTampered)?,
    );

    let master_layer_keys = derive_layer_keys(raw_master.as_bytes(), Purpose::Master, layers);
    Ok(MasterKey { layer_keys: master_layer_keys? })
}

/// `encrypt(data, masterKey) -> EncryptedData`.
#[tracing::instrument(skip(data, master_key))]
pub fn encrypt(data: &[u8], master_key: &MasterKey, layers: &[Algorithm]) -> Result<EncryptedData> {
    let raw_content = RootKey::new(random_bytes(32)?.try_into().map_err(|_| CascadeError::RandomnessUnavailable)?);

    let content_layer_keys = derive_layer_keys(raw_content.as_bytes(), Purpose::Content, layers);
    let wrapped_content_key = cascade::cascade_seal(raw_content.as_bytes(), &master_key.layer_keys);
    // `raw_content` drops here either way.

    let content_layer_keys = content_layer_keys?;
    let wrapped_content_key = wrapped_content_key?;
    let ciphertext = cascade::cascade_seal(data, &content_layer_keys)?;

    Ok(EncryptedData {
        wrapped_content_key,
        ciphertext,
    })
}

/// `decrypt({wrappedContentKey, ciphertext}, masterKey) -> plaintext`.
///
/// # Errors
///
/// [`CascadeError::WrongKeyOrTampered`] if either the content-key wrap or
/// the ciphertext itself fails to authenticate.
#[tracing::instrument(skip(encrypted, master_key))]
pub fn decrypt(encrypted: &EncryptedData, master_key: &MasterKey, layers: &[Algorithm]) -> Result<Vec<u8>> {
    let raw = cascade::cascade_open(&encrypted.wrapped_content_key, &master_key.layer_keys)
        .map_err(|_| CascadeError::WrongKeyOrTampered)?;
    let raw_content = RootKey::new(raw.try_into().map_err(|_| CascadeError::WrongKeyOrTampered)?);

    let content_layer_keys = derive_layer_keys(raw_content.as_bytes(), Purpose::Content, layers);
    // `raw_content` drops here either way.
    let content_layer_keys = content_layer_keys?;

    cascade::cascade_open(&encrypted.ciphertext, &content_layer_keys).map_err(|_| CascadeError::WrongKeyOrTampered)
}

/// `changePassword(encryptedMasterKey, oldPasswordKey, newPasswordKey) -> EncryptedMasterKey`.
///
/// Re-wraps the master material under a new password without touching any
/// previously encrypted data — the master key itself is never re-seeded.
#[tracing::instrument(skip(encrypted_master_key, old_password_key, new_password_key))]
pub fn change_password(
    encrypted_master_key: &EncryptedMasterKey,
    old_password_key: &PasswordKey,
    new_password_key: &PasswordKey,
) -> Result<EncryptedMasterKey> {
    let raw = cascade::cascade_open(encrypted_master_key, &old_password_key.layer_keys)
        .map_err(|_| CascadeError::WrongPasswordOrTampered)?;
    let raw_master = RootKey::new(
        raw.try_into()
            .map_err(|_| CascadeError::WrongPasswordOrTampered)?,
    );

    cascade::cascade_seal(raw_master.as_bytes(), &new_password_key.layer_keys)
    // `raw_master` drops here either way.
}

/// `wipePasswordKey(passwordKey)`.
///
/// Takes ownership of `password_key` and drops it immediately, so its
/// `layer_keys` wipe via `ZeroizeOnDrop` right here rather than whenever the
/// caller's own scope happens to end. Named explicitly so a caller can
/// retire a `PasswordKey` as a deliberate step, not an incidental one.
pub fn wipe_password_key(password_key: PasswordKey) {
    drop(password_key);
}

/// `wipeMasterKey(masterKey)`. See [`wipe_password_key`].
pub fn wipe_master_key(master_key: MasterKey) {
    drop(master_key);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_cost() -> CostParams {
        CostParams {
            m_cost_kib: crate::password_hash::MIN_M_COST_KIB,
            t_cost: 1,
            p_cost: 1,
        }
    }

    fn layers() -> Vec<Algorithm> {
        vec![Algorithm::Aes256Gcm, Algorithm::XChaCha20Poly1305]
    }

    #[test]
    fn full_round_trip_encrypt_and_decrypt() {
        let layers = layers();
        let pk = derive_password_key(b"correct horse battery staple", fast_cost(), None, &layers).unwrap();
        let (mk, emk) = generate_master_key(&pk, &layers).unwrap();

        let data = encrypt(b"the quick brown fox", &mk, &layers).unwrap();
        let plaintext = decrypt(&data, &mk, &layers).unwrap();
        assert_eq!(plaintext, b"the quick brown fox");

        // Fresh session: re-derive the password key from the persisted salt,
        // unlock the master key from the persisted blob, and decrypt again.
        let pk2 = derive_password_key(b"correct horse battery staple", pk.cost.clone(), Some(pk.salt.clone()), &layers).unwrap();
        let mk2 = unlock_master_key(&emk, &pk2, &layers).unwrap();
        let plaintext2 = decrypt(&data, &mk2, &layers).unwrap();
        assert_eq!(plaintext2, b"the quick brown fox");
    }

    #[test]
    fn unlock_with_wrong_password_fails() {
        let layers = layers();
        let pk = derive_password_key(b"right password", fast_cost(), None, &layers).unwrap();
        let (_mk, emk) = generate_master_key(&pk, &layers).unwrap();

        let wrong_pk = derive_password_key(b"wrong password", fast_cost(), Some(pk.salt.clone()), &layers).unwrap();
        let err = unlock_master_key(&emk, &wrong_pk, &layers).unwrap_err();
        assert!(matches!(err, CascadeError::WrongPasswordOrTampered));
    }

    #[test]
    fn decrypt_with_wrong_master_key_fails() {
        let layers = layers();
        let pk = derive_password_key(b"pw", fast_cost(), None, &layers).unwrap();
        let (mk, _emk) = generate_master_key(&pk, &layers).unwrap();
        let data = encrypt(b"secret", &mk, &layers).unwrap();

        let other_pk = derive_password_key(b"different pw", fast_cost(), None, &layers).unwrap();
        let (other_mk, _) = generate_master_key(&other_pk, &layers).unwrap();
        let err = decrypt(&data, &other_mk, &layers).unwrap_err();
        assert!(matches!(err, CascadeError::WrongKeyOrTampered));
    }

    #[test]
    fn tampered_ciphertext_fails_to_decrypt() {
        let layers = layers();
        let pk = derive_password_key(b"pw", fast_cost(), None, &layers).unwrap();
        let (mk, _emk) = generate_master_key(&pk, &layers).unwrap();
        let mut data = encrypt(b"secret payload", &mk, &layers).unwrap();

        let last = data.ciphertext.len() - 1;
        data.ciphertext[last] ^= 0x01;
        let err = decrypt(&data, &mk, &layers).unwrap_err();
        assert!(matches!(err, CascadeError::WrongKeyOrTampered));
    }

    #[test]
    fn change_password_allows_unlock_with_new_password_only() {
        let layers = layers();
        let old_pk = derive_password_key(b"old password", fast_cost(), None, &layers).unwrap();
        let (mk, emk) = generate_master_key(&old_pk, &layers).unwrap();
        let data = encrypt(b"unchanged through rewrap", &mk, &layers).unwrap();

        let new_pk = derive_password_key(b"new password", fast_cost(), None, &layers).unwrap();
        let new_emk = change_password(&emk, &old_pk, &new_pk).unwrap();

        // Old password key no longer unlocks the re-wrapped blob.
        assert!(unlock_master_key(&new_emk, &old_pk, &layers).is_err());

        // New password key does, and decrypts data untouched by the rewrap.
        let mk2 = unlock_master_key(&new_emk, &new_pk, &layers).unwrap();
        let plaintext = decrypt(&data, &mk2, &layers).unwrap();
        assert_eq!(plaintext, b"unchanged through rewrap");
    }

    #[test]
    fn empty_and_large_plaintexts_round_trip() {
        let layers = vec![Algorithm::Aes256CtrHmacSha256];
        let pk = derive_password_key(b"pw", fast_cost(), None, &layers).unwrap();
        let (mk, _emk) = generate_master_key(&pk, &layers).unwrap();

        for len in [0usize, 1, 1024, 65_537] {
            let plaintext = vec![0xABu8; len];
            let data = encrypt(&plaintext, &mk, &layers).unwrap();
            let decrypted = decrypt(&data, &mk, &layers).unwrap();
            assert_eq!(decrypted, plaintext);
        }
    }

    #[test]
    fn wipe_password_key_and_wipe_master_key_consume_their_argument() {
        let layers = layers();
        let pk = derive_password_key(b"pw", fast_cost(), None, &layers).unwrap();
        let (mk, _emk) = generate_master_key(&pk, &layers).unwrap();

        // These only need to type-check and run without panicking: taking
        // `PasswordKey`/`MasterKey` by value is what proves the caller can no
        // longer use them afterward:
        wipe_password_key(pk);
        wipe_master_key(mk);
    }
}
