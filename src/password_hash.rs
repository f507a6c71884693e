//! Password hash (PH): Argon2id, 16-byte salt, fixed 32-byte output.
//!
//! Generalizes `chamber-vault`'s `KdfParams`/`derive_key` into the three
//! named cost presets the spec requires, plus an explicit floor so a caller
//! cannot hand in parameters cheap enough to defeat the point of a
//! memory-hard hash.

use argon2::{Algorithm, Argon2, Params, Version};

use crate::error::{CascadeError, Result};
use crate::random::random_bytes;
use crate::wipe::RootKey;

/// Required salt length for the Argon2id family this crate ships.
pub const SALT_LEN: usize = 16;

/// This crate's own anti-footgun floor, independent of Argon2's hard
/// minimum (`m_cost_kib >= 8 * p_cost`). A caller asking for less memory
/// than this is almost certainly misconfiguring the library, not making an
/// intentional tradeoff.
pub const MIN_M_COST_KIB: u32 = 8192; // 8 MiB
pub const MIN_T_COST: u32 = 1;
pub const MIN_P_COST: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CostParams {
    pub m_cost_kib: u32,
    pub t_cost: u32,
    pub p_cost: u32,
}

impl CostParams {
    /// ~200ms on commodity hardware.
    #[must_use]
    pub const fn interactive() -> Self {
        Self {
            m_cost_kib: 19_456,
            t_cost: 2,
            p_cost: 1,
        }
    }

    /// ~0.5s on commodity hardware.
    #[must_use]
    pub const fn moderate() -> Self {
        Self {
            m_cost_kib: 65_536,
            t_cost: 3,
            p_cost: 1,
        }
    }

    /// ~2s on commodity hardware.
    #[must_use]
    pub const fn sensitive() -> Self {
        Self {
            m_cost_kib: 262_144,
            t_cost: 4,
            p_cost: 1,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.p_cost < MIN_P_COST {
            return Err(CascadeError::InvalidParameter("p_cost below floor".into()));
        }
        if self.t_cost < MIN_T_COST {
            return Err(CascadeError::InvalidParameter("t_cost below floor".into()));
        }
        if self.m_cost_kib < MIN_M_COST_KIB || self.m_cost_kib < 8 * self.p_cost {
            return Err(CascadeError::InvalidParameter("m_cost_kib below floor".into()));
        }
        Ok(())
    }
}

/// `PH(password, salt, costParams) -> key32`.
///
/// `salt` must be exactly [`SALT_LEN`] bytes. `password` is taken as raw
/// bytes; a caller with a `String` password passes `.as_bytes()`, which by
/// construction is identical to whatever UTF-8 bytes they'd have encoded by
/// hand — there is no separate "text mode".
///
/// # Errors
///
/// [`CascadeError::InvalidParameter`] if `salt` is the wrong length or
/// `cost` fails [`CostParams::validate`]; [`CascadeError::PrimitiveUnavailable`]
/// if the Argon2 backend itself rejects the derivation.
#[tracing::instrument(skip(password, salt))]
pub fn derive_password_base_key(password: &[u8], salt: &[u8], cost: &CostParams) -> Result<RootKey> {
    if salt.len() != SALT_LEN {
        return Err(CascadeError::InvalidParameter(format!(
            "salt must be {SALT_LEN} bytes"
        )));
    }
    cost.validate()?;

    let params = Params::new(cost.m_cost_kib, cost.t_cost, cost.p_cost, Some(32))
        .map_err(|e| CascadeError::PrimitiveUnavailable(e.to_string()))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut out = [0u8; 32];
    argon2
        .hash_password_into(password, salt, &mut out)
        .map_err(|e| CascadeError::PrimitiveUnavailable(e.to_string()))?;
    Ok(RootKey::new(out))
}

/// Generates a fresh random [`SALT_LEN`]-byte salt via the CSPRNG.
pub fn generate_salt() -> Result<Vec<u8>> {
    random_bytes(SALT_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_cost() -> CostParams {
        CostParams {
            m_cost_kib: MIN_M_COST_KIB,
            t_cost: 1,
            p_cost: 1,
        }
    }

    #[test]
    fn derive_is_deterministic_for_same_inputs() {
        let salt = vec![7u8; SALT_LEN];
        let cost = fast_cost();
        let a = derive_password_base_key(b"correct horse battery staple", &salt, &cost).unwrap();
        let b = derive_password_base_key(b"correct horse battery staple", &salt, &cost).unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn derive_is_salt_sensitive() {
        let cost = fast_cost();
        let a = derive_password_base_key(b"same password", &[1u8; SALT_LEN], &cost).unwrap();
        let b = derive_password_base_key(b"same password", &[2u8; SALT_LEN], &cost).unwrap();
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn derive_accepts_utf8_text_as_bytes() {
        let salt = vec![9u8; SALT_LEN];
        let cost = fast_cost();
        let from_str = derive_password_base_key("héllo wörld".as_bytes(), &salt, &cost).unwrap();
        let from_bytes =
            derive_password_base_key(&[104, 195, 169, 108, 108, 111, 32, 119, 195, 182, 114, 108, 100], &salt, &cost)
                .unwrap();
        assert_eq!(from_str.as_bytes(), from_bytes.as_bytes());
    }

    #[test]
    fn wrong_salt_length_is_invalid_parameter() {
        let cost = fast_cost();
        let err = derive_password_base_key(b"pw", &[0u8; 8], &cost).unwrap_err();
        assert!(matches!(err, CascadeError::InvalidParameter(_)));
    }

    #[test]
    fn cost_below_floor_is_invalid_parameter() {
        let salt = vec![0u8; SALT_LEN];
        let cost = CostParams {
            m_cost_kib: 16,
            t_cost: 1,
            p_cost: 1,
        };
        let err = derive_password_base_key(b"pw", &salt, &cost).unwrap_err();
        assert!(matches!(err, CascadeError::InvalidParameter(_)));
    }

    #[test]
    fn presets_all_validate() {
        CostParams::interactive().validate().unwrap();
        CostParams::moderate().validate().unwrap();
        CostParams::sensitive().validate().unwrap();
    }

    #[test]
    fn generated_salts_are_random_and_correct_length() {
        let a = generate_salt().unwrap();
        let b = generate_salt().unwrap();
        assert_eq!(a.len(), SALT_LEN);
        assert_ne!(a, b);
    }
}
