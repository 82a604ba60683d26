//! # Threshold proxy re-encryption
//!
//! An owner encapsulates a symmetric key under its own public key ([`encrypt`]) and
//! splits a delegation secret for a recipient into `num_split` key fragments
//! ([`kfrag`]). Each proxy scales the published capsule by its fragment
//! ([`reencrypt`]), and the recipient combines any `threshold` of the results back
//! into the symmetric key ([`assemble`]).
//!
//! With owner key `a`, capsule `(r·G, u·G)`, precursor ECDH scalar `d` and fragment
//! polynomial `f` with `f(0) = a / d`, reconstruction computes
//! `d · f(0) · (r + u) · G = (r + u) · (a·G)`, which is the encapsulated point.

use serde::{Deserialize, Serialize};

use crate::crypto::curve::CurvePoint;
use crate::crypto::hash::kdf;
use crate::crypto::F;
use crate::error::PreError;

pub mod assemble;
pub mod encrypt;
pub mod kfrag;
pub mod reencrypt;
mod session;

/// Length in bytes of the derived symmetric key.
pub const ENC_KEY_LENGTH: usize = 16;

/// How many fragments a delegation is split into and how many reconstruct it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PolicyParams")]
pub struct ThresholdPolicy {
    num_split: usize,
    threshold: usize,
}

#[derive(Deserialize)]
struct PolicyParams {
    num_split: usize,
    threshold: usize,
}

impl TryFrom<PolicyParams> for ThresholdPolicy {
    type Error = PreError;

    fn try_from(params: PolicyParams) -> Result<Self, PreError> {
        ThresholdPolicy::new(params.num_split, params.threshold)
    }
}

impl ThresholdPolicy {
    pub fn new(num_split: usize, threshold: usize) -> Result<Self, PreError> {
        if num_split == 0 {
            return Err(PreError::InvalidPolicy(String::from(
                "num_split must be greater than 0",
            )));
        }
        if threshold == 0 {
            return Err(PreError::InvalidPolicy(String::from(
                "threshold must be greater than 0",
            )));
        }
        if threshold > num_split {
            return Err(PreError::InvalidPolicy(format!(
                "threshold {threshold} exceeds num_split {num_split}"
            )));
        }
        Ok(ThresholdPolicy { num_split, threshold })
    }

    pub fn num_split(&self) -> usize {
        self.num_split
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }
}

/// Ephemeral public points published alongside the ciphertext.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capsule {
    pub r: CurvePoint,
    pub u: CurvePoint,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncapsulatedKey {
    pub key: [u8; ENC_KEY_LENGTH],
    pub capsule: Capsule,
}

/// One share of a delegation. The share identifier is not stored: it is recomputed
/// from `random` by whoever reconstructs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyFragment {
    pub random: F,
    pub value: F,
    pub precursor: CurvePoint,
}

/// A proxy's answer: the capsule scaled by one fragment value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReencryptedFragment {
    pub re_key_r: CurvePoint,
    pub re_key_u: CurvePoint,
    pub random: F,
    pub precursor: CurvePoint,
}

pub(crate) fn derive_symmetric_key(shared: &CurvePoint) -> Result<[u8; ENC_KEY_LENGTH], PreError> {
    let mut key = [0u8; ENC_KEY_LENGTH];
    key.copy_from_slice(&kdf(&shared.compress()?, ENC_KEY_LENGTH));
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_bounds() {
        assert!(ThresholdPolicy::new(1, 1).is_ok());
        assert!(ThresholdPolicy::new(5, 3).is_ok());
        assert!(ThresholdPolicy::new(5, 5).is_ok());
        for (n, t) in [(0, 0), (0, 1), (3, 0), (3, 4), (1, 2)] {
            assert!(
                matches!(ThresholdPolicy::new(n, t), Err(PreError::InvalidPolicy(_))),
                "({n}, {t})"
            );
        }
    }

    #[test]
    fn policy_deserialization_validates() {
        let policy: ThresholdPolicy =
            serde_json::from_str(r#"{"num_split":3,"threshold":2}"#).unwrap();
        assert_eq!(policy, ThresholdPolicy::new(3, 2).unwrap());
        assert_eq!(
            serde_json::to_string(&policy).unwrap(),
            r#"{"num_split":3,"threshold":2}"#
        );
        assert!(serde_json::from_str::<ThresholdPolicy>(r#"{"num_split":2,"threshold":3}"#).is_err());
    }
}
