use ark_ff::Field;

use crate::crypto::curve::{CurvePoint, COMPRESSED_POINT_SIZE};
use crate::crypto::hash::{digest_sha256, hash_to_scalar};
use crate::crypto::keys::{ecdh_point, KeyPair};
use crate::crypto::{field_to_be_bytes, F, SCALAR_SIZE};
use crate::error::PreError;

/// Hash context shared by the owner and the recipient of one fragment session.
///
/// The owner builds it from the precursor secret and the recipient public key, the
/// recipient from its own secret and the precursor public key. Both sides end up with
/// the same ECDH point and therefore derive the same scalars.
pub(crate) struct Session {
    precursor_x: [u8; SCALAR_SIZE],
    recipient_x: [u8; SCALAR_SIZE],
    dh: [u8; COMPRESSED_POINT_SIZE],
}

impl Session {
    pub(crate) fn for_owner(precursor: &KeyPair, recipient: &CurvePoint) -> Result<Self, PreError> {
        Ok(Session {
            precursor_x: precursor.public().x_bytes()?,
            recipient_x: recipient.x_bytes()?,
            dh: ecdh_point(recipient, precursor.secret())?,
        })
    }

    pub(crate) fn for_recipient(precursor: &CurvePoint, recipient: &KeyPair) -> Result<Self, PreError> {
        Ok(Session {
            precursor_x: precursor.x_bytes()?,
            recipient_x: recipient.public().x_bytes()?,
            dh: ecdh_point(precursor, recipient.secret())?,
        })
    }

    /// Scalar that masks the delegation secret: `f(0) = owner / d`.
    pub(crate) fn delegation_scalar(&self) -> F {
        hash_to_scalar(&digest_sha256(&[&self.precursor_x, &self.recipient_x, &self.dh]))
    }

    pub(crate) fn delegation_scalar_inverse(&self) -> Result<F, PreError> {
        self.delegation_scalar().inverse().ok_or_else(|| {
            PreError::ArithmeticError(String::from("delegation scalar is zero"))
        })
    }

    pub(crate) fn share_identifier(&self, random: &F) -> F {
        let random = field_to_be_bytes(random);
        hash_to_scalar(&digest_sha256(&[
            &self.precursor_x,
            &self.recipient_x,
            &self.dh,
            &random,
        ]))
    }
}
