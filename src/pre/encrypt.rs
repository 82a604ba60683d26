use rand::{thread_rng, Rng};
use tracing::instrument;

use crate::crypto::curve::CurvePoint;
use crate::crypto::keys::KeyPair;
use crate::error::PreError;
use crate::pre::{derive_symmetric_key, Capsule, EncapsulatedKey, ENC_KEY_LENGTH};
use crate::serde_types::{point_from_hex, point_to_hex};

/// Derives a fresh symmetric key for `owner` together with the capsule that lets
/// proxies re-encrypt it.
///
/// Two independent ephemeral key pairs `r`, `u` are sampled; the key is
/// `KDF((r + u)·owner)` and the capsule is `(r·G, u·G)`.
#[instrument(level = "debug", skip_all)]
pub fn encapsulate<R: Rng + ?Sized>(owner: &CurvePoint, rng: &mut R) -> Result<EncapsulatedKey, PreError> {
    if owner.is_identity() {
        return Err(PreError::ArithmeticError(String::from(
            "owner public key is the identity",
        )));
    }
    let r = KeyPair::generate(rng);
    let u = KeyPair::generate(rng);

    let shared = owner.scalar_mul(&(*r.secret() + u.secret()));
    let key = derive_symmetric_key(&shared)?;

    Ok(EncapsulatedKey {
        key,
        capsule: Capsule { r: *r.public(), u: *u.public() },
    })
}

/// Hex interface: returns the symmetric key and the hex encoded capsule points `(R, U)`.
pub fn generate_encrypt_key(
    owner_public_key: &str,
) -> Result<([u8; ENC_KEY_LENGTH], String, String), PreError> {
    let owner = point_from_hex(owner_public_key)?;
    let encapsulated = encapsulate(&owner, &mut thread_rng())?;
    Ok((
        encapsulated.key,
        point_to_hex(&encapsulated.capsule.r)?,
        point_to_hex(&encapsulated.capsule.u)?,
    ))
}
