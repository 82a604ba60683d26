use std::fmt;

use ark_ff::{UniformRand, Zero};
use rand::Rng;

use crate::crypto::curve::{CurvePoint, COMPRESSED_POINT_SIZE};
use crate::crypto::F;
use crate::error::PreError;
use crate::serde_types::{point_from_hex, point_to_hex, private_scalar_from_hex, scalar_to_hex};

/// A secp256k1 key pair. The private scalar is never zero.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyPair {
    secret: F,
    public: CurvePoint,
}

pub fn random_nonzero_scalar<R: Rng + ?Sized>(rng: &mut R) -> F {
    loop {
        let k = F::rand(rng);
        if !k.is_zero() {
            return k;
        }
    }
}

impl KeyPair {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let secret = random_nonzero_scalar(rng);
        KeyPair { secret, public: CurvePoint::mul_base(&secret) }
    }

    pub fn from_secret(secret: F) -> Result<Self, PreError> {
        if secret.is_zero() {
            return Err(PreError::DecodingError(String::from("private key must be non-zero")));
        }
        Ok(KeyPair { secret, public: CurvePoint::mul_base(&secret) })
    }

    pub fn from_hex(private_key: &str) -> Result<Self, PreError> {
        Self::from_secret(private_scalar_from_hex(private_key)?)
    }

    pub fn secret(&self) -> &F {
        &self.secret
    }

    pub fn public(&self) -> &CurvePoint {
        &self.public
    }

    /// Variable-width lowercase hex, the format private keys travel in.
    pub fn private_key_hex(&self) -> String {
        scalar_to_hex(&self.secret)
    }

    pub fn public_key_hex(&self) -> Result<String, PreError> {
        point_to_hex(&self.public)
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair").field("public", &self.public).finish_non_exhaustive()
    }
}

/// Compressed Diffie-Hellman point `secret·public`.
pub fn ecdh_point(public: &CurvePoint, secret: &F) -> Result<[u8; COMPRESSED_POINT_SIZE], PreError> {
    public.scalar_mul(secret).compress()
}

pub fn public_key_from_private(private_key: &str) -> Result<String, PreError> {
    KeyPair::from_hex(private_key)?.public_key_hex()
}

/// Hex encoded ECDH point, used by an owner to prove its identity to a proxy.
pub fn ecdh(public_key: &str, private_key: &str) -> Result<String, PreError> {
    let public = point_from_hex(public_key)?;
    let secret = private_scalar_from_hex(private_key)?;
    Ok(hex::encode(ecdh_point(&public, &secret)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::thread_rng;

    const OWNER: &str = "85bf7aa29436bb186cac45ecd8ea9e63e56c5817e127ebb5e99cd5a9cbfe0f23";
    const OWNER_PUB: &str = "02005d3a38feaff00f1b83014b2602d7b5b39506ddee7919dd66539b5428358f08";
    const RECIPIENT: &str = "1f2e3d4c5b6a79881f2e3d4c5b6a79881f2e3d4c5b6a79881f2e3d4c5b6a7988";
    const RECIPIENT_PUB: &str = "02085fe2ca7a5758957ea811bd8e743d9cee6bc20072f1470a888c43a1091a8e8b";

    #[test]
    fn derives_known_public_keys() {
        assert_eq!(public_key_from_private(OWNER).unwrap(), OWNER_PUB);
        assert_eq!(public_key_from_private(&format!("0x{OWNER}")).unwrap(), OWNER_PUB);
        assert_eq!(public_key_from_private(RECIPIENT).unwrap(), RECIPIENT_PUB);
        assert_eq!(
            public_key_from_private("1").unwrap(),
            "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
        );
    }

    #[test]
    fn ecdh_is_symmetric() {
        let expected = "0338d7a1d22679f4ca9e9ecbfd6b1ab2b00b36959f7d05b146846fdf3ec893f58b";
        assert_eq!(ecdh(RECIPIENT_PUB, OWNER).unwrap(), expected);
        assert_eq!(ecdh(OWNER_PUB, RECIPIENT).unwrap(), expected);
    }

    #[test]
    fn generated_keys_roundtrip_through_hex() {
        let keys = KeyPair::generate(&mut thread_rng());
        let restored = KeyPair::from_hex(&keys.private_key_hex()).unwrap();
        assert_eq!(restored, keys);
        assert_eq!(
            public_key_from_private(&keys.private_key_hex()).unwrap(),
            keys.public_key_hex().unwrap()
        );
    }

    #[test]
    fn zero_private_key_is_rejected() {
        assert!(matches!(KeyPair::from_secret(F::zero()), Err(PreError::DecodingError(_))));
        assert!(matches!(KeyPair::from_hex("0"), Err(PreError::DecodingError(_))));
    }

    #[test]
    fn debug_hides_the_secret() {
        let keys = KeyPair::from_hex(OWNER).unwrap();
        assert!(!format!("{keys:?}").contains(OWNER));
    }
}
