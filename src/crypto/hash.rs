//! Hashing primitives shared by fragment generation and reconstruction.
//!
//! Both sides must derive identical scalars, so there is exactly one hash-to-scalar
//! scheme: SHA-256, truncated to the byte length of the group order and shifted right
//! by any excess bits. The resulting integer is then reduced modulo the order. All
//! later uses of it (inversion, polynomial evaluation, lagrange products, scalar
//! multiplication) are arithmetic modulo the order, so reducing it here changes none
//! of the derived values.

use ark_ff::PrimeField;
use num_bigint::BigUint;
use sha2::{Digest, Sha256};

use crate::crypto::F;

pub const DIGEST_SIZE: usize = 32;

pub fn digest_sha256(data: &[&[u8]]) -> [u8; DIGEST_SIZE] {
    let mut hasher = Sha256::new();
    for &d in data.iter() {
        hasher.update(d);
    }
    hasher.finalize().into()
}

/// Maps a digest to a scalar by bit-length truncation.
pub fn hash_to_scalar(digest: &[u8]) -> F {
    let order_bits = F::MODULUS_BIT_SIZE as usize;
    let order_bytes = (order_bits + 7) / 8;
    let truncated = &digest[..digest.len().min(order_bytes)];

    let mut value = BigUint::from_bytes_be(truncated);
    let excess = (truncated.len() * 8).saturating_sub(order_bits);
    if excess > 0 {
        value >>= excess;
    }
    F::from_be_bytes_mod_order(&value.to_bytes_be())
}

/// Counter-mode key derivation: `H(z || 1) || H(z || 2) || ...` truncated to `klen` bytes.
pub fn kdf(z: &[u8], klen: usize) -> Vec<u8> {
    let mut output = Vec::with_capacity(klen + DIGEST_SIZE);
    let mut counter: u32 = 1;
    while output.len() < klen {
        output.extend_from_slice(&digest_sha256(&[z, &counter.to_be_bytes()]));
        counter = counter.wrapping_add(1);
    }
    output.truncate(klen);
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::field_to_be_bytes;

    #[test]
    fn kdf_known_answer() {
        let expected = "46c386ebccef82ba0bb0b095aaa5548b03cdff6951871c6fb505af68af688332\
                        f885d324a47d2145";
        assert_eq!(hex::encode(kdf(b"abc", 40)), expected);
        // a shorter key is a prefix of the longer one
        assert_eq!(hex::encode(kdf(b"abc", 16)), &expected[..32]);
    }

    #[test]
    fn kdf_is_deterministic_and_sized() {
        let z = [7u8; 33];
        for klen in [0usize, 1, 16, 32, 33, 100] {
            let out = kdf(&z, klen);
            assert_eq!(out.len(), klen);
            assert_eq!(out, kdf(&z, klen));
        }
    }

    #[test]
    fn kdf_depends_on_every_byte() {
        let z = [7u8; 33];
        let base = kdf(&z, 16);
        for i in 0..z.len() {
            let mut flipped = z;
            flipped[i] ^= 0x01;
            assert_ne!(kdf(&flipped, 16), base);
        }
    }

    #[test]
    fn hash_to_scalar_keeps_digests_below_the_order() {
        let digest = [0x01u8; 32];
        assert_eq!(field_to_be_bytes(&hash_to_scalar(&digest)), digest);
    }

    #[test]
    fn hash_to_scalar_reduces_digests_above_the_order() {
        // (2^256 - 1) mod order
        let expected = hex::decode("00000000000000000000000000000001\
                                    4551231950b75fc4402da1732fc9bebe")
            .unwrap();
        let reduced = hash_to_scalar(&[0xff; 32]);
        assert_eq!(field_to_be_bytes(&reduced).to_vec(), expected);
    }

    #[test]
    fn hash_to_scalar_truncates_long_digests() {
        let mut long = [0u8; 64];
        long[31] = 9;
        long[63] = 1;
        assert_eq!(hash_to_scalar(&long), F::from(9u64));
    }
}
