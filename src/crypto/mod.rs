use ark_ff::{BigInteger, PrimeField};

pub mod curve;
pub mod hash;
pub mod interpolate;
pub mod keys;
pub mod polynomial;

/// Scalar field of secp256k1, i.e. integers modulo the group order.
pub type F = ark_secp256k1::Fr;

/// Big-endian width of a scalar or a base field element.
pub const SCALAR_SIZE: usize = 32;

pub fn bytes_to_bits_be(x: &[u8]) -> Vec<bool> {
    //convert byte array to bit array for BigInt conversion
    let mut output: Vec<bool> = Vec::with_capacity(x.len() * 8);

    for &byte in x {
        for i in (0..8).rev() {
            let bit = ((byte >> i) & 1) == 1;
            output.push(bit);
        }
    }

    output
}

/// Parses a canonical big-endian field element of at most 32 bytes.
/// Returns `None` when the integer is not below the field modulus.
pub fn field_from_be_bytes<P: PrimeField>(bytes: &[u8]) -> Option<P> {
    if bytes.len() > SCALAR_SIZE {
        return None;
    }
    let bigint = P::BigInt::from_bits_be(&bytes_to_bits_be(bytes));
    P::from_bigint(bigint)
}

/// Fixed-width big-endian encoding of a field element.
pub fn field_to_be_bytes<P: PrimeField>(x: &P) -> [u8; SCALAR_SIZE] {
    let bytes = x.into_bigint().to_bytes_be();
    let mut out = [0u8; SCALAR_SIZE];
    // secp256k1 fields are exactly 256 bits wide, so `bytes` is never longer than `out`.
    out[SCALAR_SIZE - bytes.len()..].copy_from_slice(&bytes);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_bytes_are_canonical() {
        let x = F::from(0x0102_0304u64);
        let bytes = field_to_be_bytes(&x);
        assert_eq!(&bytes[28..], &[1, 2, 3, 4]);
        assert!(bytes[..28].iter().all(|b| *b == 0));
        assert_eq!(field_from_be_bytes::<F>(&bytes), Some(x));
        assert_eq!(field_from_be_bytes::<F>(&[1, 2, 3, 4]), Some(x));
    }

    #[test]
    fn field_bytes_reject_modulus() {
        let order = F::MODULUS.to_bytes_be();
        assert_eq!(field_from_be_bytes::<F>(&order), None);
        assert_eq!(field_from_be_bytes::<F>(&[0xff; 32]), None);
        assert_eq!(field_from_be_bytes::<F>(&[0u8; 33]), None);
    }
}
