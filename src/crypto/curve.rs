//! # secp256k1 group operations
//!
//! A thin, opaque wrapper over the arkworks secp256k1 affine point. Callers only see
//! named operations (`add`, `scalar_mul`) and the SEC1 encodings used at the wire
//! boundary: 33-byte compressed points, and 65-byte uncompressed points on input.
//!
//! secp256k1 has cofactor one, so every point on the curve is in the prime-order group.

use std::ops::Add;

use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::{BigInteger, PrimeField};
use ark_secp256k1::{Affine, Fq};

use crate::crypto::{field_from_be_bytes, field_to_be_bytes, F, SCALAR_SIZE};
use crate::error::PreError;

pub const COMPRESSED_POINT_SIZE: usize = 33;
pub const UNCOMPRESSED_POINT_SIZE: usize = 65;

const TAG_EVEN: u8 = 0x02;
const TAG_ODD: u8 = 0x03;
const TAG_UNCOMPRESSED: u8 = 0x04;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CurvePoint(Affine);

/// Adds `q` to an optional accumulator, where `None` is the group identity.
pub fn add(p: Option<&CurvePoint>, q: &CurvePoint) -> CurvePoint {
    match p {
        None => *q,
        Some(p) => *p + *q,
    }
}

impl CurvePoint {
    pub fn identity() -> Self {
        CurvePoint(Affine::identity())
    }

    pub fn generator() -> Self {
        CurvePoint(Affine::generator())
    }

    /// Returns `k·G`.
    pub fn mul_base(k: &F) -> Self {
        Self::generator().scalar_mul(k)
    }

    pub fn is_identity(&self) -> bool {
        self.0.is_zero()
    }

    pub fn scalar_mul(&self, k: &F) -> Self {
        CurvePoint((self.0 * k).into_affine())
    }

    /// Affine x-coordinate as 32 big-endian bytes.
    pub fn x_bytes(&self) -> Result<[u8; SCALAR_SIZE], PreError> {
        if self.is_identity() {
            return Err(PreError::ArithmeticError(String::from(
                "identity point has no x-coordinate",
            )));
        }
        Ok(field_to_be_bytes(&self.0.x))
    }

    /// SEC1 compressed encoding: parity tag of y followed by x.
    pub fn compress(&self) -> Result<[u8; COMPRESSED_POINT_SIZE], PreError> {
        let x = self.x_bytes()?;
        let mut out = [0u8; COMPRESSED_POINT_SIZE];
        out[0] = if self.0.y.into_bigint().is_odd() { TAG_ODD } else { TAG_EVEN };
        out[1..].copy_from_slice(&x);
        Ok(out)
    }

    /// Parses a compressed or uncompressed SEC1 point.
    pub fn decompress(bytes: &[u8]) -> Result<Self, PreError> {
        match bytes.len() {
            COMPRESSED_POINT_SIZE => {
                let odd = match bytes[0] {
                    TAG_EVEN => false,
                    TAG_ODD => true,
                    tag => return Err(PreError::DecodingError(format!(
                        "invalid compressed point tag {tag:#04x}"
                    ))),
                };
                let x = parse_coordinate(&bytes[1..])?;
                let (y1, y2) = Affine::get_ys_from_x_unchecked(x).ok_or_else(|| {
                    PreError::DecodingError(String::from("x-coordinate is not on the curve"))
                })?;
                let y = if y1.into_bigint().is_odd() == odd { y1 } else { y2 };
                if y.into_bigint().is_odd() != odd {
                    return Err(PreError::DecodingError(String::from(
                        "no point with the requested y parity",
                    )));
                }
                Ok(CurvePoint(Affine::new_unchecked(x, y)))
            }
            UNCOMPRESSED_POINT_SIZE => {
                if bytes[0] != TAG_UNCOMPRESSED {
                    return Err(PreError::DecodingError(format!(
                        "invalid uncompressed point tag {:#04x}",
                        bytes[0]
                    )));
                }
                let x = parse_coordinate(&bytes[1..1 + SCALAR_SIZE])?;
                let y = parse_coordinate(&bytes[1 + SCALAR_SIZE..])?;
                let point = Affine::new_unchecked(x, y);
                if !point.is_on_curve() {
                    return Err(PreError::DecodingError(String::from("point is not on the curve")));
                }
                Ok(CurvePoint(point))
            }
            len => Err(PreError::DecodingError(format!(
                "point must be {COMPRESSED_POINT_SIZE} or {UNCOMPRESSED_POINT_SIZE} bytes, got {len}"
            ))),
        }
    }
}

impl Add for CurvePoint {
    type Output = CurvePoint;

    fn add(self, rhs: CurvePoint) -> CurvePoint {
        CurvePoint((self.0.into_group() + rhs.0).into_affine())
    }
}

fn parse_coordinate(bytes: &[u8]) -> Result<Fq, PreError> {
    field_from_be_bytes::<Fq>(bytes).ok_or_else(|| {
        PreError::DecodingError(String::from("coordinate exceeds the field modulus"))
    })
}
