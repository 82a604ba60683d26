//! Conversions at the wire boundary.
//!
//! Points travel as hex encoded compressed SEC1 bytes, private keys as variable-width
//! hex and fragment scalars (`random`, `value`) as decimal strings. Inside the crate
//! everything is a typed scalar or point; nothing here is used by the algorithms.

use num_bigint::BigUint;
use serde::{de, ser, Deserialize, Deserializer, Serialize, Serializer};

use crate::crypto::curve::CurvePoint;
use crate::crypto::{field_from_be_bytes, field_to_be_bytes, F};
use crate::error::PreError;
use crate::pre::{KeyFragment, ReencryptedFragment};

fn scalar_from_biguint(n: &BigUint) -> Result<F, PreError> {
    field_from_be_bytes::<F>(&n.to_bytes_be()).ok_or_else(|| {
        PreError::DecodingError(String::from("scalar is not below the group order"))
    })
}

fn scalar_to_biguint(x: &F) -> BigUint {
    BigUint::from_bytes_be(&field_to_be_bytes(x))
}

pub fn scalar_from_hex(s: &str) -> Result<F, PreError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    let n = BigUint::parse_bytes(digits.as_bytes(), 16)
        .ok_or_else(|| PreError::DecodingError(format!("invalid hex scalar '{s}'")))?;
    scalar_from_biguint(&n)
}

/// Parses a private key, which must be a non-zero scalar.
pub fn private_scalar_from_hex(s: &str) -> Result<F, PreError> {
    let k = scalar_from_hex(s)?;
    if k == F::from(0u64) {
        return Err(PreError::DecodingError(String::from("private key must be non-zero")));
    }
    Ok(k)
}

/// Lowercase hex without leading zeros.
pub fn scalar_to_hex(x: &F) -> String {
    scalar_to_biguint(x).to_str_radix(16)
}

pub fn scalar_from_decimal(s: &str) -> Result<F, PreError> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PreError::DecodingError(format!("invalid decimal scalar '{s}'")));
    }
    let n: BigUint = s
        .parse()
        .map_err(|e| PreError::DecodingError(format!("invalid decimal scalar '{s}': {e}")))?;
    scalar_from_biguint(&n)
}

pub fn scalar_to_decimal(x: &F) -> String {
    scalar_to_biguint(x).to_string()
}

pub fn point_from_hex(s: &str) -> Result<CurvePoint, PreError> {
    let bytes = hex::decode(s.strip_prefix("0x").unwrap_or(s))
        .map_err(|e| PreError::DecodingError(format!("invalid hex point: {e}")))?;
    CurvePoint::decompress(&bytes)
}

pub fn point_to_hex(p: &CurvePoint) -> Result<String, PreError> {
    Ok(hex::encode(p.compress()?))
}

/// `KeyFragment` as it is sent to a proxy.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct KeyFragmentWire {
    pub random: String,
    pub value: String,
    pub precur_pub: String,
}

/// `ReencryptedFragment` as it is returned by a proxy.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReencryptedFragmentWire {
    pub re_key_r: String,
    pub re_key_u: String,
    pub random: String,
    pub precur_pub: String,
}

impl KeyFragmentWire {
    pub fn encode(fragment: &KeyFragment) -> Result<Self, PreError> {
        Ok(KeyFragmentWire {
            random: scalar_to_decimal(&fragment.random),
            value: scalar_to_decimal(&fragment.value),
            precur_pub: point_to_hex(&fragment.precursor)?,
        })
    }

    pub fn decode(&self) -> Result<KeyFragment, PreError> {
        Ok(KeyFragment {
            random: scalar_from_decimal(&self.random)?,
            value: scalar_from_decimal(&self.value)?,
            precursor: point_from_hex(&self.precur_pub)?,
        })
    }
}

impl ReencryptedFragmentWire {
    pub fn encode(fragment: &ReencryptedFragment) -> Result<Self, PreError> {
        Ok(ReencryptedFragmentWire {
            re_key_r: point_to_hex(&fragment.re_key_r)?,
            re_key_u: point_to_hex(&fragment.re_key_u)?,
            random: scalar_to_decimal(&fragment.random),
            precur_pub: point_to_hex(&fragment.precursor)?,
        })
    }

    pub fn decode(&self) -> Result<ReencryptedFragment, PreError> {
        Ok(ReencryptedFragment {
            re_key_r: point_from_hex(&self.re_key_r)?,
            re_key_u: point_from_hex(&self.re_key_u)?,
            random: scalar_from_decimal(&self.random)?,
            precursor: point_from_hex(&self.precur_pub)?,
        })
    }
}

impl Serialize for KeyFragment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        KeyFragmentWire::encode(self)
            .map_err(ser::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for KeyFragment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        KeyFragmentWire::deserialize(deserializer)?
            .decode()
            .map_err(de::Error::custom)
    }
}

impl Serialize for ReencryptedFragment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ReencryptedFragmentWire::encode(self)
            .map_err(ser::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ReencryptedFragment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        ReencryptedFragmentWire::deserialize(deserializer)?
            .decode()
            .map_err(de::Error::custom)
    }
}
