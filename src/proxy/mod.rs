//! # Proxy node boundary
//!
//! Proxies are reached through [`ProxyClient`], which mirrors the two RPCs of a
//! re-encryption node: `CollectFragment` stores one key fragment for an
//! (owner, recipient) pair, `Reencrypt` returns that fragment applied to the stored
//! capsule. Requests carry the wire encodings so any transport can forward them as is.
//!
//! [`memory::MemoryProxy`] is an in-process node and [`driver`] fans requests out
//! to a set of nodes.

use serde::{Deserialize, Serialize};

use crate::crypto::curve::CurvePoint;
use crate::crypto::keys::{ecdh_point, KeyPair};
use crate::error::PreError;
use crate::pre::{Capsule, KeyFragment, ReencryptedFragment};
use crate::serde_types::{point_to_hex, scalar_to_decimal};

pub mod driver;
pub mod memory;

/// Lifetime, in seconds, of a fragment registration when none is configured.
pub const DEFAULT_EXPIRE_SECS: u64 = 100_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
    pub expire: u64,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        ProxyConfig { expire: DEFAULT_EXPIRE_SECS }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SendKeyFragmentRequest {
    pub pub_owner: String,
    pub pub_recipient: String,
    pub pub_proof_r: String,
    pub pub_proof_u: String,
    pub random: String,
    pub value: String,
    pub expire: u64,
    /// `ECDH(proxy public key, owner private key)`, proving the sender owns `pub_owner`.
    pub dh_proof: String,
    pub precur_pub: String,
}

impl SendKeyFragmentRequest {
    pub fn new(
        owner: &KeyPair,
        recipient: &CurvePoint,
        proxy: &CurvePoint,
        capsule: &Capsule,
        fragment: &KeyFragment,
        expire: u64,
    ) -> Result<Self, PreError> {
        Ok(SendKeyFragmentRequest {
            pub_owner: owner.public_key_hex()?,
            pub_recipient: point_to_hex(recipient)?,
            pub_proof_r: point_to_hex(&capsule.r)?,
            pub_proof_u: point_to_hex(&capsule.u)?,
            random: scalar_to_decimal(&fragment.random),
            value: scalar_to_decimal(&fragment.value),
            expire,
            dh_proof: hex::encode(ecdh_point(proxy, owner.secret())?),
            precur_pub: point_to_hex(&fragment.precursor)?,
        })
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReencryptRequest {
    pub pub_owner: String,
    pub pub_recipient: String,
}

impl ReencryptRequest {
    pub fn new(owner: &CurvePoint, recipient: &CurvePoint) -> Result<Self, PreError> {
        Ok(ReencryptRequest {
            pub_owner: point_to_hex(owner)?,
            pub_recipient: point_to_hex(recipient)?,
        })
    }
}

pub trait ProxyClient: Send + Sync {
    /// Public key the owner's `dh_proof` is computed against.
    fn public_key(&self) -> CurvePoint;

    /// Registers a fragment. `Ok(false)` means the node refused it.
    fn send_key_fragment(&self, request: &SendKeyFragmentRequest) -> Result<bool, PreError>;

    fn reencrypt(&self, request: &ReencryptRequest) -> Result<ReencryptedFragment, PreError>;
}
