//! Library entry point for the threshold_pre crate.
//
// Threshold proxy re-encryption key management over secp256k1: key
// encapsulation, Shamir splitting of the delegation secret across proxy
// nodes, and threshold reconstruction of the symmetric key.

pub mod serde_types;
pub mod error;
pub mod crypto;
pub mod pre;
pub mod proxy;

pub use error::PreError;
pub use pre::{
    assemble::{assemble_reencrypt_fragment, reconstruct},
    encrypt::{encapsulate, generate_encrypt_key},
    kfrag::{generate_key_fragment, split_delegation},
    reencrypt::reencrypt,
    Capsule, EncapsulatedKey, KeyFragment, ReencryptedFragment, ThresholdPolicy, ENC_KEY_LENGTH,
};
