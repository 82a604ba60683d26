use std::collections::HashSet;

use ark_ff::UniformRand;
use rand::{thread_rng, Rng};
use tracing::{instrument, trace};

use crate::crypto::curve::CurvePoint;
use crate::crypto::keys::KeyPair;
use crate::crypto::polynomial::ShamirPolynomial;
use crate::crypto::F;
use crate::error::PreError;
use crate::pre::session::Session;
use crate::pre::{KeyFragment, ThresholdPolicy};
use crate::serde_types::{point_from_hex, private_scalar_from_hex};

/// Splits the delegation from `owner_secret` to `recipient` into `policy.num_split()`
/// key fragments, any `policy.threshold()` of which reconstruct it.
///
/// A fresh precursor key pair is drawn for every call and shared by all fragments of
/// that call. With a single fragment no polynomial is built and the fragment carries
/// the delegation secret itself.
#[instrument(
    level = "debug",
    skip_all,
    fields(num_split = policy.num_split(), threshold = policy.threshold())
)]
pub fn split_delegation<R: Rng + ?Sized>(
    owner_secret: &F,
    recipient: &CurvePoint,
    policy: &ThresholdPolicy,
    rng: &mut R,
) -> Result<Vec<KeyFragment>, PreError> {
    let precursor = KeyPair::generate(rng);
    let session = Session::for_owner(&precursor, recipient)?;
    let delegation_secret = *owner_secret * session.delegation_scalar_inverse()?;

    if policy.num_split() == 1 {
        trace!("single fragment, no polynomial");
        return Ok(vec![KeyFragment {
            random: F::rand(rng),
            value: delegation_secret,
            precursor: *precursor.public(),
        }]);
    }

    let poly = ShamirPolynomial::sample(delegation_secret, policy.threshold(), rng);
    let mut identifiers = HashSet::with_capacity(policy.num_split());
    let mut fragments = Vec::with_capacity(policy.num_split());
    while fragments.len() < policy.num_split() {
        let random = F::rand(rng);
        let id = session.share_identifier(&random);
        if !identifiers.insert(id) {
            trace!("share identifier collision, resampling");
            continue;
        }
        fragments.push(KeyFragment {
            random,
            value: poly.evaluate(&id),
            precursor: *precursor.public(),
        });
    }
    Ok(fragments)
}

/// Hex interface over [`split_delegation`].
pub fn generate_key_fragment(
    owner_private_key: &str,
    recipient_public_key: &str,
    num_split: usize,
    threshold: usize,
) -> Result<Vec<KeyFragment>, PreError> {
    let policy = ThresholdPolicy::new(num_split, threshold)?;
    let owner_secret = private_scalar_from_hex(owner_private_key)?;
    let recipient = point_from_hex(recipient_public_key)?;
    split_delegation(&owner_secret, &recipient, &policy, &mut thread_rng())
}
