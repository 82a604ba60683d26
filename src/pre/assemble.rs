use std::collections::HashMap;

use ark_ff::Zero;
use tracing::{instrument, trace};

use crate::crypto::curve::CurvePoint;
use crate::crypto::interpolate::interpolate_points;
use crate::crypto::keys::KeyPair;
use crate::crypto::F;
use crate::error::PreError;
use crate::pre::session::Session;
use crate::pre::{derive_symmetric_key, ReencryptedFragment, ENC_KEY_LENGTH};

/// Picks the first `threshold` distinct fragments, after checking that every
/// supplied fragment belongs to the same session.
fn select_quorum(
    fragments: &[ReencryptedFragment],
    threshold: usize,
) -> Result<Vec<&ReencryptedFragment>, PreError> {
    let first = fragments.first().ok_or_else(|| {
        PreError::InsufficientOrInconsistentShares(String::from("no fragments supplied"))
    })?;
    if fragments.iter().any(|f| f.precursor != first.precursor) {
        return Err(PreError::InsufficientOrInconsistentShares(String::from(
            "fragments carry different precursor keys",
        )));
    }

    let mut seen: HashMap<F, &ReencryptedFragment> = HashMap::with_capacity(threshold);
    let mut quorum = Vec::with_capacity(threshold);
    for fragment in fragments {
        if let Some(previous) = seen.get(&fragment.random) {
            if *previous != fragment {
                return Err(PreError::InsufficientOrInconsistentShares(String::from(
                    "conflicting fragments share one random value",
                )));
            }
            continue;
        }
        seen.insert(fragment.random, fragment);
        quorum.push(fragment);
        if quorum.len() == threshold {
            break;
        }
    }

    if quorum.len() < threshold {
        return Err(PreError::InsufficientOrInconsistentShares(format!(
            "need {threshold} distinct fragments, got {}",
            quorum.len()
        )));
    }
    Ok(quorum)
}

/// Recovers the symmetric key from `threshold` re-encrypted fragments of one session.
///
/// Extra fragments beyond the first `threshold` distinct ones are ignored. A single
/// fragment is combined directly; otherwise the capsule points are interpolated at
/// zero over the recomputed share identifiers.
#[instrument(level = "debug", skip_all, fields(fragments = fragments.len(), threshold = threshold))]
pub fn reconstruct(
    recipient: &KeyPair,
    fragments: &[ReencryptedFragment],
    threshold: usize,
) -> Result<[u8; ENC_KEY_LENGTH], PreError> {
    if threshold == 0 {
        return Err(PreError::InvalidPolicy(String::from("threshold must be greater than 0")));
    }
    let quorum = select_quorum(fragments, threshold)?;
    let session = Session::for_recipient(&quorum[0].precursor, recipient)?;
    let delegation_scalar = session.delegation_scalar();
    if delegation_scalar.is_zero() {
        return Err(PreError::ArithmeticError(String::from("delegation scalar is zero")));
    }

    let combined = if quorum.len() == 1 {
        trace!("single fragment");
        quorum[0].re_key_r + quorum[0].re_key_u
    } else {
        let ids: Vec<F> = quorum.iter().map(|f| session.share_identifier(&f.random)).collect();
        let samples = |select: fn(&ReencryptedFragment) -> CurvePoint| -> Vec<(F, CurvePoint)> {
            ids.iter().zip(quorum.iter()).map(|(id, f)| (*id, select(f))).collect()
        };
        let (e, v) = rayon::join(
            || interpolate_points(&samples(|f| f.re_key_r)),
            || interpolate_points(&samples(|f| f.re_key_u)),
        );
        e? + v?
    };

    derive_symmetric_key(&combined.scalar_mul(&delegation_scalar))
}

/// Hex interface over [`reconstruct`]: every supplied fragment takes part.
pub fn assemble_reencrypt_fragment(
    recipient_private_key: &str,
    fragments: &[ReencryptedFragment],
) -> Result<[u8; ENC_KEY_LENGTH], PreError> {
    let recipient = KeyPair::from_hex(recipient_private_key)?;
    reconstruct(&recipient, fragments, fragments.len())
}
