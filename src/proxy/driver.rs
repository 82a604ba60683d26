//! Fans fragment registration and re-encryption requests out to proxy nodes.
//!
//! Requests run on the rayon pool. Registration goes to every node; re-encryption
//! stops being requested once `threshold` fragments are in hand, and nodes that fail
//! are logged and skipped as long as enough others answer.

use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use tracing::{instrument, trace, warn};

use crate::crypto::curve::CurvePoint;
use crate::crypto::keys::KeyPair;
use crate::error::PreError;
use crate::pre::{Capsule, KeyFragment, ReencryptedFragment};
use crate::proxy::{ProxyClient, ProxyConfig, ReencryptRequest, SendKeyFragmentRequest};

/// Sends fragment `i` to proxy `i`. Returns how many proxies accepted their fragment.
#[instrument(level = "debug", skip_all, fields(proxies = proxies.len()))]
pub fn distribute(
    proxies: &[&dyn ProxyClient],
    owner: &KeyPair,
    recipient: &CurvePoint,
    capsule: &Capsule,
    fragments: &[KeyFragment],
    config: &ProxyConfig,
) -> Result<usize, PreError> {
    if proxies.len() != fragments.len() {
        return Err(PreError::InvalidPolicy(format!(
            "{} fragments for {} proxies",
            fragments.len(),
            proxies.len()
        )));
    }

    let requests = proxies
        .iter()
        .zip(fragments)
        .map(|(proxy, fragment)| {
            SendKeyFragmentRequest::new(
                owner,
                recipient,
                &proxy.public_key(),
                capsule,
                fragment,
                config.expire,
            )
        })
        .collect::<Result<Vec<_>, PreError>>()?;

    let accepted = proxies
        .par_iter()
        .zip(requests.par_iter())
        .enumerate()
        .filter(|(index, (proxy, request))| match proxy.send_key_fragment(request) {
            Ok(true) => true,
            Ok(false) => {
                warn!(proxy = index, "fragment refused");
                false
            }
            Err(err) => {
                warn!(proxy = index, error = %err, "fragment delivery failed");
                false
            }
        })
        .count();

    trace!(accepted, "fragments distributed");
    Ok(accepted)
}

/// Collects `threshold` re-encrypted fragments for (owner, recipient).
#[instrument(level = "debug", skip_all, fields(proxies = proxies.len(), threshold = threshold))]
pub fn collect(
    proxies: &[&dyn ProxyClient],
    owner: &CurvePoint,
    recipient: &CurvePoint,
    threshold: usize,
) -> Result<Vec<ReencryptedFragment>, PreError> {
    let request = ReencryptRequest::new(owner, recipient)?;
    let collected = AtomicUsize::new(0);

    let mut fragments: Vec<ReencryptedFragment> = proxies
        .par_iter()
        .enumerate()
        .filter_map(|(index, proxy)| {
            if collected.load(Ordering::Acquire) >= threshold {
                return None;
            }
            match proxy.reencrypt(&request) {
                Ok(fragment) => {
                    collected.fetch_add(1, Ordering::AcqRel);
                    Some(fragment)
                }
                Err(err) => {
                    warn!(proxy = index, error = %err, "re-encryption failed");
                    None
                }
            }
        })
        .collect();

    if fragments.len() < threshold {
        return Err(PreError::InsufficientOrInconsistentShares(format!(
            "only {} of {threshold} required proxies answered",
            fragments.len()
        )));
    }
    fragments.truncate(threshold);
    Ok(fragments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pre::assemble::reconstruct;
    use crate::pre::encrypt::encapsulate;
    use crate::pre::kfrag::split_delegation;
    use crate::pre::ThresholdPolicy;
    use crate::proxy::memory::MemoryProxy;
    use rand::thread_rng;

    struct DownProxy(CurvePoint);

    impl ProxyClient for DownProxy {
        fn public_key(&self) -> CurvePoint {
            self.0
        }

        fn send_key_fragment(&self, _request: &SendKeyFragmentRequest) -> Result<bool, PreError> {
            Err(PreError::Transport(String::from("connection refused")))
        }

        fn reencrypt(&self, _request: &ReencryptRequest) -> Result<ReencryptedFragment, PreError> {
            Err(PreError::Transport(String::from("connection refused")))
        }
    }

    #[test]
    fn end_to_end_through_memory_proxies() {
        let mut rng = thread_rng();
        let owner = KeyPair::generate(&mut rng);
        let recipient = KeyPair::generate(&mut rng);
        let policy = ThresholdPolicy::new(3, 2).unwrap();

        let encapsulated = encapsulate(owner.public(), &mut rng).unwrap();
        let fragments = split_delegation(owner.secret(), recipient.public(), &policy, &mut rng).unwrap();

        let nodes: Vec<MemoryProxy> = (0..3).map(|_| MemoryProxy::generate(&mut rng)).collect();
        let proxies: Vec<&dyn ProxyClient> = nodes.iter().map(|n| n as &dyn ProxyClient).collect();

        let accepted = distribute(
            &proxies,
            &owner,
            recipient.public(),
            &encapsulated.capsule,
            &fragments,
            &ProxyConfig::default(),
        )
        .unwrap();
        assert_eq!(accepted, 3);

        let reencrypted = collect(&proxies, owner.public(), recipient.public(), policy.threshold()).unwrap();
        assert_eq!(reencrypted.len(), 2);
        let key = reconstruct(&recipient, &reencrypted, policy.threshold()).unwrap();
        assert_eq!(key, encapsulated.key);
    }

    #[test]
    fn tolerates_failures_up_to_the_slack() {
        let mut rng = thread_rng();
        let owner = KeyPair::generate(&mut rng);
        let recipient = KeyPair::generate(&mut rng);
        let policy = ThresholdPolicy::new(4, 2).unwrap();

        let encapsulated = encapsulate(owner.public(), &mut rng).unwrap();
        let fragments = split_delegation(owner.secret(), recipient.public(), &policy, &mut rng).unwrap();

        let up: Vec<MemoryProxy> = (0..2).map(|_| MemoryProxy::generate(&mut rng)).collect();
        let down: Vec<DownProxy> = (0..2)
            .map(|_| DownProxy(*KeyPair::generate(&mut rng).public()))
            .collect();
        let proxies: Vec<&dyn ProxyClient> =
            vec![&down[0] as &dyn ProxyClient, &up[0], &down[1], &up[1]];

        let accepted = distribute(
            &proxies,
            &owner,
            recipient.public(),
            &encapsulated.capsule,
            &fragments,
            &ProxyConfig::default(),
        )
        .unwrap();
        assert_eq!(accepted, 2);

        let reencrypted = collect(&proxies, owner.public(), recipient.public(), 2).unwrap();
        assert_eq!(reconstruct(&recipient, &reencrypted, 2).unwrap(), encapsulated.key);

        // one more failure than the slack allows
        let too_few: Vec<&dyn ProxyClient> = vec![&down[0] as &dyn ProxyClient, &up[0], &down[1]];
        assert!(matches!(
            collect(&too_few, owner.public(), recipient.public(), 2),
            Err(PreError::InsufficientOrInconsistentShares(_))
        ));
    }

    #[test]
    fn one_proxy_per_fragment() {
        let mut rng = thread_rng();
        let owner = KeyPair::generate(&mut rng);
        let node = MemoryProxy::generate(&mut rng);
        let proxies: Vec<&dyn ProxyClient> = vec![&node as &dyn ProxyClient];
        let encapsulated = encapsulate(owner.public(), &mut rng).unwrap();
        let fragments = split_delegation(
            owner.secret(),
            owner.public(),
            &ThresholdPolicy::new(2, 2).unwrap(),
            &mut rng,
        )
        .unwrap();
        assert!(matches!(
            distribute(
                &proxies,
                &owner,
                owner.public(),
                &encapsulated.capsule,
                &fragments,
                &ProxyConfig::default()
            ),
            Err(PreError::InvalidPolicy(_))
        ));
    }
}
