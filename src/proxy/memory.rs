use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use rand::Rng;
use tracing::{debug, warn};

use crate::crypto::curve::CurvePoint;
use crate::crypto::keys::{ecdh_point, KeyPair};
use crate::error::PreError;
use crate::pre::reencrypt::reencrypt;
use crate::pre::{Capsule, KeyFragment, ReencryptedFragment};
use crate::proxy::{ProxyClient, ReencryptRequest, SendKeyFragmentRequest};
use crate::serde_types::{point_from_hex, point_to_hex, scalar_from_decimal};

struct StoredFragment {
    capsule: Capsule,
    fragment: KeyFragment,
    expires_at: Instant,
}

/// An in-process re-encryption node. It keeps one fragment per (owner, recipient)
/// pair and only accepts fragments whose `dh_proof` matches its own key.
pub struct MemoryProxy {
    keys: KeyPair,
    fragments: Mutex<HashMap<(String, String), StoredFragment>>,
}

// Hex inputs may differ in case or encoding, so keys are re-encoded before lookup.
fn pair_key(owner: &str, recipient: &str) -> Result<(String, String), PreError> {
    Ok((
        point_to_hex(&point_from_hex(owner)?)?,
        point_to_hex(&point_from_hex(recipient)?)?,
    ))
}

impl MemoryProxy {
    pub fn new(keys: KeyPair) -> Self {
        MemoryProxy { keys, fragments: Mutex::new(HashMap::new()) }
    }

    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(KeyPair::generate(rng))
    }

    pub fn len(&self) -> usize {
        self.fragments.lock().map(|store| store.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn store(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<(String, String), StoredFragment>>, PreError> {
        self.fragments
            .lock()
            .map_err(|_| PreError::Transport(String::from("proxy state lock poisoned")))
    }
}

impl ProxyClient for MemoryProxy {
    fn public_key(&self) -> CurvePoint {
        *self.keys.public()
    }

    fn send_key_fragment(&self, request: &SendKeyFragmentRequest) -> Result<bool, PreError> {
        let owner = point_from_hex(&request.pub_owner)?;
        let expected_proof = ecdh_point(&owner, self.keys.secret())?;
        let proof = hex::decode(&request.dh_proof)
            .map_err(|e| PreError::DecodingError(format!("invalid dh proof: {e}")))?;
        if proof != expected_proof {
            warn!("rejecting fragment with a bad dh proof");
            return Ok(false);
        }

        let capsule = Capsule {
            r: point_from_hex(&request.pub_proof_r)?,
            u: point_from_hex(&request.pub_proof_u)?,
        };
        let fragment = KeyFragment {
            random: scalar_from_decimal(&request.random)?,
            value: scalar_from_decimal(&request.value)?,
            precursor: point_from_hex(&request.precur_pub)?,
        };
        let key = pair_key(&request.pub_owner, &request.pub_recipient)?;
        let expires_at = Instant::now() + Duration::from_secs(request.expire);

        debug!(expire = request.expire, "fragment registered");
        self.store()?.insert(key, StoredFragment { capsule, fragment, expires_at });
        Ok(true)
    }

    fn reencrypt(&self, request: &ReencryptRequest) -> Result<ReencryptedFragment, PreError> {
        let key = pair_key(&request.pub_owner, &request.pub_recipient)?;
        let mut store = self.store()?;
        let stored = store.get(&key).ok_or_else(|| {
            PreError::Transport(String::from("no fragment registered for this owner and recipient"))
        })?;
        if Instant::now() >= stored.expires_at {
            store.remove(&key);
            return Err(PreError::Transport(String::from("fragment registration expired")));
        }
        Ok(reencrypt(&stored.fragment, &stored.capsule))
    }
}
