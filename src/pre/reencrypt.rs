use crate::pre::{Capsule, KeyFragment, ReencryptedFragment};

/// What a proxy holding `fragment` returns for `capsule`: both capsule points scaled
/// by the fragment value, tagged with the fragment's `random` and precursor.
pub fn reencrypt(fragment: &KeyFragment, capsule: &Capsule) -> ReencryptedFragment {
    ReencryptedFragment {
        re_key_r: capsule.r.scalar_mul(&fragment.value),
        re_key_u: capsule.u.scalar_mul(&fragment.value),
        random: fragment.random,
        precursor: fragment.precursor,
    }
}
