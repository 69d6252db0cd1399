//! Property-based tests for username normalization.

use proptest::prelude::*;

use crate::identity::normalize;

proptest! {
    /// Normalizing an already-normalized username is a no-op when no
    /// domain policy is set.
    #[test]
    fn normalize_without_policy_is_idempotent(raw in "\\PC{0,40}") {
        if let Some(once) = normalize(&raw, None) {
            prop_assert_eq!(normalize(&once, None), Some(once.clone()));
        }
    }

    /// With a policy, a successful normalization never contains an '@'
    /// and reattaching the domain round-trips to the same local part.
    #[test]
    fn normalized_local_part_round_trips(local in "[A-Za-z0-9_.-]{1,20}") {
        let identity = format!("{local}@sanger.ac.uk");
        let username = normalize(&identity, Some("sanger.ac.uk"));
        prop_assert_eq!(username.as_deref(), Some(local.as_str()));
        prop_assert!(!username.unwrap_or_default().contains('@'));
    }

    /// Identities for a different domain never normalize under a policy.
    #[test]
    fn foreign_domain_never_normalizes(local in "[A-Za-z0-9_.-]{1,20}") {
        let identity = format!("{local}@other.org");
        prop_assert_eq!(normalize(&identity, Some("sanger.ac.uk")), None);
    }
}
