//! Username normalization.
//!
//! Extracts a canonical username from a raw identity string. When an
//! email-domain policy is configured the identity must be an email
//! address for that domain and the local part becomes the username.

use regex::RegexBuilder;

/// Normalizes a raw identity string to a canonical username.
///
/// The raw value is trimmed first; an empty result yields `None`.
/// With a domain policy, the identity must match
/// `^([\w.-]+)@<domain>$` case-insensitively and the captured local
/// part is returned; anything else yields `None`. Without a policy the
/// trimmed value is returned as-is.
///
/// Pure function, no I/O; `None` is the only failure mode.
pub fn normalize(raw: &str, domain_policy: Option<&str>) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let Some(domain) = domain_policy else {
        return Some(trimmed.to_string());
    };

    let pattern = format!(r"^([\w.-]+)@{}$", regex::escape(domain));
    let re = RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .ok()?;
    re.captures(trimmed).map(|captures| captures[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(normalize("  alice  ", None).as_deref(), Some("alice"));
    }

    #[test]
    fn test_empty_and_blank_yield_none() {
        assert_eq!(normalize("", None), None);
        assert_eq!(normalize("   ", None), None);
        assert_eq!(normalize("", Some("sanger.ac.uk")), None);
    }

    #[test]
    fn test_without_policy_returns_trimmed_value() {
        assert_eq!(normalize("alice", None).as_deref(), Some("alice"));
        assert_eq!(
            normalize("alice@anywhere.org", None).as_deref(),
            Some("alice@anywhere.org")
        );
    }

    #[test]
    fn test_policy_extracts_local_part() {
        assert_eq!(
            normalize("alice@sanger.ac.uk", Some("sanger.ac.uk")).as_deref(),
            Some("alice")
        );
        assert_eq!(
            normalize("a.b-c_d@sanger.ac.uk", Some("sanger.ac.uk")).as_deref(),
            Some("a.b-c_d")
        );
    }

    #[test]
    fn test_policy_match_is_case_insensitive() {
        assert_eq!(
            normalize("Alice@SANGER.AC.UK", Some("sanger.ac.uk")).as_deref(),
            Some("Alice")
        );
    }

    #[test]
    fn test_wrong_domain_yields_none() {
        assert_eq!(normalize("bob@other.org", Some("sanger.ac.uk")), None);
        assert_eq!(normalize("bob", Some("sanger.ac.uk")), None);
    }

    #[test]
    fn test_domain_dots_are_literal() {
        // The dot in the policy must not act as a regex wildcard.
        assert_eq!(normalize("bob@sangerxac.uk", Some("sanger.ac.uk")), None);
    }

    #[test]
    fn test_subdomain_does_not_match() {
        assert_eq!(
            normalize("bob@x.sanger.ac.uk", Some("sanger.ac.uk")),
            None
        );
    }
}
