//! # Identity Gate
//!
//! The single access-control check in the core: does the username the user
//! typed match the username the attestation derived? If an attestation is
//! present and disagrees, the mint must not be attempted — no ledger call
//! is made at all.
//!
//! If no attestation is present, the gate allows the mint. That is a known
//! weakness of the demo design, preserved deliberately: the gate is
//! client-side advisory and the ledger does not enforce it. Hardening this
//! into a real binding (a signed assertion tying the on-chain account to
//! the external identity) is a product decision, not a bug fix.

use thiserror::Error;

use super::deriver::ActivityStats;

/// The claimed username does not match the attested one.
///
/// User-correctable: fix the username field or re-run the attestation.
/// Surfaced immediately, never retried.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("identity mismatch: claimed '{claimed}' but attestation is for '{attested}'")]
pub struct IdentityMismatch {
    /// The username the caller asked to mint for.
    pub claimed: String,
    /// The username the attestation actually derived.
    pub attested: String,
}

/// Returns `true` if a mint for `claimed` may proceed.
///
/// With no attestation, every claim passes. With an attestation, only an
/// exact (case-sensitive) username match passes.
pub fn can_mint(claimed: &str, attested: Option<&ActivityStats>) -> bool {
    match attested {
        None => true,
        Some(stats) => claimed == stats.username,
    }
}

/// Like [`can_mint`], but produces the full [`IdentityMismatch`] error for
/// the rejection path.
pub fn ensure_can_mint(
    claimed: &str,
    attested: Option<&ActivityStats>,
) -> Result<(), IdentityMismatch> {
    match attested {
        Some(stats) if claimed != stats.username => Err(IdentityMismatch {
            claimed: claimed.to_string(),
            attested: stats.username.clone(),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attestation::derive;

    #[test]
    fn no_attestation_allows_any_claim() {
        assert!(can_mint("anyone", None));
        assert!(can_mint("", None));
        assert!(ensure_can_mint("anyone", None).is_ok());
    }

    #[test]
    fn matching_claim_passes() {
        let stats = derive("some-code");
        assert!(can_mint(&stats.username, Some(&stats)));
        assert!(ensure_can_mint(&stats.username, Some(&stats)).is_ok());
    }

    #[test]
    fn mismatched_claim_fails() {
        let stats = derive("some-code");
        assert!(!can_mint("impostor", Some(&stats)));

        let err = ensure_can_mint("impostor", Some(&stats)).unwrap_err();
        assert_eq!(err.claimed, "impostor");
        assert_eq!(err.attested, stats.username);
    }

    #[test]
    fn comparison_is_case_sensitive() {
        let stats = derive("");
        // Derived username is "github-user-0"; a case variant must not pass.
        assert!(!can_mint("GitHub-User-0", Some(&stats)));
    }
}
