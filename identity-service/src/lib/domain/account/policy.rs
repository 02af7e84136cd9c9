//! Provider resolution policy.
//!
//! A pure decision function invoked at account creation and on any update
//! that introduces a new anchor. Keeping it here, rather than as implicit
//! field-presence inference at call sites, makes the precedence order and
//! the verified-at-creation rule directly testable.

use crate::domain::account::errors::NoAnchorError;
use crate::domain::account::models::AnchorSet;
use crate::domain::account::models::AuthProvider;

/// Outcome of provider resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The account already has an owner; supplying another anchor type is
    /// additive linking and never changes ownership.
    Unchanged(AuthProvider),

    /// First resolution: the provider that owns the account from now on,
    /// and whether creation itself counts as identity verification.
    Resolved {
        provider: AuthProvider,
        verified: bool,
    },
}

/// Resolve which provider owns an account.
///
/// Precedence when several anchors arrive at creation is
/// wallet > oauth > email > guest: key possession and third-party
/// attestation outrank an unauthenticated email signup.
///
/// Safe to re-run on every save; the `Unchanged` arm makes re-resolution
/// a no-op once ownership is set.
///
/// # Arguments
/// * `anchors` - All anchors known for the account, including any new one
/// * `current` - The provider already owning the account, if resolved before
///
/// # Errors
/// * `NoAnchorError` - The anchor set is empty
pub fn resolve(
    anchors: &AnchorSet,
    current: Option<AuthProvider>,
) -> Result<Resolution, NoAnchorError> {
    if let Some(provider) = current {
        return Ok(Resolution::Unchanged(provider));
    }

    let provider = if anchors.wallet_address.is_some() {
        AuthProvider::Wallet
    } else if anchors.oauth_subject.is_some() {
        AuthProvider::Oauth
    } else if anchors.email.is_some() {
        AuthProvider::Email
    } else if anchors.guest_id.is_some() {
        AuthProvider::Guest
    } else {
        return Err(NoAnchorError);
    };

    // Key possession (wallet) and third-party attestation (oauth) are
    // treated as proof of identity; a guest carries no disputable identity
    // claim, so only email starts unverified.
    let verified = !matches!(provider, AuthProvider::Email);

    Ok(Resolution::Resolved { provider, verified })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::models::EmailAddress;
    use crate::domain::account::models::WalletAddress;

    fn full_anchor_set() -> AnchorSet {
        AnchorSet {
            email: Some(EmailAddress::new("a@x.com".to_string()).unwrap()),
            wallet_address: Some(WalletAddress::new("0xabc".to_string()).unwrap()),
            oauth_subject: Some("subject-1".to_string()),
            guest_id: Some("guest-1".to_string()),
        }
    }

    #[test]
    fn test_wallet_outranks_everything() {
        let resolution = resolve(&full_anchor_set(), None).unwrap();

        assert_eq!(
            resolution,
            Resolution::Resolved {
                provider: AuthProvider::Wallet,
                verified: true,
            }
        );
    }

    #[test]
    fn test_oauth_outranks_email_and_guest() {
        let mut anchors = full_anchor_set();
        anchors.wallet_address = None;

        let resolution = resolve(&anchors, None).unwrap();

        assert_eq!(
            resolution,
            Resolution::Resolved {
                provider: AuthProvider::Oauth,
                verified: true,
            }
        );
    }

    #[test]
    fn test_email_outranks_guest_and_starts_unverified() {
        let mut anchors = full_anchor_set();
        anchors.wallet_address = None;
        anchors.oauth_subject = None;

        let resolution = resolve(&anchors, None).unwrap();

        assert_eq!(
            resolution,
            Resolution::Resolved {
                provider: AuthProvider::Email,
                verified: false,
            }
        );
    }

    #[test]
    fn test_guest_resolves_last_and_is_verified() {
        let anchors = AnchorSet::guest("guest-1".to_string());

        let resolution = resolve(&anchors, None).unwrap();

        assert_eq!(
            resolution,
            Resolution::Resolved {
                provider: AuthProvider::Guest,
                verified: true,
            }
        );
    }

    #[test]
    fn test_existing_provider_is_never_changed() {
        // An email account later linking a wallet keeps email ownership
        let resolution = resolve(&full_anchor_set(), Some(AuthProvider::Email)).unwrap();

        assert_eq!(resolution, Resolution::Unchanged(AuthProvider::Email));
    }

    #[test]
    fn test_empty_anchor_set_is_rejected() {
        assert_eq!(resolve(&AnchorSet::default(), None), Err(NoAnchorError));
    }
}
