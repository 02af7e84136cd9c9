use async_trait::async_trait;

use crate::domain::account::errors::AuthError;
use crate::domain::account::errors::NotifierError;
use crate::domain::account::errors::StoreError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::CredentialUpdate;
use crate::domain::account::models::Credentials;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::SessionClaims;
use crate::domain::account::models::SessionToken;
use crate::domain::account::models::WalletAddress;

/// Port for identity domain service operations.
///
/// This is the surface the transport collaborator calls into; it terminates
/// connections and parses credential payloads, then hands validated input
/// to these operations.
#[async_trait]
pub trait IdentityServicePort: Send + Sync + 'static {
    /// Create an email/password account.
    ///
    /// # Arguments
    /// * `email` - Validated, normalized email anchor
    /// * `password` - Plaintext secret (hashed before persistence)
    ///
    /// # Returns
    /// Created account, unverified until challenge redemption
    ///
    /// # Errors
    /// * `DuplicateAnchor` - The email is already owned by another account
    /// * `Store` - Store operation failed
    async fn register_email_account(
        &self,
        email: EmailAddress,
        password: &str,
    ) -> Result<Account, AuthError>;

    /// Authenticate one set of inbound credentials.
    ///
    /// Wallet, OAuth, and guest credentials provision an account on first
    /// sight; email credentials never do.
    ///
    /// # Arguments
    /// * `credentials` - Exactly one credential kind
    ///
    /// # Returns
    /// Signed session token bound to the resolved account
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password, indistinguishable
    /// * `Store` - Store operation failed
    async fn authenticate(&self, credentials: Credentials) -> Result<SessionToken, AuthError>;

    /// Issue an email-verification challenge for an account.
    ///
    /// Replaces any outstanding verification challenge.
    ///
    /// # Arguments
    /// * `id` - Account to challenge
    ///
    /// # Returns
    /// The opaque challenge token (also persisted with its expiry)
    ///
    /// # Errors
    /// * `AccountNotFound` - No account with this id
    /// * `Store` - Store operation failed
    async fn issue_verification_challenge(&self, id: &AccountId) -> Result<String, AuthError>;

    /// Redeem an email-verification challenge.
    ///
    /// Single-use: success marks the account verified and clears the pair.
    /// A wrong guess or an expired token leaves the outstanding challenge
    /// in place.
    ///
    /// # Arguments
    /// * `token` - Candidate challenge token
    ///
    /// # Errors
    /// * `InvalidOrExpiredToken` - Missing, mismatched, or expired
    /// * `Store` - Store operation failed
    async fn redeem_verification_challenge(&self, token: &str) -> Result<(), AuthError>;

    /// Issue a password-reset challenge for an email.
    ///
    /// Success-shaped whether or not the email exists, so callers cannot
    /// probe for registered addresses; the token travels only through the
    /// challenge notifier.
    ///
    /// # Arguments
    /// * `email` - Email to challenge
    ///
    /// # Errors
    /// * `Store` - Store operation failed
    async fn issue_reset_challenge(&self, email: &EmailAddress) -> Result<(), AuthError>;

    /// Redeem a password-reset challenge.
    ///
    /// Single-use: success replaces the password hash and clears the pair
    /// in one atomic update. Failure semantics match verification redemption.
    ///
    /// # Arguments
    /// * `token` - Candidate challenge token
    /// * `new_secret` - Replacement plaintext secret
    ///
    /// # Errors
    /// * `InvalidOrExpiredToken` - Missing, mismatched, or expired
    /// * `Store` - Store operation failed
    async fn redeem_reset_challenge(&self, token: &str, new_secret: &str)
        -> Result<(), AuthError>;

    /// Validate a session token and return its claims.
    ///
    /// Checks signature and expiry only; no store round trip, so a token
    /// stays valid until expiry even if the account changed since issuance.
    ///
    /// # Arguments
    /// * `token` - Session token string
    ///
    /// # Errors
    /// * `InvalidSessionToken` - Bad signature, malformed, or expired
    fn verify_session_token(&self, token: &str) -> Result<SessionClaims, AuthError>;
}

/// Persistence operations for the account aggregate.
///
/// The store collaborator behind this port must enforce anchor uniqueness
/// as a hard constraint and apply each `CredentialUpdate` as one atomic
/// write keyed by account id. Transient backend errors are the store's to
/// retry, not this subsystem's.
#[async_trait]
pub trait AccountRepository: Send + Sync + 'static {
    /// Persist a new account.
    ///
    /// # Errors
    /// * `DuplicateAnchor` - An anchor is already owned by another account
    /// * `Backend` - Store operation failed
    async fn insert(&self, account: Account) -> Result<Account, StoreError>;

    /// Retrieve an account by identifier.
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, StoreError>;

    /// Retrieve an account by email anchor (case-insensitive).
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Account>, StoreError>;

    /// Retrieve an account by wallet anchor (case-insensitive).
    async fn find_by_wallet(&self, address: &WalletAddress)
        -> Result<Option<Account>, StoreError>;

    /// Retrieve an account by OAuth subject anchor.
    async fn find_by_oauth_subject(&self, subject: &str) -> Result<Option<Account>, StoreError>;

    /// Retrieve the account holding an outstanding verification token.
    async fn find_by_verification_token(&self, token: &str)
        -> Result<Option<Account>, StoreError>;

    /// Retrieve the account holding an outstanding reset token.
    async fn find_by_reset_token(&self, token: &str) -> Result<Option<Account>, StoreError>;

    /// Apply one credential mutation as an atomic read-modify-write.
    ///
    /// Redeem updates carry the candidate token; the store must verify it
    /// against the outstanding pair inside the same critical section that
    /// commits the write, so a consumed or replaced challenge is never
    /// redeemed twice.
    ///
    /// # Errors
    /// * `NotFound` - No account with this id
    /// * `StaleChallenge` - Redeemed token is missing, mismatched, or expired
    /// * `Backend` - Store operation failed
    async fn update_credentials(
        &self,
        id: &AccountId,
        update: CredentialUpdate,
    ) -> Result<Account, StoreError>;
}

/// Out-of-band delivery of challenge tokens.
///
/// Delivery failures are logged by the service and never fail the issuing
/// operation; the challenge stays redeemable and can be re-issued.
#[async_trait]
pub trait ChallengeNotifier: Send + Sync + 'static {
    /// Deliver a verification challenge token to an account's email.
    async fn deliver_verification(
        &self,
        email: &EmailAddress,
        token: &str,
    ) -> Result<(), NotifierError>;

    /// Deliver a password-reset challenge token to an account's email.
    async fn deliver_reset(&self, email: &EmailAddress, token: &str) -> Result<(), NotifierError>;
}
