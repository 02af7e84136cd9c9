use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::account::errors::AccountIdError;
use crate::domain::account::errors::EmailError;
use crate::domain::account::errors::NoAnchorError;
use crate::domain::account::errors::StaleChallengeError;
use crate::domain::account::errors::WalletAddressError;
use crate::domain::account::policy;
use crate::domain::account::policy::Resolution;

/// Account aggregate entity.
///
/// The persisted identity record. An account carries at least one unique
/// identity anchor at all times, and the provider that established
/// ownership never changes after first resolution.
///
/// Deliberately not `Serialize`: the password hash must never travel
/// through a read path, so callers serialize claims or projections instead
/// of the entity itself.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: AccountId,
    pub email: Option<EmailAddress>,
    pub wallet_address: Option<WalletAddress>,
    pub oauth_subject: Option<String>,
    pub guest_id: Option<String>,
    pub password_hash: Option<String>,
    pub auth_provider: AuthProvider,
    pub role: Role,
    pub is_verified: bool,
    pub verification: Option<ChallengePair>,
    pub reset: Option<ChallengePair>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account from its initial anchors.
    ///
    /// Invokes the provider resolution policy exactly once, here, so that
    /// ownership and the verified-at-creation flag are fixed before the
    /// record is first persisted.
    ///
    /// # Arguments
    /// * `anchors` - Identity anchors known at creation time
    /// * `password_hash` - Pre-hashed secret, meaningful only for email accounts
    ///
    /// # Returns
    /// Account with resolved provider, role, and verification flag
    ///
    /// # Errors
    /// * `NoAnchorError` - No anchor was supplied
    pub fn new(anchors: AnchorSet, password_hash: Option<String>) -> Result<Self, NoAnchorError> {
        let (auth_provider, is_verified) = match policy::resolve(&anchors, None)? {
            Resolution::Resolved { provider, verified } => (provider, verified),
            // Unreachable with no current provider; resolution of a new
            // account always yields a fresh assignment.
            Resolution::Unchanged(provider) => (provider, false),
        };

        let role = match auth_provider {
            AuthProvider::Guest => Role::Guest,
            _ => Role::User,
        };

        // A password hash must never exist on a non-email account.
        let password_hash = match auth_provider {
            AuthProvider::Email => password_hash,
            _ => None,
        };

        let now = Utc::now();

        Ok(Self {
            id: AccountId::new(),
            email: anchors.email,
            wallet_address: anchors.wallet_address,
            oauth_subject: anchors.oauth_subject,
            guest_id: anchors.guest_id,
            password_hash,
            auth_provider,
            role,
            is_verified,
            verification: None,
            reset: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// The anchor embedded in session claims: email if set, else wallet.
    pub fn primary_anchor(&self) -> Option<String> {
        self.email
            .as_ref()
            .map(|e| e.as_str().to_string())
            .or_else(|| self.wallet_address.as_ref().map(|w| w.as_str().to_string()))
    }

    /// Apply one atomic credential mutation.
    ///
    /// Adapters call this inside their per-record critical section so the
    /// whole mutation lands as a single write. A challenge pair and its
    /// dependent field (verified flag, password hash) change together,
    /// never separately.
    ///
    /// The redeem variants re-verify the stored pair here, under the
    /// adapter's lock: the carried token must match the outstanding
    /// challenge and be unexpired at `now`, otherwise nothing changes.
    /// This is what makes a challenge single-use when two redemptions
    /// race, and what stops a late redemption from clearing a freshly
    /// re-issued pair.
    ///
    /// # Errors
    /// * `StaleChallengeError` - Redeemed token is missing, mismatched, or expired
    pub fn apply(
        &mut self,
        update: CredentialUpdate,
        now: DateTime<Utc>,
    ) -> Result<(), StaleChallengeError> {
        match update {
            CredentialUpdate::SetPasswordHash(hash) => {
                self.password_hash = Some(hash);
            }
            CredentialUpdate::SetVerificationChallenge(pair) => {
                self.verification = Some(pair);
            }
            CredentialUpdate::RedeemVerification { token } => {
                Self::take_redeemable(&mut self.verification, &token, now)?;
                self.is_verified = true;
            }
            CredentialUpdate::SetResetChallenge(pair) => {
                self.reset = Some(pair);
            }
            CredentialUpdate::RedeemReset {
                token,
                password_hash,
            } => {
                Self::take_redeemable(&mut self.reset, &token, now)?;
                self.password_hash = Some(password_hash);
            }
        }

        self.updated_at = now;
        Ok(())
    }

    /// Clear the pair if and only if `token` matches it and it is unexpired.
    fn take_redeemable(
        slot: &mut Option<ChallengePair>,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<(), StaleChallengeError> {
        let redeemable =
            matches!(slot, Some(pair) if pair.token == token && !pair.is_expired(now));
        if !redeemable {
            return Err(StaleChallengeError);
        }

        *slot = None;
        Ok(())
    }
}

/// Account unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountId(pub Uuid);

impl AccountId {
    /// Generate a new random account ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an account ID from string.
    ///
    /// # Arguments
    /// * `s` - UUID string to parse
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, AccountIdError> {
        Uuid::parse_str(s)
            .map(AccountId)
            .map_err(|e| AccountIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address anchor
///
/// Validates format using an RFC 5322 compliant parser and normalizes to
/// lowercase, which makes every downstream lookup case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated, normalized email address.
    ///
    /// # Arguments
    /// * `email` - Raw email string
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email.to_lowercase()))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    /// Get the normalized email as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Wallet address anchor
///
/// Signature verification is the transport collaborator's concern; here the
/// address is only an opaque unique anchor, normalized to lowercase for
/// case-insensitive matching.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WalletAddress(String);

impl WalletAddress {
    /// Create a new normalized wallet address.
    ///
    /// # Arguments
    /// * `address` - Raw wallet address string
    ///
    /// # Errors
    /// * `Empty` - Address is empty
    /// * `InvalidCharacters` - Address contains whitespace
    pub fn new(address: String) -> Result<Self, WalletAddressError> {
        if address.is_empty() {
            Err(WalletAddressError::Empty)
        } else if address.chars().any(|c| c.is_whitespace()) {
            Err(WalletAddressError::InvalidCharacters)
        } else {
            Ok(Self(address.to_lowercase()))
        }
    }

    /// Get the normalized address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The authentication provider that established ownership of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    Email,
    Wallet,
    Oauth,
    Guest,
}

impl fmt::Display for AuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AuthProvider::Email => "email",
            AuthProvider::Wallet => "wallet",
            AuthProvider::Oauth => "oauth",
            AuthProvider::Guest => "guest",
        };
        name.fmt(f)
    }
}

/// Authorization role carried in session claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
    Guest,
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

/// The set of identity anchors known for an account.
///
/// Input to provider resolution; also the create-with-anchors shape.
#[derive(Debug, Clone, Default)]
pub struct AnchorSet {
    pub email: Option<EmailAddress>,
    pub wallet_address: Option<WalletAddress>,
    pub oauth_subject: Option<String>,
    pub guest_id: Option<String>,
}

impl AnchorSet {
    pub fn email(email: EmailAddress) -> Self {
        Self {
            email: Some(email),
            ..Self::default()
        }
    }

    pub fn wallet(address: WalletAddress) -> Self {
        Self {
            wallet_address: Some(address),
            ..Self::default()
        }
    }

    pub fn oauth(subject: String) -> Self {
        Self {
            oauth_subject: Some(subject),
            ..Self::default()
        }
    }

    pub fn guest(guest_id: String) -> Self {
        Self {
            guest_id: Some(guest_id),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.wallet_address.is_none()
            && self.oauth_subject.is_none()
            && self.guest_id.is_none()
    }
}

/// A challenge token and its expiry, always set and cleared together.
///
/// A token with no expiry, or an expiry with no token, is not representable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengePair {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl ChallengePair {
    /// Create a pair expiring `ttl` from now.
    pub fn new(token: String, ttl: Duration) -> Self {
        Self {
            token,
            expires_at: Utc::now() + ttl,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}

/// Inbound credentials, exactly one kind per authentication attempt.
///
/// Wallet signature proof and third-party token validation happen in the
/// transport collaborator; by the time credentials reach this subsystem a
/// wallet address or OAuth subject is already attested.
#[derive(Debug, Clone)]
pub enum Credentials {
    EmailPassword {
        email: EmailAddress,
        password: String,
    },
    Wallet {
        address: WalletAddress,
    },
    Oauth {
        subject: String,
    },
    Guest,
}

/// One atomic credential mutation, applied as a single write keyed by
/// account id. The redeem variants bundle the fields that must never be
/// observed half-updated (a cleared reset token with an unchanged password
/// hash is exactly the torn state this type rules out) and carry the
/// candidate token, so the store can re-verify it against the outstanding
/// pair inside the same critical section that commits the write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialUpdate {
    SetPasswordHash(String),
    SetVerificationChallenge(ChallengePair),
    RedeemVerification { token: String },
    SetResetChallenge(ChallengePair),
    RedeemReset { token: String, password_hash: String },
}

/// Claims embedded in a signed session token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionClaims {
    /// Account identifier
    pub sub: String,

    /// Primary anchor: email if set, else wallet address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,

    /// Authorization role
    pub role: Role,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,
}

impl SessionClaims {
    /// Build claims for an authenticated account.
    ///
    /// # Arguments
    /// * `account` - Authenticated account
    /// * `ttl` - Session lifetime from now
    pub fn for_account(account: &Account, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: account.id.to_string(),
            anchor: account.primary_anchor(),
            role: account.role,
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        }
    }

    /// Parse the subject claim back into an account id.
    ///
    /// # Errors
    /// * `InvalidFormat` - Subject is not a valid UUID
    pub fn account_id(&self) -> Result<AccountId, AccountIdError> {
        AccountId::from_string(&self.sub)
    }
}

/// Result of successful authentication.
#[derive(Debug, Clone)]
pub struct SessionToken {
    /// Signed session access token
    pub access_token: String,

    /// Account the session was bound to
    pub account_id: AccountId,
}
