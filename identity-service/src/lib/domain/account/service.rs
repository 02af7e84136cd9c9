use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use chrono::Utc;
use uuid::Uuid;

use auth::challenge;
use auth::CredentialHasher;
use auth::TokenIssuer;

use crate::config::AuthConfig;
use crate::domain::account::errors::AuthError;
use crate::domain::account::errors::StoreError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::AnchorSet;
use crate::domain::account::models::ChallengePair;
use crate::domain::account::models::CredentialUpdate;
use crate::domain::account::models::Credentials;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::SessionClaims;
use crate::domain::account::models::SessionToken;
use crate::domain::account::models::WalletAddress;
use crate::domain::account::ports::AccountRepository;
use crate::domain::account::ports::ChallengeNotifier;
use crate::domain::account::ports::IdentityServicePort;

/// Session authenticator.
///
/// Takes inbound credentials of any supported kind and produces either an
/// authenticated session or a classified failure. Each attempt runs
/// load-or-create, provider resolution, credential verification, and
/// session minting against the injected store; there is no in-process
/// session state.
pub struct IdentityService<AR, CN>
where
    AR: AccountRepository,
    CN: ChallengeNotifier,
{
    repository: Arc<AR>,
    notifier: Arc<CN>,
    hasher: CredentialHasher,
    issuer: TokenIssuer,
    session_ttl: Duration,
    verification_ttl: Duration,
    reset_ttl: Duration,
}

impl<AR, CN> IdentityService<AR, CN>
where
    AR: AccountRepository,
    CN: ChallengeNotifier,
{
    /// Create a new identity service with injected dependencies.
    ///
    /// The signing secret and token lifetimes come in as configuration at
    /// construction time; nothing is read from ambient state at call time.
    ///
    /// # Arguments
    /// * `repository` - Account persistence implementation
    /// * `notifier` - Out-of-band challenge delivery implementation
    /// * `config` - Signing secret and token lifetimes
    pub fn new(repository: Arc<AR>, notifier: Arc<CN>, config: &AuthConfig) -> Self {
        Self {
            repository,
            notifier,
            hasher: CredentialHasher::new(),
            issuer: TokenIssuer::new(config.jwt_secret.as_bytes()),
            session_ttl: Duration::hours(config.session_ttl_hours),
            verification_ttl: Duration::hours(config.verification_ttl_hours),
            reset_ttl: Duration::minutes(config.reset_ttl_minutes),
        }
    }

    fn issue_session(&self, account: &Account) -> Result<SessionToken, AuthError> {
        let claims = SessionClaims::for_account(account, self.session_ttl);
        let access_token = self
            .issuer
            .encode(&claims)
            .map_err(|e| AuthError::Store(format!("Session token encoding failed: {}", e)))?;

        Ok(SessionToken {
            access_token,
            account_id: account.id,
        })
    }

    /// Insert a first-sight account, logging the provisioning.
    async fn provision(&self, account: Account) -> Result<Account, StoreError> {
        let account = self.repository.insert(account).await?;

        tracing::info!(
            account_id = %account.id,
            provider = %account.auth_provider,
            "Account provisioned on first credential submission"
        );

        Ok(account)
    }

    async fn authenticate_email(
        &self,
        email: EmailAddress,
        password: &str,
    ) -> Result<Account, AuthError> {
        let account = match self.repository.find_by_email(&email).await? {
            Some(account) => account,
            None => {
                // Same classification as a wrong password: no enumeration signal
                tracing::debug!("Authentication attempt for unknown email");
                return Err(AuthError::InvalidCredentials);
            }
        };

        // An account without a hash (non-email provider) verifies as a
        // mismatch, exactly like a corrupted digest would.
        let digest = account.password_hash.as_deref().unwrap_or("");
        if !self.hasher.verify(password, digest) {
            tracing::debug!(account_id = %account.id, "Password verification failed");
            return Err(AuthError::InvalidCredentials);
        }

        Ok(account)
    }

    async fn authenticate_wallet(&self, address: WalletAddress) -> Result<Account, AuthError> {
        // Wallet possession itself is the credential; signature proof of
        // address ownership was checked before this point.
        match self.repository.find_by_wallet(&address).await? {
            Some(account) => Ok(account),
            None => {
                let account = Account::new(AnchorSet::wallet(address.clone()), None)
                    .map_err(|e| AuthError::Store(e.to_string()))?;

                match self.provision(account).await {
                    Ok(account) => Ok(account),
                    // A concurrent first-sight request won the create race;
                    // the store's uniqueness constraint protected its row
                    Err(StoreError::DuplicateAnchor(_)) => self
                        .repository
                        .find_by_wallet(&address)
                        .await?
                        .ok_or(AuthError::InvalidCredentials),
                    Err(e) => Err(e.into()),
                }
            }
        }
    }

    async fn authenticate_oauth(&self, subject: String) -> Result<Account, AuthError> {
        match self.repository.find_by_oauth_subject(&subject).await? {
            Some(account) => Ok(account),
            None => {
                let account = Account::new(AnchorSet::oauth(subject.clone()), None)
                    .map_err(|e| AuthError::Store(e.to_string()))?;

                match self.provision(account).await {
                    Ok(account) => Ok(account),
                    Err(StoreError::DuplicateAnchor(_)) => self
                        .repository
                        .find_by_oauth_subject(&subject)
                        .await?
                        .ok_or(AuthError::InvalidCredentials),
                    Err(e) => Err(e.into()),
                }
            }
        }
    }

    async fn authenticate_guest(&self) -> Result<Account, AuthError> {
        // Every guest session is a distinct identity; no anchor reuse
        let guest_id = Uuid::new_v4().to_string();
        let account = Account::new(AnchorSet::guest(guest_id), None)
            .map_err(|e| AuthError::Store(e.to_string()))?;

        Ok(self.provision(account).await?)
    }
}

#[async_trait]
impl<AR, CN> IdentityServicePort for IdentityService<AR, CN>
where
    AR: AccountRepository,
    CN: ChallengeNotifier,
{
    async fn register_email_account(
        &self,
        email: EmailAddress,
        password: &str,
    ) -> Result<Account, AuthError> {
        let password_hash = self
            .hasher
            .hash(password)
            .map_err(|e| AuthError::Store(format!("Password hashing failed: {}", e)))?;

        let account = Account::new(AnchorSet::email(email), Some(password_hash))
            .map_err(|e| AuthError::Store(e.to_string()))?;
        let account = self.repository.insert(account).await?;

        tracing::info!(account_id = %account.id, "Email account registered");

        Ok(account)
    }

    async fn authenticate(&self, credentials: Credentials) -> Result<SessionToken, AuthError> {
        let account = match credentials {
            Credentials::EmailPassword { email, password } => {
                self.authenticate_email(email, &password).await?
            }
            Credentials::Wallet { address } => self.authenticate_wallet(address).await?,
            Credentials::Oauth { subject } => self.authenticate_oauth(subject).await?,
            Credentials::Guest => self.authenticate_guest().await?,
        };

        self.issue_session(&account)
    }

    async fn issue_verification_challenge(&self, id: &AccountId) -> Result<String, AuthError> {
        let account = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        let token = challenge::generate_token();
        let pair = ChallengePair::new(token.clone(), self.verification_ttl);

        self.repository
            .update_credentials(id, CredentialUpdate::SetVerificationChallenge(pair))
            .await?;

        if let Some(email) = &account.email {
            if let Err(e) = self.notifier.deliver_verification(email, &token).await {
                tracing::error!(
                    account_id = %account.id,
                    "Failed to deliver verification challenge: {}",
                    e
                );
            }
        }

        Ok(token)
    }

    async fn redeem_verification_challenge(&self, token: &str) -> Result<(), AuthError> {
        let account = self
            .repository
            .find_by_verification_token(token)
            .await?
            .ok_or(AuthError::InvalidOrExpiredToken)?;

        let pair = account
            .verification
            .as_ref()
            .ok_or(AuthError::InvalidOrExpiredToken)?;

        // An expired challenge fails without clearing the pair; only
        // successful redemption or explicit re-issuance clears it.
        if pair.is_expired(Utc::now()) {
            tracing::debug!(account_id = %account.id, "Verification challenge expired");
            return Err(AuthError::InvalidOrExpiredToken);
        }

        // The store re-verifies the pair inside its critical section; a
        // token consumed or replaced between find and update is rejected
        // there rather than double-redeemed.
        self.repository
            .update_credentials(
                &account.id,
                CredentialUpdate::RedeemVerification {
                    token: token.to_string(),
                },
            )
            .await
            .map_err(|e| match e {
                StoreError::NotFound | StoreError::StaleChallenge => {
                    AuthError::InvalidOrExpiredToken
                }
                other => AuthError::from(other),
            })?;

        tracing::info!(account_id = %account.id, "Account verified");

        Ok(())
    }

    async fn issue_reset_challenge(&self, email: &EmailAddress) -> Result<(), AuthError> {
        let account = match self.repository.find_by_email(email).await? {
            Some(account) => account,
            None => {
                // Success-shaped either way; absence is an internal detail
                tracing::debug!("Reset challenge requested for unknown email");
                return Ok(());
            }
        };

        let token = challenge::generate_token();
        let pair = ChallengePair::new(token.clone(), self.reset_ttl);

        self.repository
            .update_credentials(&account.id, CredentialUpdate::SetResetChallenge(pair))
            .await?;

        if let Err(e) = self.notifier.deliver_reset(email, &token).await {
            tracing::error!(
                account_id = %account.id,
                "Failed to deliver reset challenge: {}",
                e
            );
        }

        Ok(())
    }

    async fn redeem_reset_challenge(
        &self,
        token: &str,
        new_secret: &str,
    ) -> Result<(), AuthError> {
        let account = self
            .repository
            .find_by_reset_token(token)
            .await?
            .ok_or(AuthError::InvalidOrExpiredToken)?;

        let pair = account
            .reset
            .as_ref()
            .ok_or(AuthError::InvalidOrExpiredToken)?;

        if pair.is_expired(Utc::now()) {
            tracing::debug!(account_id = %account.id, "Reset challenge expired");
            return Err(AuthError::InvalidOrExpiredToken);
        }

        let password_hash = self
            .hasher
            .hash(new_secret)
            .map_err(|e| AuthError::Store(format!("Password hashing failed: {}", e)))?;

        // Hash replacement and pair clearing land as one write; the store
        // re-verifies the token under its lock so a concurrently consumed
        // challenge cannot be redeemed twice.
        self.repository
            .update_credentials(
                &account.id,
                CredentialUpdate::RedeemReset {
                    token: token.to_string(),
                    password_hash,
                },
            )
            .await
            .map_err(|e| match e {
                StoreError::NotFound | StoreError::StaleChallenge => {
                    AuthError::InvalidOrExpiredToken
                }
                other => AuthError::from(other),
            })?;

        tracing::info!(account_id = %account.id, "Password reset redeemed");

        Ok(())
    }

    fn verify_session_token(&self, token: &str) -> Result<SessionClaims, AuthError> {
        self.issuer.decode::<SessionClaims>(token).map_err(|e| {
            // The cause distinction stays internal; callers see one class
            tracing::debug!("Session token rejected: {}", e);
            AuthError::InvalidSessionToken
        })
    }
}
