use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::account::errors::AnchorKind;
use crate::domain::account::errors::StoreError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::CredentialUpdate;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::WalletAddress;
use crate::domain::account::ports::AccountRepository;

/// In-memory account store.
///
/// Anchor uniqueness is checked and committed inside one write critical
/// section, so the check-then-insert window is closed for concurrent
/// creates, and every `CredentialUpdate` lands as a single atomic
/// read-modify-write keyed by account id.
#[derive(Default)]
pub struct InMemoryAccountRepository {
    inner: RwLock<Store>,
}

#[derive(Default)]
struct Store {
    accounts: HashMap<AccountId, Account>,
    by_email: HashMap<String, AccountId>,
    by_wallet: HashMap<String, AccountId>,
    by_oauth_subject: HashMap<String, AccountId>,
    by_guest_id: HashMap<String, AccountId>,
}

impl Store {
    fn check_unique(&self, account: &Account) -> Result<(), StoreError> {
        if let Some(email) = &account.email {
            if self.by_email.contains_key(email.as_str()) {
                return Err(StoreError::DuplicateAnchor(AnchorKind::Email));
            }
        }
        if let Some(wallet) = &account.wallet_address {
            if self.by_wallet.contains_key(wallet.as_str()) {
                return Err(StoreError::DuplicateAnchor(AnchorKind::Wallet));
            }
        }
        if let Some(subject) = &account.oauth_subject {
            if self.by_oauth_subject.contains_key(subject) {
                return Err(StoreError::DuplicateAnchor(AnchorKind::OauthSubject));
            }
        }
        if let Some(guest_id) = &account.guest_id {
            if self.by_guest_id.contains_key(guest_id) {
                return Err(StoreError::DuplicateAnchor(AnchorKind::GuestId));
            }
        }

        Ok(())
    }

    fn index(&mut self, account: &Account) {
        if let Some(email) = &account.email {
            self.by_email.insert(email.as_str().to_string(), account.id);
        }
        if let Some(wallet) = &account.wallet_address {
            self.by_wallet.insert(wallet.as_str().to_string(), account.id);
        }
        if let Some(subject) = &account.oauth_subject {
            self.by_oauth_subject.insert(subject.clone(), account.id);
        }
        if let Some(guest_id) = &account.guest_id {
            self.by_guest_id.insert(guest_id.clone(), account.id);
        }
    }
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn insert(&self, account: Account) -> Result<Account, StoreError> {
        let mut store = self.inner.write().await;

        store.check_unique(&account)?;
        store.index(&account);
        store.accounts.insert(account.id, account.clone());

        Ok(account)
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, StoreError> {
        let store = self.inner.read().await;
        Ok(store.accounts.get(id).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Account>, StoreError> {
        let store = self.inner.read().await;
        Ok(store
            .by_email
            .get(email.as_str())
            .and_then(|id| store.accounts.get(id))
            .cloned())
    }

    async fn find_by_wallet(
        &self,
        address: &WalletAddress,
    ) -> Result<Option<Account>, StoreError> {
        let store = self.inner.read().await;
        Ok(store
            .by_wallet
            .get(address.as_str())
            .and_then(|id| store.accounts.get(id))
            .cloned())
    }

    async fn find_by_oauth_subject(&self, subject: &str) -> Result<Option<Account>, StoreError> {
        let store = self.inner.read().await;
        Ok(store
            .by_oauth_subject
            .get(subject)
            .and_then(|id| store.accounts.get(id))
            .cloned())
    }

    async fn find_by_verification_token(
        &self,
        token: &str,
    ) -> Result<Option<Account>, StoreError> {
        // Challenge tokens are transient; a linear scan beats maintaining
        // another index for them.
        let store = self.inner.read().await;
        Ok(store
            .accounts
            .values()
            .find(|a| {
                a.verification
                    .as_ref()
                    .map_or(false, |pair| pair.token == token)
            })
            .cloned())
    }

    async fn find_by_reset_token(&self, token: &str) -> Result<Option<Account>, StoreError> {
        let store = self.inner.read().await;
        Ok(store
            .accounts
            .values()
            .find(|a| a.reset.as_ref().map_or(false, |pair| pair.token == token))
            .cloned())
    }

    async fn update_credentials(
        &self,
        id: &AccountId,
        update: CredentialUpdate,
    ) -> Result<Account, StoreError> {
        let mut store = self.inner.write().await;

        let account = store.accounts.get_mut(id).ok_or(StoreError::NotFound)?;
        account
            .apply(update, Utc::now())
            .map_err(|_| StoreError::StaleChallenge)?;

        Ok(account.clone())
    }
}
