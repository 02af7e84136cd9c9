use std::fmt;

use thiserror::Error;

/// Error for AccountId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccountIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for WalletAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WalletAddressError {
    #[error("Wallet address must not be empty")]
    Empty,

    #[error("Wallet address must not contain whitespace")]
    InvalidCharacters,
}

/// Raised when an account is constructed with no identity anchor at all.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Account requires at least one identity anchor")]
pub struct NoAnchorError;

/// Raised by `Account::apply` when a redeemed token no longer matches the
/// outstanding challenge pair.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Challenge missing, mismatched, or expired")]
pub struct StaleChallengeError;

/// The anchor family involved in a uniqueness conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorKind {
    Email,
    Wallet,
    OauthSubject,
    GuestId,
}

impl fmt::Display for AnchorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AnchorKind::Email => "email",
            AnchorKind::Wallet => "wallet",
            AnchorKind::OauthSubject => "oauth subject",
            AnchorKind::GuestId => "guest id",
        };
        name.fmt(f)
    }
}

/// Error for account store operations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Anchor already owned by another account: {0}")]
    DuplicateAnchor(AnchorKind),

    #[error("Account not found")]
    NotFound,

    #[error("Outstanding challenge was consumed or replaced")]
    StaleChallenge,

    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Error for challenge delivery operations
#[derive(Debug, Clone, Error)]
pub enum NotifierError {
    #[error("Failed to deliver challenge: {0}")]
    DeliveryFailed(String),
}

/// Classified authentication outcomes surfaced to callers.
///
/// The credential and token variants are terminal and deliberately opaque:
/// a wrong password is indistinguishable from an unknown email, and an
/// expired challenge from a mismatched one, so that failure modes cannot
/// be used to enumerate accounts. `Store` is the only class a caller may
/// retry.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Anchor already owned by another account: {0}")]
    DuplicateAnchor(AnchorKind),

    #[error("Invalid or expired token")]
    InvalidOrExpiredToken,

    #[error("Invalid session token")]
    InvalidSessionToken,

    #[error("Account not found")]
    AccountNotFound,

    // Infrastructure errors
    #[error("Store error: {0}")]
    Store(String),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateAnchor(kind) => AuthError::DuplicateAnchor(kind),
            StoreError::NotFound => AuthError::AccountNotFound,
            StoreError::StaleChallenge => AuthError::InvalidOrExpiredToken,
            StoreError::Backend(msg) => AuthError::Store(msg),
        }
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        AuthError::Store(err.to_string())
    }
}
