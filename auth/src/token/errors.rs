use thiserror::Error;

/// Error type for token operations.
///
/// The decode-side variants distinguish failure causes for internal logging
/// only; callers surfacing errors outward must collapse them into a single
/// opaque classification.
#[derive(Debug, Clone, Error)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is expired")]
    Expired,

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token is malformed: {0}")]
    Malformed(String),
}
