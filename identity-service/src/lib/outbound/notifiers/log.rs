use async_trait::async_trait;

use crate::domain::account::errors::NotifierError;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::ports::ChallengeNotifier;

/// Notifier that records delivery intent in the log stream.
///
/// Stands in where no mail transport is wired up (local runs, tests).
/// The token value itself is never logged; only the fact that a challenge
/// went out.
pub struct LogChallengeNotifier;

impl LogChallengeNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogChallengeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChallengeNotifier for LogChallengeNotifier {
    async fn deliver_verification(
        &self,
        email: &EmailAddress,
        _token: &str,
    ) -> Result<(), NotifierError> {
        tracing::info!(email = %email, "Verification challenge issued");
        Ok(())
    }

    async fn deliver_reset(&self, email: &EmailAddress, _token: &str) -> Result<(), NotifierError> {
        tracing::info!(email = %email, "Reset challenge issued");
        Ok(())
    }
}
