use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;

use identity_service::config::AuthConfig;
use identity_service::domain::account::errors::NotifierError;
use identity_service::domain::account::models::EmailAddress;
use identity_service::domain::account::ports::ChallengeNotifier;
use identity_service::domain::account::service::IdentityService;
use identity_service::outbound::repositories::InMemoryAccountRepository;

/// Notifier that captures delivered challenge tokens for assertions.
#[derive(Default)]
pub struct RecordingNotifier {
    pub verification_tokens: Mutex<Vec<(String, String)>>,
    pub reset_tokens: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub fn last_verification_token(&self) -> Option<String> {
        self.verification_tokens
            .lock()
            .unwrap()
            .last()
            .map(|(_, token)| token.clone())
    }

    pub fn last_reset_token(&self) -> Option<String> {
        self.reset_tokens
            .lock()
            .unwrap()
            .last()
            .map(|(_, token)| token.clone())
    }
}

#[async_trait]
impl ChallengeNotifier for RecordingNotifier {
    async fn deliver_verification(
        &self,
        email: &EmailAddress,
        token: &str,
    ) -> Result<(), NotifierError> {
        self.verification_tokens
            .lock()
            .unwrap()
            .push((email.as_str().to_string(), token.to_string()));
        Ok(())
    }

    async fn deliver_reset(&self, email: &EmailAddress, token: &str) -> Result<(), NotifierError> {
        self.reset_tokens
            .lock()
            .unwrap()
            .push((email.as_str().to_string(), token.to_string()));
        Ok(())
    }
}

/// Test harness wiring the real service to the in-memory store.
pub struct TestIdentity {
    pub service: IdentityService<InMemoryAccountRepository, RecordingNotifier>,
    pub repository: Arc<InMemoryAccountRepository>,
    pub notifier: Arc<RecordingNotifier>,
}

impl TestIdentity {
    pub fn new() -> Self {
        let repository = Arc::new(InMemoryAccountRepository::new());
        let notifier = Arc::new(RecordingNotifier::default());

        let config = AuthConfig {
            jwt_secret: "integration_test_secret_32_bytes!!".to_string(),
            session_ttl_hours: 24,
            verification_ttl_hours: 24,
            reset_ttl_minutes: 30,
        };

        let service = IdentityService::new(repository.clone(), notifier.clone(), &config);

        Self {
            service,
            repository,
            notifier,
        }
    }
}

pub fn email(raw: &str) -> EmailAddress {
    EmailAddress::new(raw.to_string()).expect("Invalid test email")
}
