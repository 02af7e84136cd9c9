//! Authentication primitives library
//!
//! Provides reusable authentication infrastructure with no domain knowledge:
//! - Password hashing (Argon2id)
//! - Signed, time-bounded token generation and validation
//! - Opaque challenge-token generation
//!
//! Each service defines its own claims type and adapts these implementations.
//! This avoids coupling services through shared domain logic while reducing
//! code duplication.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::CredentialHasher;
//!
//! let hasher = CredentialHasher::new();
//! let digest = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &digest));
//! assert!(!hasher.verify("wrong_password", &digest));
//! ```
//!
//! ## Signed Tokens
//! ```
//! use auth::TokenIssuer;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Claims {
//!     sub: String,
//!     exp: i64,
//! }
//!
//! let issuer = TokenIssuer::new(b"secret_key_at_least_32_bytes_long!");
//! let claims = Claims {
//!     sub: "account123".to_string(),
//!     exp: chrono::Utc::now().timestamp() + 3600,
//! };
//! let token = issuer.encode(&claims).unwrap();
//! let decoded: Claims = issuer.decode(&token).unwrap();
//! ```
//!
//! ## Challenge Tokens
//! ```
//! let token = auth::challenge::generate_token();
//! assert_eq!(token.len(), 32);
//! ```

pub mod challenge;
pub mod password;
pub mod token;

// Re-export commonly used items
pub use password::CredentialHasher;
pub use password::PasswordError;
pub use token::TokenError;
pub use token::TokenIssuer;
