pub mod errors;
pub mod hasher;

pub use errors::PasswordError;
pub use hasher::CredentialHasher;
