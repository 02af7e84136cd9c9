pub mod log;

pub use log::LogChallengeNotifier;
