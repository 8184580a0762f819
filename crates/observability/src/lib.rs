//! Process-wide logging setup for console hosts and tests.

/// Subscriber configuration and installation.
pub mod tracing;

pub use crate::tracing::{LogConfig, LogFormat};

/// Install the global subscriber from the environment.
///
/// Safe to call multiple times; only the first call installs anything.
pub fn init() {
    crate::tracing::init(&LogConfig::from_env());
}
