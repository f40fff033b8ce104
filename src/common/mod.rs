//! Common utilities shared by the client and the test runner

pub mod config;
pub mod error;
pub mod logging;
pub mod paths;

pub use error::{Error, Result};

/// Shorten a secret for display, keeping the first `keep` characters
pub fn truncate_secret(secret: &str, keep: usize) -> String {
    let prefix: String = secret.chars().take(keep).collect();
    format!("{}...", prefix)
}
