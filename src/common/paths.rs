//! Configuration file location
//!
//! Uses the directories crate for platform-appropriate locations:
//! - Linux: `~/.config/cafe-api-tester/`
//! - macOS: `~/Library/Application Support/cafe-api-tester/`
//! - Windows: `%APPDATA%\cafe-api-tester\`

use std::path::PathBuf;

/// Name used for the per-user configuration directory
const APP_NAME: &str = "cafe-api-tester";

/// Get the configuration directory path
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the configuration file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}
