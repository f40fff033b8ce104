//! Configuration file handling

use serde::Deserialize;
use std::path::Path;

use super::paths::config_path;
use super::Result;

/// Main configuration structure
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Root URL of the cafe backend; request paths are joined onto it
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Admin credentials used by the login scenarios
    #[serde(default)]
    pub credentials: Credentials,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpSettings,

    /// Which requests count toward the final tally
    #[serde(default)]
    pub scoring: Scoring,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            credentials: Credentials::default(),
            http: HttpSettings::default(),
            scoring: Scoring::default(),
        }
    }
}

fn default_base_url() -> String {
    "https://mongo-api-deploy.preview.emergentagent.com".to_string()
}

/// Admin login credentials
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    #[serde(default = "default_username")]
    pub username: String,

    #[serde(default = "default_password")]
    pub password: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            username: default_username(),
            password: default_password(),
        }
    }
}

fn default_username() -> String {
    "admin".to_string()
}
fn default_password() -> String {
    "admin123".to_string()
}

/// HTTP client settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HttpSettings {
    /// Per-request timeout; unset leaves reqwest's default (no timeout)
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Scoring policy
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Scoring {
    /// Fold cleanup requests into the scored run/passed counters
    #[serde(default)]
    pub count_cleanup: bool,
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = config_path() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }
        Ok(Self::default())
    }

    /// Load configuration from an explicit path, which must exist
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| super::Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| super::Error::ConfigParse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.base_url, default_base_url());
        assert_eq!(config.credentials.username, "admin");
        assert_eq!(config.credentials.password, "admin123");
        assert!(config.http.timeout_secs.is_none());
        assert!(!config.scoring.count_cleanup);
    }

    #[test]
    fn test_partial_sections() {
        let config = Config::parse(
            r#"
base_url = "http://localhost:8001"

[credentials]
password = "s3cret"

[http]
timeout_secs = 15

[scoring]
count_cleanup = true
"#,
        )
        .unwrap();
        assert_eq!(config.base_url, "http://localhost:8001");
        assert_eq!(config.credentials.username, "admin");
        assert_eq!(config.credentials.password, "s3cret");
        assert_eq!(config.http.timeout_secs, Some(15));
        assert!(config.scoring.count_cleanup);
    }

    #[test]
    fn test_malformed_config_is_parse_error() {
        let err = Config::parse("base_url = [").unwrap_err();
        assert!(matches!(err, super::super::Error::ConfigParse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "base_url = \"http://127.0.0.1:9\"").unwrap();
        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:9");
    }

    #[test]
    fn test_load_from_missing_file() {
        let err = Config::load_from(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, super::super::Error::FileRead { .. }));
    }
}
