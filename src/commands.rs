//! CLI flag definitions
//!
//! Every flag is optional: with none given the full suite runs against the
//! configured (or default) backend.

use clap::Args;
use std::path::PathBuf;

use crate::common::config::Config;
use crate::common::Result;

#[derive(Args, Debug, Default)]
pub struct RunOptions {
    /// Configuration file (default: platform config dir, cafe-api-tester/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Base URL of the cafe backend, e.g. http://localhost:8001
    #[arg(long)]
    pub base_url: Option<String>,

    /// Admin username for the login scenarios
    #[arg(long)]
    pub username: Option<String>,

    /// Admin password for the login scenarios
    #[arg(long)]
    pub password: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Count cleanup requests toward the final results
    #[arg(long)]
    pub count_cleanup: bool,

    /// Log every request to stderr
    #[arg(long, short)]
    pub verbose: bool,

    /// Print the scenario names in execution order and exit
    #[arg(long)]
    pub list: bool,
}

impl RunOptions {
    /// Load the configuration file and apply flag overrides on top
    pub fn resolve_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };
        self.apply(&mut config);
        Ok(config)
    }

    fn apply(&self, config: &mut Config) {
        if let Some(url) = &self.base_url {
            config.base_url = url.clone();
        }
        if let Some(username) = &self.username {
            config.credentials.username = username.clone();
        }
        if let Some(password) = &self.password {
            config.credentials.password = password.clone();
        }
        if let Some(secs) = self.timeout {
            config.http.timeout_secs = Some(secs);
        }
        if self.count_cleanup {
            config.scoring.count_cleanup = true;
        }
    }
}
