//! Per-run state threaded through every scenario
//!
//! One `TestContext` is created per run. Scenarios read the token and
//! fixture ids captured by earlier scenarios and record new ones here.

use colored::Colorize;
use reqwest::Method;
use serde_json::{json, Value};

use crate::api::ApiClient;
use crate::common::config::{Config, Credentials, Scoring};
use crate::common::Result;

use super::report::Tally;

/// Authentication state
#[derive(Debug, Default)]
pub struct Session {
    /// Bearer token from a successful admin login; never cleared
    pub token: Option<String>,
}

/// Resources created during the run and reused by later scenarios
#[derive(Debug, Default)]
pub struct Fixtures {
    pub product_id: Option<String>,
    /// Name the product was created with, checked on fetch
    pub product_name: Option<String>,
    pub order_id: Option<String>,
}

/// Explicit context passed to each scenario
pub struct TestContext {
    client: ApiClient,
    pub credentials: Credentials,
    pub session: Session,
    pub fixtures: Fixtures,
    /// Scored counters
    pub tally: Tally,
    /// Counters for cleanup requests when they are not scored
    pub cleanup_tally: Tally,
    scoring: Scoring,
    in_cleanup: bool,
}

impl TestContext {
    pub fn new(client: ApiClient, credentials: Credentials, scoring: Scoring) -> Self {
        Self {
            client,
            credentials,
            session: Session::default(),
            fixtures: Fixtures::default(),
            tally: Tally::default(),
            cleanup_tally: Tally::default(),
            scoring,
            in_cleanup: false,
        }
    }

    /// Build a context from loaded configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = ApiClient::new(&config.base_url, &config.http)?;
        Ok(Self::new(
            client,
            config.credentials.clone(),
            config.scoring.clone(),
        ))
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    pub fn token(&self) -> Option<&str> {
        self.session.token.as_deref()
    }

    /// Route subsequent requests to the cleanup tally unless cleanup is scored
    pub(crate) fn enter_cleanup(&mut self) {
        self.in_cleanup = true;
    }

    fn tally_for(&mut self, counting: Counting) -> &mut Tally {
        match counting {
            Counting::CleanupOnly => &mut self.cleanup_tally,
            Counting::Active if self.in_cleanup && !self.scoring.count_cleanup => {
                &mut self.cleanup_tally
            }
            Counting::Active => &mut self.tally,
        }
    }

    /// Issue one request and compare its status code with `expected_status`
    ///
    /// Returns the parsed JSON body on a match (an empty object if the body
    /// is not JSON) and an empty object otherwise. Never fails: transport
    /// faults are printed and reported as `false`.
    pub async fn execute_request(
        &mut self,
        name: &str,
        method: Method,
        path: &str,
        expected_status: u16,
        body: Option<&Value>,
        extra_headers: &[(&str, &str)],
    ) -> (bool, Value) {
        let expect = Expect::status(expected_status);
        self.perform(name, method, path, &expect, body, extra_headers, Counting::Active)
            .await
    }

    /// Like `execute_request`, but any status accepted by `expect` passes
    pub async fn execute_request_matching(
        &mut self,
        name: &str,
        method: Method,
        path: &str,
        expect: &Expect,
        body: Option<&Value>,
        extra_headers: &[(&str, &str)],
    ) -> (bool, Value) {
        self.perform(name, method, path, expect, body, extra_headers, Counting::Active)
            .await
    }

    /// Request that always lands in the cleanup tally, even when cleanup is scored
    pub(crate) async fn execute_unscored(
        &mut self,
        name: &str,
        method: Method,
        path: &str,
        expected_status: u16,
    ) -> (bool, Value) {
        let expect = Expect::status(expected_status);
        self.perform(name, method, path, &expect, None, &[], Counting::CleanupOnly)
            .await
    }

    #[allow(clippy::too_many_arguments)]
    async fn perform(
        &mut self,
        name: &str,
        method: Method,
        path: &str,
        expect: &Expect,
        body: Option<&Value>,
        extra_headers: &[(&str, &str)],
        counting: Counting,
    ) -> (bool, Value) {
        let url = self.client.url(path);
        println!("\n🔍 Testing {}...", name.bold());
        println!("   URL: {}", url.dimmed());

        let result = self
            .client
            .send(&method, path, self.session.token.as_deref(), body, extra_headers)
            .await;

        match result {
            Ok(response) if expect.accepts(response.status) => {
                self.tally_for(counting).record(true);
                println!("{} - Status: {}", "✅ Passed".green(), response.status);
                (true, response.json().unwrap_or_else(|| json!({})))
            }
            Ok(response) => {
                self.tally_for(counting).record(false);
                println!(
                    "{} - Expected {}, got {}",
                    "❌ Failed".red(),
                    expect.describe(),
                    response.status
                );
                if !response.text.is_empty() {
                    println!("   Response: {}", response.text);
                }
                (false, json!({}))
            }
            Err(e) => {
                self.tally_for(counting).record(false);
                tracing::debug!(%url, error = ?e, "Request did not complete");
                println!("{} - Error: {}", "❌ Failed".red(), e);
                (false, json!({}))
            }
        }
    }
}

/// Which counters a request is recorded in
#[derive(Debug, Clone, Copy)]
enum Counting {
    /// Scored, or cleanup once cleanup has started and is not scored
    Active,
    CleanupOnly,
}

/// Accepted response statuses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expect {
    /// Exactly this status
    Status(u16),
    /// Any status in `from..=to`
    Range { from: u16, to: u16 },
}

impl Expect {
    pub fn status(status: u16) -> Self {
        Expect::Status(status)
    }

    /// Any 4xx response
    pub fn client_error() -> Self {
        Expect::Range { from: 400, to: 499 }
    }

    pub fn accepts(&self, status: u16) -> bool {
        match *self {
            Expect::Status(expected) => status == expected,
            Expect::Range { from, to } => (from..=to).contains(&status),
        }
    }

    fn describe(&self) -> String {
        match *self {
            Expect::Status(expected) => expected.to_string(),
            Expect::Range { from: 400, to: 499 } => "4xx".to_string(),
            Expect::Range { from, to } => format!("{}-{}", from, to),
        }
    }
}
