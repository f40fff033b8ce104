//! HTTP client for the cafe backend

use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, Url};
use serde_json::Value;

use crate::common::config::HttpSettings;
use crate::common::{Error, Result};

/// A response reduced to what the runner inspects
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub text: String,
}

impl ApiResponse {
    /// Parse the body as JSON, `None` if it is not valid JSON
    pub fn json(&self) -> Option<Value> {
        serde_json::from_str(&self.text).ok()
    }
}

/// Client for issuing requests against a fixed base URL
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client for `base_url`
    pub fn new(base_url: &str, settings: &HttpSettings) -> Result<Self> {
        let parsed = Url::parse(base_url).map_err(|_| Error::InvalidUrl(base_url.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::InvalidUrl(base_url.to_string()));
        }

        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("cafe-api-tester/", env!("CARGO_PKG_VERSION")));
        if let Some(secs) = settings.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| Error::ClientBuild(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// The base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join the base URL and a request path with exactly one slash
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Send a request and read the whole body
    ///
    /// Extra headers are applied last and replace the defaults of the same name.
    pub async fn send(
        &self,
        method: &Method,
        path: &str,
        token: Option<&str>,
        body: Option<&Value>,
        extra_headers: &[(&str, &str)],
    ) -> Result<ApiResponse> {
        if !matches!(method.as_str(), "GET" | "POST" | "PUT" | "DELETE") {
            return Err(Error::UnsupportedMethod(method.to_string()));
        }

        let url = self.url(path);
        let headers = build_headers(token, extra_headers)?;

        let mut request = self.http.request(method.clone(), &url).headers(headers);
        if let Some(body) = body {
            request = request.json(body);
        }

        let started = Instant::now();
        let response = request
            .send()
            .await
            .map_err(|e| Error::transport(&url, e))?;
        let status = response.status().as_u16();

        // a truncated body is a transport fault, not an empty response
        let text = response
            .text()
            .await
            .map_err(|e| Error::transport(&url, e))?;

        tracing::debug!(
            method = %method,
            %url,
            status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Request completed"
        );

        Ok(ApiResponse { status, text })
    }
}

/// Default headers plus bearer token, then caller overrides
fn build_headers(token: Option<&str>, extra_headers: &[(&str, &str)]) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    if let Some(token) = token {
        let value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| Error::invalid_header(AUTHORIZATION.as_str(), e))?;
        headers.insert(AUTHORIZATION, value);
    }

    for (name, value) in extra_headers {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| Error::invalid_header(name, e))?;
        let header_value = HeaderValue::from_str(value).map_err(|e| Error::invalid_header(name, e))?;
        headers.insert(header_name, header_value);
    }

    Ok(headers)
}
