//! API Client
//!
//! Main client for the platform API, combining the session's base URL and
//! token with the HTTP adapter.

use super::http::{HttpClient, Method};
use crate::config::Session;
use crate::error::CliError;
use serde_json::Value;
use url::Url;

/// A single, fully resolved API request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub method: Method,
    /// Path relative to the base URL, e.g. `clusters/abc/nodeGroups`
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RequestSpec {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Main platform API client
#[derive(Clone)]
pub struct ApiClient {
    http: HttpClient,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a client for the given session
    pub fn new(session: &Session) -> Result<Self, CliError> {
        Self::with_base_url(&session.base_url, session.token.as_deref())
    }

    /// Create a client from a raw base URL and optional token
    pub fn with_base_url(base_url: &str, token: Option<&str>) -> Result<Self, CliError> {
        let parsed = Url::parse(base_url)
            .map_err(|e| CliError::usage(format!("invalid --api-url '{}': {}", base_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(CliError::usage(format!(
                "invalid --api-url '{}': scheme must be http or https",
                base_url
            )));
        }

        Ok(Self {
            http: HttpClient::new()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(str::to_string),
        })
    }

    /// Build an absolute URL from an API-relative path
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Execute a resolved request
    pub async fn execute(&self, spec: &RequestSpec) -> Result<Value, CliError> {
        // Identifiers are percent-encoded, so a raw brace can only be a
        // template placeholder that was never filled.
        if spec.path.contains('{') || spec.path.contains('}') {
            return Err(CliError::usage(format!(
                "unresolved placeholder in path '{}'",
                spec.path
            )));
        }

        let url = self.url(&spec.path);
        self.http
            .call(
                spec.method,
                &url,
                self.token.as_deref(),
                &spec.query,
                spec.body.as_ref(),
            )
            .await
    }

    /// Make a GET request to an API-relative path
    pub async fn get(&self, path: &str) -> Result<Value, CliError> {
        self.execute(&RequestSpec::get(path)).await
    }
}
