//! HTTP utilities for platform REST API calls

use crate::error::CliError;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::fmt;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// HTTP verbs used by the platform API
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    fn as_reqwest(self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        };
        f.write_str(s)
    }
}

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
fn sanitize_for_log(body: &str) -> String {
    let char_count = body.chars().count();
    let truncated = if char_count > MAX_LOG_BODY_LENGTH {
        let head: String = body.chars().take(MAX_LOG_BODY_LENGTH).collect();
        format!("{}... [truncated, {} bytes total]", head, body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Render an error together with its source chain.
/// reqwest's top-level message alone ("error sending request") hides the cause.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

/// Pull a human-readable message out of an error response body.
///
/// Recognises `{"message": ..}`, `{"error": {"message": ..}}`,
/// `{"error": ".."}` and `{"detail": ".."}`; anything else falls back to the
/// raw body, or to the status reason when the body is empty.
pub fn extract_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        let candidates = [
            value.get("message"),
            value.get("error").and_then(|e| e.get("message")),
            value.get("error"),
            value.get("detail"),
        ];
        if let Some(msg) = candidates.into_iter().flatten().find_map(Value::as_str) {
            return msg.to_string();
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        trimmed.to_string()
    }
}

/// HTTP client wrapper for platform API calls
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new() -> Result<Self, CliError> {
        let client = Client::builder()
            .user_agent(concat!("mmaictl/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CliError::Transport(format!("failed to create HTTP client: {}", error_chain(&e))))?;

        Ok(Self { client })
    }

    /// Perform a single request against an absolute URL.
    ///
    /// The bearer token is attached only when non-empty. A 2xx response with
    /// an empty body yields `Value::Null`. Exactly one attempt is made.
    pub async fn call(
        &self,
        method: Method,
        url: &str,
        token: Option<&str>,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<Value, CliError> {
        tracing::debug!("{} {}", method, url);

        let mut request = self.client.request(method.as_reqwest(), url);

        if let Some(token) = token.filter(|t| !t.is_empty()) {
            request = request.bearer_auth(token);
        }
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            tracing::trace!("request body: {}", body);
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| CliError::Transport(format!("{} {}: {}", method, url, error_chain(&e))))?;

        let status = response.status();
        let response_body = response
            .text()
            .await
            .map_err(|e| CliError::Transport(format!("failed to read response body: {}", error_chain(&e))))?;

        tracing::debug!("{} {} -> {}", method, url, status);
        tracing::trace!("response body: {}", sanitize_for_log(&response_body));

        if !status.is_success() {
            return Err(CliError::Api {
                status: status.as_u16(),
                message: extract_error_message(status, &response_body),
            });
        }

        // Handle empty response
        if response_body.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&response_body)
            .map_err(|e| CliError::Decode(format!("failed to parse response JSON: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_field_is_preferred() {
        let msg = extract_error_message(StatusCode::NOT_FOUND, r#"{"message":"not found"}"#);
        assert_eq!(msg, "not found");
    }

    #[test]
    fn nested_error_message_is_recognised() {
        let body = r#"{"error":{"code":403,"message":"Permission denied"}}"#;
        let msg = extract_error_message(StatusCode::FORBIDDEN, body);
        assert_eq!(msg, "Permission denied");
    }

    #[test]
    fn error_and_detail_strings_are_recognised() {
        assert_eq!(
            extract_error_message(StatusCode::BAD_REQUEST, r#"{"error":"bad name"}"#),
            "bad name"
        );
        assert_eq!(
            extract_error_message(StatusCode::CONFLICT, r#"{"detail":"already exists"}"#),
            "already exists"
        );
    }

    #[test]
    fn unrecognised_body_falls_back_to_raw_text() {
        let msg = extract_error_message(StatusCode::BAD_GATEWAY, "upstream exploded\n");
        assert_eq!(msg, "upstream exploded");

        let msg = extract_error_message(StatusCode::BAD_REQUEST, r#"{"code":7}"#);
        assert_eq!(msg, r#"{"code":7}"#);
    }

    #[test]
    fn empty_body_uses_reason_phrase() {
        let msg = extract_error_message(StatusCode::NOT_FOUND, "");
        assert_eq!(msg, "Not Found");
    }

    #[test]
    fn sanitize_truncates_on_char_boundary() {
        let body = "é".repeat(MAX_LOG_BODY_LENGTH + 10);
        let out = sanitize_for_log(&body);
        assert!(out.contains("[truncated"));
    }

    #[test]
    fn method_display() {
        assert_eq!(Method::Patch.to_string(), "PATCH");
        assert_eq!(Method::Delete.to_string(), "DELETE");
    }
}
