use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde_json::Value;
use yansi::Paint;

use super::envelope::{error_message, is_rejected};
use super::error::ApiError;

static SILENT: AtomicBool = AtomicBool::new(false);

pub fn set_silent(silent: bool) {
    SILENT.store(silent, Ordering::Relaxed);
}

fn is_silent() -> bool {
    SILENT.load(Ordering::Relaxed)
}

/// HTTP client for the backend API.
///
/// Cloning is cheap: the underlying `reqwest::Client` is reference counted.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(format!("Bakehouse/{}", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self::from_http(http, base_url))
    }

    pub fn from_http(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Same client, authenticated with `token`.
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            token: Some(token.into()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub fn url(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/{}", self.base_url, endpoint)
        }
    }

    pub async fn get(&self, endpoint: &str, params: &[(String, String)]) -> Result<Value, ApiError> {
        self.request(Method::GET, endpoint, None, params).await
    }

    pub async fn post(&self, endpoint: &str, body: &Value) -> Result<Value, ApiError> {
        self.request(Method::POST, endpoint, Some(body), &[]).await
    }

    pub async fn put(&self, endpoint: &str, body: &Value) -> Result<Value, ApiError> {
        self.request(Method::PUT, endpoint, Some(body), &[]).await
    }

    pub async fn delete(&self, endpoint: &str) -> Result<Value, ApiError> {
        self.request(Method::DELETE, endpoint, None, &[]).await
    }

    /// Core request function.
    /// Attaches the bearer token, unwraps the `{ success, message }` envelope
    /// and maps failures onto [`ApiError`].
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
        params: &[(String, String)],
    ) -> Result<Value, ApiError> {
        let url = self.url(endpoint);
        if !is_silent() {
            tracing::debug!("{}", curl_line(&method, &url, params, self.token.is_some(), body));
        }

        let mut req = self.http.request(method.clone(), &url).header("Accept", "application/json");
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        if !params.is_empty() {
            req = req.query(params);
        }
        if let Some(b) = body {
            req = req.json(b);
        }

        let resp = req.send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        let payload: Option<Value> = serde_json::from_str(&text).ok();
        tracing::trace!(%method, endpoint, status = status.as_u16(), response = ?payload, "API Response");

        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        let payload = match payload {
            Some(v) => v,
            None if status.is_success() => {
                return Err(ApiError::Decode(format!("{} {} did not return JSON", method, endpoint)));
            }
            None => {
                return Err(ApiError::Rejected {
                    status: status.as_u16(),
                    message: status
                        .canonical_reason()
                        .unwrap_or("Request failed")
                        .to_string(),
                });
            }
        };
        if !status.is_success() || is_rejected(&payload) {
            let message = error_message(&payload).unwrap_or_else(|| {
                status.canonical_reason().unwrap_or("Request failed").to_string()
            });
            tracing::warn!(%method, endpoint, status = status.as_u16(), %message, "API rejected request");
            return Err(ApiError::Rejected { status: status.as_u16(), message });
        }
        Ok(payload)
    }
}

/// Render a request as a curl command line for debugging. The token is never printed.
fn curl_line(method: &Method, url: &str, params: &[(String, String)], authed: bool, body: Option<&Value>) -> String {
    let mut url_for_log = url.to_string();
    if !params.is_empty() {
        url_for_log = format!("{}?{}", url_for_log, crate::utils::build_query_string(params));
    }
    let mut parts = Vec::new();
    parts.push(Paint::new("curl").green().bold().to_string());
    parts.push(format!("-X {}", Paint::new(method.as_str()).yellow().bold()));
    parts.push(format!("'{}'", Paint::new(&url_for_log).cyan()));
    if authed {
        parts.push(Paint::new("-H 'Authorization: Bearer ***'").magenta().to_string());
    }
    if let Some(b) = body {
        let mut redacted = b.clone();
        if let Some(obj) = redacted.as_object_mut() {
            for (k, v) in obj.iter_mut() {
                if k.contains("password") {
                    *v = Value::String("***".into());
                }
            }
        }
        let json_str = serde_json::to_string(&redacted).unwrap_or_default().replace('\'', "'\\''");
        parts.push(Paint::new("-H 'Content-Type: application/json'").magenta().to_string());
        parts.push(format!("-d '{}'", json_str));
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_endpoint_with_or_without_slash() {
        let client = ApiClient::from_http(reqwest::Client::new(), "https://bakery.example/api/");
        assert_eq!(client.url("/login"), "https://bakery.example/api/login");
        assert_eq!(client.url("admin/all-items"), "https://bakery.example/api/admin/all-items");
    }

    #[test]
    fn with_token_keeps_base_url() {
        let client = ApiClient::from_http(reqwest::Client::new(), "http://localhost:8000/api");
        assert!(!client.has_token());
        let authed = client.with_token("abc");
        assert!(authed.has_token());
        assert_eq!(authed.base_url(), "http://localhost:8000/api");
    }

    #[test]
    fn curl_line_redacts_passwords() {
        yansi::disable();
        let body = serde_json::json!({"email": "a@b.c", "password": "hunter2"});
        let line = curl_line(&Method::POST, "http://x/login", &[], true, Some(&body));
        assert!(!line.contains("hunter2"));
        assert!(line.contains("Bearer ***"));
        assert!(line.contains("a@b.c"));
    }
}
