//! HTTP transport for the BankrollGod backend.
//!
//! Every endpoint goes through [`BankrollGodClient::request`], which attaches
//! the stored bearer token, normalizes the response envelope and maps
//! failures onto the core error taxonomy.

use log::{debug, error, warn};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use bankrollgod_core::auth::CredentialStoreTrait;
use bankrollgod_core::constants::{DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
use bankrollgod_core::errors::{Error, Result};
use bankrollgod_core::events::{ClientEvent, ClientEventSink};

use crate::envelope::ApiEnvelope;

/// Account deletion endpoint.
pub(crate) const ACCOUNT_DELETE_PATH: &str = "/users/delete";

/// Transport settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API root including the `/api` prefix.
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            timeout,
        }
    }
}

/// Substitutes `:name` placeholders in an endpoint template.
///
/// Values are percent-encoded, so ids can never change the path shape.
pub fn build_path(template: &str, params: &[(&str, &str)]) -> String {
    params
        .iter()
        .fold(template.to_string(), |path, (name, value)| {
            path.replace(&format!(":{}", name), &urlencoding::encode(value))
        })
}

/// HTTP client for the BankrollGod REST API.
///
/// The client never retries: every call is at-most-once. Credentials are
/// read from the shared store on each request, so a login elsewhere in the
/// process takes effect immediately.
#[derive(Clone)]
pub struct BankrollGodClient {
    client: reqwest::Client,
    base_url: String,
    credentials: Arc<dyn CredentialStoreTrait>,
    event_sink: Arc<dyn ClientEventSink>,
}

impl BankrollGodClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(
        config: ClientConfig,
        credentials: Arc<dyn CredentialStoreTrait>,
        event_sink: Arc<dyn ClientEventSink>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Unexpected(format!("Failed to initialize HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credentials,
            event_sink,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Server root without the `/api` prefix, where `/health` lives.
    pub fn root_url(&self) -> &str {
        self.base_url
            .strip_suffix("/api")
            .unwrap_or(&self.base_url)
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(token) = self.credentials.token() {
            let auth_value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| Error::Unexpected(format!("Invalid access token format: {}", e)))?;
            headers.insert(AUTHORIZATION, auth_value);
        }

        Ok(headers)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Request core
    // ─────────────────────────────────────────────────────────────────────────

    /// Sends one request and returns the normalized envelope.
    pub async fn request<B: Serialize + Sync + ?Sized>(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&B>,
    ) -> Result<ApiEnvelope> {
        let url = format!("{}{}", self.base_url, path);
        debug!("[BankrollGodApi] {} {}", method, url);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .headers(self.headers()?);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            warn!("[BankrollGodApi] {} {} failed: {}", method, url, e);
            Error::unreachable(e.to_string())
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::unreachable(format!("Failed to read response: {}", e)))?;
        debug!("[BankrollGodApi] response ({}): {}", status, text);

        let body = parse_body(&text);

        if !status.is_success() {
            if is_auth_failure(status) && !is_auth_exempt(path) {
                return Err(self.handle_unauthorized(&body, status));
            }
            return Err(rejection(status, body));
        }

        ApiEnvelope::new(body).into_result(status.as_u16())
    }

    pub(crate) async fn fetch(&self, path: &str) -> Result<ApiEnvelope> {
        self.request::<Value>(Method::GET, path, &[], None).await
    }

    pub(crate) async fn fetch_with_query(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<ApiEnvelope> {
        self.request::<Value>(Method::GET, path, query, None).await
    }

    pub(crate) async fn send_json<B: Serialize + Sync + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<ApiEnvelope> {
        self.request(method, path, &[], Some(body)).await
    }

    pub(crate) async fn delete_empty(&self, path: &str) -> Result<ApiEnvelope> {
        self.request::<Value>(Method::DELETE, path, &[], None).await
    }

    pub(crate) async fn post_empty(&self, path: &str) -> Result<ApiEnvelope> {
        self.request(Method::POST, path, &[], Some(&serde_json::json!({})))
            .await
    }

    /// Clears the stored credentials and tells the front end to show login.
    pub(crate) fn handle_unauthorized(&self, body: &Value, status: StatusCode) -> Error {
        let message = error_message(body, status);
        warn!("[BankrollGodApi] {} - clearing credentials", message);
        if let Err(e) = self.credentials.clear() {
            error!("Failed to clear credentials after {}: {}", status, e);
        }
        self.event_sink
            .emit(ClientEvent::authentication_required(message.clone()));
        Error::Unauthorized(message)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // System
    // ─────────────────────────────────────────────────────────────────────────

    /// `GET {root}/health`, without auth. True when the body says `success`.
    pub async fn check_health(&self) -> Result<bool> {
        let url = format!("{}/health", self.root_url());
        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| Error::unreachable(e.to_string()))?;

        let body: Value = response.json().await.unwrap_or(Value::Null);
        Ok(body.get("success").and_then(Value::as_bool) == Some(true))
    }
}

fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

fn is_auth_failure(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
}

/// Deletion endpoints report 401/403 as a refusal of that one action, which
/// leaves the session alone.
fn is_auth_exempt(path: &str) -> bool {
    path.contains("/delete")
}

fn error_message(body: &Value, status: StatusCode) -> String {
    body.get("message")
        .and_then(Value::as_str)
        .or_else(|| body.get("error").and_then(Value::as_str))
        .or_else(|| body.as_str().filter(|s| !s.trim().is_empty()))
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}

/// Maps a non-2xx response onto `Error::Rejected`. The backend's `error`
/// field becomes the machine-readable code.
fn rejection(status: StatusCode, body: Value) -> Error {
    let code = body
        .get("error")
        .and_then(Value::as_str)
        .or_else(|| body.get("code").and_then(Value::as_str))
        .map(str::to_string);
    Error::Rejected {
        status: Some(status.as_u16()),
        code,
        message: error_message(&body, status),
        details: (!body.is_null()).then_some(body),
    }
}
