//! HTTP transport
//!
//! The client talks to the API through the [`Transport`] trait so the
//! classification rules can be exercised without a server. The production
//! implementation is [`ReqwestTransport`].

use async_trait::async_trait;
use corpografo_core::{ConsoleError, ConsoleResult, HttpMethod};
use serde_json::Value;

use crate::config::ConsoleConfig;

// ============================================================================
// Request / Response
// ============================================================================

/// One outgoing API call
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,

    /// Path relative to the API root (`corpus/3`)
    pub path: String,

    /// Bearer token, when a session exists
    pub bearer: Option<String>,

    /// JSON body; `{}` when the caller has none
    pub body: Value,
}

/// Raw status and body of an API answer
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,

    /// Body bytes as received
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Response with a JSON body
    pub fn json(status: u16, body: &Value) -> Self {
        Self::new(status, body.to_string())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON
    pub fn body_json(&self) -> ConsoleResult<Value> {
        serde_json::from_slice(&self.body)
            .map_err(|e| ConsoleError::decode(format!("status {}: {}", self.status, e)))
    }

    /// Decode the body into `T`
    pub fn decode<T: serde::de::DeserializeOwned>(&self) -> ConsoleResult<T> {
        serde_json::from_slice(&self.body)
            .map_err(|e| ConsoleError::decode(format!("status {}: {}", self.status, e)))
    }
}

// ============================================================================
// Transport trait
// ============================================================================

/// Sends one request and returns whatever HTTP answer came back.
///
/// `Err` means no HTTP response was received at all.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> ConsoleResult<ApiResponse>;
}

// ============================================================================
// ReqwestTransport
// ============================================================================

/// Transport over `reqwest`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    config: ConsoleConfig,
}

impl ReqwestTransport {
    pub fn new(config: ConsoleConfig) -> ConsoleResult<Self> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(!config.verify_ssl)
            .timeout(config.timeout)
            .build()
            .map_err(|e| ConsoleError::Transport(e.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> ConsoleResult<ApiResponse> {
        let url = self.config.url(&request.path);
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut req = self.client.request(method, &url).json(&request.body);
        if let Some(token) = &request.bearer {
            req = req.bearer_auth(token);
        }

        let response = req.send().await.map_err(|e| {
            let message = if e.is_timeout() {
                "request timed out".to_string()
            } else if e.is_connect() {
                format!("unable to connect to {}", self.config.api_url)
            } else {
                e.to_string()
            };
            ConsoleError::Transport(message)
        })?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| ConsoleError::Transport(e.to_string()))?;

        Ok(ApiResponse::new(status, body.to_vec()))
    }
}

// ============================================================================
// Tests
// ============================================================================
