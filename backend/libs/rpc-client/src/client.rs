//! HTTP client for tRPC-style procedures
//!
//! Queries are sent as `GET {base}/{path}?input=...`, mutations as
//! `POST {base}/{path}` with a JSON body.

use parking_lot::RwLock;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::envelope::{ErrorEnvelope, RequestEnvelope, ResponseEnvelope};
use crate::error::{Result, RpcError};

/// Header carrying the per-request correlation id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Client settings
#[derive(Debug, Clone)]
pub struct RpcClientConfig {
    /// Base URL of the procedure endpoint (e.g. `http://localhost:3000/api/trpc`)
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl RpcClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Procedure client
///
/// Cloning is cheap and clones share the session token.
#[derive(Clone)]
pub struct RpcClient {
    client: Client,
    base_url: String,
    session_token: Arc<RwLock<Option<String>>>,
}

impl RpcClient {
    /// Create a new procedure client
    pub fn new(config: RpcClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RpcError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session_token: Arc::new(RwLock::new(None)),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Set or clear the bearer token sent with every call
    pub fn set_session_token(&self, token: Option<String>) {
        *self.session_token.write() = token;
    }

    /// Call a query procedure that takes no input
    pub async fn query<O>(&self, path: &str) -> Result<O>
    where
        O: DeserializeOwned,
    {
        let request = self.client.get(self.url(path));
        self.send(path, request).await
    }

    /// Call a query procedure with input
    pub async fn query_with<I, O>(&self, path: &str, input: &I) -> Result<O>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        let input = serde_json::to_string(&RequestEnvelope::new(input))
            .map_err(|e| RpcError::InvalidResponse(format!("Failed to encode input: {}", e)))?;

        let request = self.client.get(self.url(path)).query(&[("input", input)]);
        self.send(path, request).await
    }

    /// Call a mutation procedure
    pub async fn mutation<I, O>(&self, path: &str, input: &I) -> Result<O>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        let request = self
            .client
            .post(self.url(path))
            .json(&RequestEnvelope::new(input));
        self.send(path, request).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn send<O>(&self, path: &str, request: RequestBuilder) -> Result<O>
    where
        O: DeserializeOwned,
    {
        let request_id = uuid::Uuid::new_v4().to_string();
        let mut request = request.header(REQUEST_ID_HEADER, &request_id);
        if let Some(token) = self.session_token.read().as_deref() {
            request = request.bearer_auth(token);
        }

        debug!(request_id = %request_id, path = %path, "Calling procedure");
        let started = Instant::now();

        let response = request.send().await.map_err(|e| {
            warn!(request_id = %request_id, path = %path, error = %e, "Procedure request failed");
            RpcError::from(e)
        })?;

        let status = response.status();
        let body = response.text().await.map_err(RpcError::from)?;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        if status.is_success() {
            info!(
                request_id = %request_id,
                path = %path,
                status = status.as_u16(),
                elapsed_ms,
                "Procedure call succeeded"
            );

            return serde_json::from_str::<ResponseEnvelope<O>>(&body)
                .map(ResponseEnvelope::into_data)
                .map_err(|e| RpcError::InvalidResponse(format!("{}: {}", path, e)));
        }

        warn!(
            request_id = %request_id,
            path = %path,
            status = status.as_u16(),
            elapsed_ms,
            "Procedure call failed"
        );

        match serde_json::from_str::<ErrorEnvelope>(&body) {
            Ok(envelope) => Err(envelope.into_error(path, status.as_u16())),
            Err(_) => Err(RpcError::Transport(format!(
                "HTTP {}: {}",
                status.as_u16(),
                if body.is_empty() { "empty response" } else { body.as_str() }
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpc_client_creation() {
        let client = RpcClient::new(RpcClientConfig::new("http://localhost:3000/api/trpc/"))
            .expect("client should build");
        assert_eq!(client.base_url(), "http://localhost:3000/api/trpc");
        assert_eq!(client.url("posts.getAll"), "http://localhost:3000/api/trpc/posts.getAll");
    }

    #[test]
    fn test_session_token_is_shared_between_clones() {
        let client = RpcClient::new(RpcClientConfig::new("http://localhost")).unwrap();
        let clone = client.clone();

        client.set_session_token(Some("sess_123".to_string()));
        assert_eq!(clone.session_token.read().as_deref(), Some("sess_123"));

        clone.set_session_token(None);
        assert!(client.session_token.read().is_none());
    }

    #[test]
    fn test_config_defaults() {
        let config = RpcClientConfig::new("http://localhost").with_timeout(Duration::from_secs(5));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }
}
