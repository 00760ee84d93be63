//! # Outbound HTTP port
//!
//! One POST primitive every higher-level dispatcher (gateway fan-out,
//! BAP/BPP request dispatch, webhook delivery) builds on. Kept as a trait
//! so tests substitute an in-memory double instead of hitting the network.

use std::time::Duration;

use serde_json::Value;

use crate::errors::NetError;

#[derive(Debug, Clone)]
pub struct DispatchResponse {
    pub status: u16,
    pub body: Value,
}

impl DispatchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait::async_trait]
pub trait HttpDispatcher: Send + Sync {
    async fn post_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &Value,
    ) -> Result<DispatchResponse, NetError>;
}

/// `reqwest`-backed dispatcher used by every production adapter.
pub struct ReqwestDispatcher {
    client: reqwest::Client,
}

impl ReqwestDispatcher {
    pub fn new(timeout: Duration) -> Self {
        Self { client: reqwest::Client::builder().timeout(timeout).build().expect("reqwest client builds") }
    }
}

impl Default for ReqwestDispatcher {
    fn default() -> Self {
        Self::new(Duration::from_millis(30_000))
    }
}

#[async_trait::async_trait]
impl HttpDispatcher for ReqwestDispatcher {
    async fn post_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &Value,
    ) -> Result<DispatchResponse, NetError> {
        let mut req = self.client.post(url).json(body);
        for (k, v) in headers {
            req = req.header(k, v);
        }
        let resp = req.send().await.map_err(|e| {
            if e.is_timeout() {
                NetError::Timeout(url.to_string())
            } else {
                NetError::Request { url: url.to_string(), source: e }
            }
        })?;
        let status = resp.status().as_u16();
        let body = resp
            .json::<Value>()
            .await
            .unwrap_or(Value::Null);
        Ok(DispatchResponse { status, body })
    }
}
