use thiserror::Error;

#[derive(Debug, Error)]
pub enum NetError {
    #[error("request to {url} failed: {source}")]
    Request { url: String, #[source] source: reqwest::Error },

    #[error("request to {0} timed out")]
    Timeout(String),

    #[error("response body from {url} was not valid JSON: {source}")]
    InvalidJson { url: String, #[source] source: serde_json::Error },

    #[error("retries exhausted for {0}")]
    RetriesExhausted(String),
}
