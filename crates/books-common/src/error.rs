/// Error types shared across book service crates.
///
/// These errors represent failures in infrastructure components (the Google Books API,
/// Redis) that more than one service needs. Application-specific errors should be defined
/// in each service crate and wrap `CommonError` via `#[from]`.
use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum CommonError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid response JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("upstream returned error: status={status} body={body}")]
    Upstream { status: StatusCode, body: String },

    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),
}
