use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::CommonError;

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/books/v1";
const MAX_ERROR_BODY_BYTES: usize = 4 * 1024;

#[derive(Clone, Debug)]
pub struct GoogleBooksConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub api_key: Option<String>,
}

impl Default for GoogleBooksConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(5),
            api_key: None,
        }
    }
}

impl GoogleBooksConfig {
    pub fn from_env() -> Self {
        let base_url = std::env::var("GOOGLE_BOOKS_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let timeout = std::env::var("GOOGLE_BOOKS_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(5));

        let api_key = std::env::var("GOOGLE_BOOKS_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            api_key,
        }
    }
}

/// The two fields of a Google Books volume the recommender cares about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeSummary {
    pub title: String,
    pub description: String,
}

#[derive(Clone)]
pub struct GoogleBooksClient {
    config: GoogleBooksConfig,
    http: reqwest::Client,
}

impl GoogleBooksClient {
    pub fn new(config: GoogleBooksConfig) -> Result<Self, CommonError> {
        let http = reqwest::Client::builder()
            .user_agent("book-recommender")
            .timeout(config.timeout)
            .build()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &GoogleBooksConfig {
        &self.config
    }

    /// Look up the best-guess volume for `title`.
    ///
    /// `Ok(None)` means the API answered but had nothing (zero `totalItems`, or an
    /// `items` array without a `volumeInfo`). Transport, status and decoding failures
    /// come back as `Err`.
    pub async fn search_volume(&self, title: &str) -> Result<Option<VolumeSummary>, CommonError> {
        let mut url = format!(
            "{}/volumes?q={}&maxResults=1",
            self.config.base_url,
            urlencoding::encode(title)
        );
        if let Some(key) = &self.config.api_key {
            url.push_str("&key=");
            url.push_str(&urlencoding::encode(key));
        }

        let resp = self.http.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = read_limited_text(resp, MAX_ERROR_BODY_BYTES).await;
            return Err(CommonError::Upstream { status, body });
        }

        let bytes = resp.bytes().await?;
        let parsed: VolumesResponse = serde_json::from_slice(&bytes)?;
        if parsed.total_items == 0 {
            return Ok(None);
        }

        let volume = parsed
            .items
            .into_iter()
            .next()
            .and_then(|item| item.volume_info)
            .map(|info| VolumeSummary {
                title: info.title.unwrap_or_default(),
                description: info.description.unwrap_or_default(),
            });
        debug!(query = title, found = volume.is_some(), "google books lookup complete");
        Ok(volume)
    }

    /// Soft-fail wrapper around [`search_volume`](Self::search_volume): every error is
    /// logged and folded into `None`. One attempt, no retries.
    pub async fn fetch(&self, title: &str) -> Option<VolumeSummary> {
        self.search_volume(title)
            .await
            .inspect_err(|e| warn!(error = %e, title, "google books lookup failed"))
            .ok()
            .flatten()
    }
}

async fn read_limited_text(resp: reqwest::Response, max_bytes: usize) -> String {
    match resp.bytes().await {
        Ok(mut b) => {
            if b.len() > max_bytes {
                b.truncate(max_bytes);
            }
            String::from_utf8_lossy(&b).to_string()
        }
        Err(e) => {
            warn!(error = %e, "failed to read upstream error body");
            "<failed to read error body>".to_string()
        }
    }
}

#[derive(Debug, Deserialize)]
struct VolumesResponse {
    #[serde(rename = "totalItems", default)]
    total_items: u64,
    #[serde(default)]
    items: Vec<VolumeItem>,
}

#[derive(Debug, Deserialize)]
struct VolumeItem {
    #[serde(rename = "volumeInfo")]
    volume_info: Option<VolumeInfo>,
}

#[derive(Debug, Deserialize)]
struct VolumeInfo {
    title: Option<String>,
    description: Option<String>,
}
