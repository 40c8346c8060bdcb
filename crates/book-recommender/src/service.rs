/// Request orchestration for `recommend_book`.
///
/// ```text
/// normalize -> exact match ─ hit ──> similarity matrix row
///                          └ miss ─> Books API -> title check -> TF-IDF cold start
/// ```
///
/// Every failure on the external path (no data, title mismatch, nothing to score)
/// collapses into the same `AppError::NotFound`.
use std::sync::Arc;

use tracing::{error, info};

use books_common::api::RecommendedBook;
use books_common::google_books::{GoogleBooksClient, VolumeSummary};
use books_common::redis::RedisStore;

use crate::cache::LookupCache;
use crate::config::Config;
use crate::corpus::Corpus;
use crate::error::AppError;
use crate::fuzzy::{is_valid_match, DEFAULT_MATCH_THRESHOLD};
use crate::resolver::collapse_whitespace;

pub struct Recommender {
    corpus: Arc<Corpus>,
    books_api: GoogleBooksClient,
    cache: LookupCache,
}

impl Recommender {
    pub fn new(corpus: Arc<Corpus>, books_api: GoogleBooksClient, cache: LookupCache) -> Self {
        Self {
            corpus,
            books_api,
            cache,
        }
    }

    /// Build the Books API client and the Redis lookup cache described by `config`.
    pub async fn connect(config: &Config, corpus: Arc<Corpus>) -> Result<Self, AppError> {
        let redis = RedisStore::new(config.redis_url.as_deref());
        if redis.is_available().await {
            info!("redis connected");
        } else {
            info!("redis unavailable, running without lookup cache");
        }

        let books_api = GoogleBooksClient::new(config.books_api.clone())?;
        info!(
            base_url = %books_api.config().base_url,
            timeout_ms = books_api.config().timeout.as_millis(),
            api_key = books_api.config().api_key.is_some(),
            "books api client configured"
        );

        Ok(Self::new(corpus, books_api, LookupCache::new(redis)))
    }

    pub async fn recommend(&self, raw_title: &str) -> Result<Vec<RecommendedBook>, AppError> {
        let title = collapse_whitespace(raw_title);

        if let Some(index) = self.corpus.find(&title) {
            info!(title, index, "book found in corpus");
            return Ok(self.corpus.recommend_by_index(index));
        }

        self.recommend_from_api(&title).await
    }

    async fn recommend_from_api(&self, title: &str) -> Result<Vec<RecommendedBook>, AppError> {
        if title.is_empty() {
            return Err(AppError::NotFound(String::new()));
        }
        info!(title, "book not in corpus, querying books api");

        let Some(volume) = self.lookup(title).await else {
            info!(title, "books api returned no volume");
            return Err(AppError::NotFound(title.to_string()));
        };

        if !is_valid_match(title, &volume.title, DEFAULT_MATCH_THRESHOLD) {
            info!(title, api_title = %volume.title, "books api result rejected");
            return Err(AppError::NotFound(title.to_string()));
        }

        let corpus = Arc::clone(&self.corpus);
        let description = volume.description;
        let books = tokio::task::spawn_blocking(move || corpus.recommend_for_description(&description))
            .await
            .map_err(|e| {
                error!(error = %e, title, "cold start scoring task failed");
                AppError::Internal(format!("spawn_blocking join error: {e}"))
            })?;

        if books.is_empty() {
            info!(title, "books api volume has no description");
            return Err(AppError::NotFound(title.to_string()));
        }
        Ok(books)
    }

    async fn lookup(&self, title: &str) -> Option<VolumeSummary> {
        if let Some(volume) = self.cache.get_volume(title).await {
            info!(title, "volume cache hit");
            return Some(volume);
        }
        let volume = self.books_api.fetch(title).await?;
        self.cache.set_volume(title, &volume).await;
        Some(volume)
    }
}
