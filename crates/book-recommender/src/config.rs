use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use books_common::google_books::GoogleBooksConfig;

use crate::corpus::ARTIFACT_FILES;
use crate::error::AppError;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

/// Application configuration loaded explicitly from environment variables.
///
/// The artifact directory has no default. Redis is optional; without it external
/// lookups are simply not cached.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the four precomputed artifact files.
    pub data_dir: PathBuf,
    /// Address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// Redis connection URL (e.g. "redis://127.0.0.1:6379"). `None` disables caching.
    pub redis_url: Option<String>,
    pub books_api: GoogleBooksConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `BOOKS_DATA_DIR`: directory with `books.json`, `similarities.json`,
    ///   `tfidf_vectorizer.json` and `tfidf_matrix.json`
    ///
    /// Optional:
    /// - `BIND_ADDR`: listen address (default `0.0.0.0:8000`)
    /// - `REDIS_URL`: Redis connection string (omit to disable caching)
    /// - `GOOGLE_BOOKS_BASE_URL`, `GOOGLE_BOOKS_TIMEOUT_SECS`, `GOOGLE_BOOKS_API_KEY`
    pub fn from_env() -> Result<Self, AppError> {
        let data_dir = std::env::var("BOOKS_DATA_DIR").map_err(|_| {
            AppError::Config("BOOKS_DATA_DIR environment variable is required".to_string())
        })?;
        let data_dir = PathBuf::from(data_dir);
        check_artifacts_present(&data_dir)?;

        let bind_addr = parse_bind_addr(
            &std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
        )?;

        let redis_url = std::env::var("REDIS_URL").ok().filter(|u| !u.trim().is_empty());

        Ok(Self {
            data_dir,
            bind_addr,
            redis_url,
            books_api: GoogleBooksConfig::from_env(),
        })
    }
}

fn parse_bind_addr(raw: &str) -> Result<SocketAddr, AppError> {
    raw.trim()
        .parse()
        .map_err(|e| AppError::Config(format!("invalid BIND_ADDR {raw:?}: {e}")))
}

fn check_artifacts_present(dir: &Path) -> Result<(), AppError> {
    for name in ARTIFACT_FILES {
        let path = dir.join(name);
        if !path.is_file() {
            return Err(AppError::Config(format!(
                "{name} not found at {}",
                path.display()
            )));
        }
    }
    Ok(())
}
