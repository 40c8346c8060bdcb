use serde::{Deserialize, Serialize};

/// Body of `POST /recommend_book`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendRequest {
    /// Free-form book title as typed by the user.
    pub title: String,
}

/// One recommended book, as returned to API callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendedBook {
    pub title: String,
    pub authors: String,
    /// Cover image URL.
    pub thumbnail: String,
}

/// Error body, shaped like `{"detail": "..."}` so existing clients can read `err.detail`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub detail: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomeResponse {
    pub message: String,
}
