/// HTTP surface.
///
/// - `GET /`: welcome message
/// - `POST /recommend_book`: `{"title": ...}` -> up to five books, or 404 with a fixed
///   `detail` message
///
/// CORS is fully open: any origin, method and header.
use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use tower_http::cors::CorsLayer;
use tracing::error;

use books_common::api::{ErrorDetail, RecommendRequest, RecommendedBook, WelcomeResponse};

use crate::error::AppError;
use crate::service::Recommender;

pub const WELCOME_MESSAGE: &str = "Welcome to the Book Recommendation API!";
pub const NOT_FOUND_DETAIL: &str =
    "Haven't heard of that one! Sorry can't give any recommendations.";

pub fn router(recommender: Arc<Recommender>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/recommend_book", post(recommend_book))
        .layer(Extension(recommender))
        .layer(CorsLayer::very_permissive())
}

async fn root() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: WELCOME_MESSAGE.to_string(),
    })
}

async fn recommend_book(
    Extension(recommender): Extension<Arc<Recommender>>,
    Json(request): Json<RecommendRequest>,
) -> Result<Json<Vec<RecommendedBook>>, AppError> {
    let books = recommender.recommend(&request.title).await?;
    Ok(Json(books))
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, NOT_FOUND_DETAIL.to_string()),
            other => {
                error!(error = %other, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };
        (status, Json(ErrorDetail { detail })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::{router, NOT_FOUND_DETAIL, WELCOME_MESSAGE};
    use crate::test_support;

    fn app() -> Router {
        router(Arc::new(test_support::recommender("http://127.0.0.1:9")))
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_title(title: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/recommend_book")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "title": title }).to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn root_returns_welcome() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({ "message": WELCOME_MESSAGE }));
    }

    #[tokio::test]
    async fn known_title_returns_five_books() {
        let response = app().oneshot(post_title("Dune")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        let books = body.as_array().unwrap();
        assert_eq!(books.len(), 5);
        assert_eq!(
            books[0],
            json!({
                "title": "dune messiah",
                "authors": "Frank Herbert",
                "thumbnail": "http://books.example/dune-messiah.jpg"
            })
        );
    }

    #[tokio::test]
    async fn unknown_title_is_404_with_detail() {
        let response = app().oneshot(post_title("Some Unheard Of Book")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await, json!({ "detail": NOT_FOUND_DETAIL }));
    }

    #[tokio::test]
    async fn missing_title_field_is_rejected() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/recommend_book")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"name": "Dune"}"#))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn cors_allows_any_origin() {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/recommend_book")
            .header(header::ORIGIN, "http://frontend.example")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();

        assert!(response.status().is_success());
        let headers = response.headers();
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://frontend.example"
        );
        assert!(headers.contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
    }
}
