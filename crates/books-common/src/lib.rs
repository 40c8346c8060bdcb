pub mod api;
pub mod error;
pub mod google_books;
pub mod redis;
