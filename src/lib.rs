//! Bookstore: REST CRUD over a PostgreSQL `books` table with schema-validated writes.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod migration;
pub mod model;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::{RunMode, Settings};
pub use error::{AppError, ConfigError};
pub use migration::{apply_migrations, ensure_database_exists};
pub use model::{Book, BookPatch};
pub use routes::{app, book_routes, common_routes, common_routes_with_ready};
pub use service::{RequestValidator, Violation, BOOK_CREATE, BOOK_UPDATE};
pub use state::AppState;
pub use store::{BookStore, MemoryBookStore, PgBookStore};
