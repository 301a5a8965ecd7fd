//! Book persistence behind a trait so handlers never see the backend.

mod memory;
mod postgres;

pub use memory::MemoryBookStore;
pub use postgres::PgBookStore;

use crate::error::AppError;
use crate::model::{Book, BookPatch};
use async_trait::async_trait;

/// Single-row operations on the books collection. Each call is one round-trip.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// All books ordered by isbn.
    async fn list(&self) -> Result<Vec<Book>, AppError>;

    async fn get(&self, isbn: &str) -> Result<Option<Book>, AppError>;

    /// Insert a validated book. A taken isbn yields `AppError::Conflict`.
    async fn create(&self, book: &Book) -> Result<Book, AppError>;

    /// Overwrite the fields present in `patch`; `None` if no book has this isbn.
    async fn update(&self, isbn: &str, patch: &BookPatch) -> Result<Option<Book>, AppError>;

    /// Remove and return the book; `None` if no book has this isbn.
    async fn delete(&self, isbn: &str) -> Result<Option<Book>, AppError>;

    /// Cheap liveness check of the backend.
    async fn ping(&self) -> Result<(), AppError>;
}

/// Store whose every call fails the way a dropped connection does.
#[cfg(test)]
pub(crate) struct DownStore;

#[cfg(test)]
impl DownStore {
    pub(crate) const DRIVER_MESSAGE: &'static str = "connection reset by peer";

    fn fail<T>() -> Result<T, AppError> {
        Err(AppError::Db(sqlx::Error::Protocol(Self::DRIVER_MESSAGE.into())))
    }
}

#[cfg(test)]
#[async_trait]
impl BookStore for DownStore {
    async fn list(&self) -> Result<Vec<Book>, AppError> {
        Self::fail()
    }
    async fn get(&self, _: &str) -> Result<Option<Book>, AppError> {
        Self::fail()
    }
    async fn create(&self, _: &Book) -> Result<Book, AppError> {
        Self::fail()
    }
    async fn update(&self, _: &str, _: &BookPatch) -> Result<Option<Book>, AppError> {
        Self::fail()
    }
    async fn delete(&self, _: &str) -> Result<Option<Book>, AppError> {
        Self::fail()
    }
    async fn ping(&self) -> Result<(), AppError> {
        Self::fail()
    }
}
