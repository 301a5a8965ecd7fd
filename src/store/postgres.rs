//! PostgreSQL-backed store.

use super::BookStore;
use crate::error::AppError;
use crate::model::{Book, BookPatch};
use crate::sql::{self, bind_all, QueryBuf};
use async_trait::async_trait;
use sqlx::PgPool;

#[derive(Clone)]
pub struct PgBookStore {
    pool: PgPool,
}

impl PgBookStore {
    pub fn new(pool: PgPool) -> Self {
        PgBookStore { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn fetch_optional(&self, q: &QueryBuf) -> Result<Option<Book>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let row = bind_all(sqlx::query_as::<_, Book>(&q.sql), &q.params)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }
}

#[async_trait]
impl BookStore for PgBookStore {
    async fn list(&self) -> Result<Vec<Book>, AppError> {
        let q = sql::select_all();
        tracing::debug!(sql = %q.sql, "query");
        let rows = sqlx::query_as::<_, Book>(&q.sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn get(&self, isbn: &str) -> Result<Option<Book>, AppError> {
        self.fetch_optional(&sql::select_by_isbn(isbn)).await
    }

    async fn create(&self, book: &Book) -> Result<Book, AppError> {
        let q = sql::insert(book);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        bind_all(sqlx::query_as::<_, Book>(&q.sql), &q.params)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => AppError::Conflict(book.isbn.clone()),
                e => AppError::Db(e),
            })
    }

    async fn update(&self, isbn: &str, patch: &BookPatch) -> Result<Option<Book>, AppError> {
        match sql::update(isbn, patch) {
            Some(q) => self.fetch_optional(&q).await,
            None => self.get(isbn).await,
        }
    }

    async fn delete(&self, isbn: &str) -> Result<Option<Book>, AppError> {
        self.fetch_optional(&sql::delete(isbn)).await
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
