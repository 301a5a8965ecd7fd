//! In-process store keyed by isbn. Used by tests and when embedding without a database.

use super::BookStore;
use crate::error::AppError;
use crate::model::{Book, BookPatch};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemoryBookStore {
    books: RwLock<BTreeMap<String, Book>>,
}

impl MemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_books(books: impl IntoIterator<Item = Book>) -> Self {
        MemoryBookStore {
            books: RwLock::new(books.into_iter().map(|b| (b.isbn.clone(), b)).collect()),
        }
    }
}

#[async_trait]
impl BookStore for MemoryBookStore {
    async fn list(&self) -> Result<Vec<Book>, AppError> {
        Ok(self.books.read().await.values().cloned().collect())
    }

    async fn get(&self, isbn: &str) -> Result<Option<Book>, AppError> {
        Ok(self.books.read().await.get(isbn).cloned())
    }

    async fn create(&self, book: &Book) -> Result<Book, AppError> {
        let mut books = self.books.write().await;
        if books.contains_key(&book.isbn) {
            return Err(AppError::Conflict(book.isbn.clone()));
        }
        books.insert(book.isbn.clone(), book.clone());
        Ok(book.clone())
    }

    async fn update(&self, isbn: &str, patch: &BookPatch) -> Result<Option<Book>, AppError> {
        let mut books = self.books.write().await;
        Ok(books.get_mut(isbn).map(|book| {
            book.apply(patch);
            book.clone()
        }))
    }

    async fn delete(&self, isbn: &str) -> Result<Option<Book>, AppError> {
        Ok(self.books.write().await.remove(isbn))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
