//! Response envelopes for the books API.

use crate::model::Book;
use axum::{http::StatusCode, Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct BookEnvelope {
    pub book: Book,
}

#[derive(Debug, Serialize)]
pub struct BooksEnvelope {
    pub books: Vec<Book>,
}

#[derive(Debug, Serialize)]
pub struct MessageEnvelope {
    pub message: &'static str,
}

pub fn book_created(book: Book) -> (StatusCode, Json<BookEnvelope>) {
    (StatusCode::CREATED, Json(BookEnvelope { book }))
}

pub fn book_ok(book: Book) -> (StatusCode, Json<BookEnvelope>) {
    (StatusCode::OK, Json(BookEnvelope { book }))
}

pub fn books_ok(books: Vec<Book>) -> (StatusCode, Json<BooksEnvelope>) {
    (StatusCode::OK, Json(BooksEnvelope { books }))
}

pub fn message_ok(message: &'static str) -> (StatusCode, Json<MessageEnvelope>) {
    (StatusCode::OK, Json(MessageEnvelope { message }))
}
