//! Book CRUD handlers: list, read, create, update, delete.

use crate::error::AppError;
use crate::extractors::JsonBody;
use crate::model::{Book, BookPatch};
use crate::response::{book_created, book_ok, books_ok, message_ok};
use crate::service::{normalize_integers, RequestValidator, Schema, BOOK_CREATE, BOOK_UPDATE};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Decode a body that already passed schema validation against `schema`.
fn decode<T: DeserializeOwned>(mut body: Value, schema: &Schema) -> Result<T, AppError> {
    normalize_integers(&mut body, schema);
    serde_json::from_value(body).map_err(|e| AppError::BadRequest(e.to_string()))
}

pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let books = state.store.list().await?;
    Ok(books_ok(books))
}

pub async fn read(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let book = state
        .store
        .get(&isbn)
        .await?
        .ok_or(AppError::NotFound(isbn))?;
    Ok(book_ok(book))
}

pub async fn create(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<impl IntoResponse, AppError> {
    RequestValidator::validate(&body, &BOOK_CREATE)?;
    let book: Book = decode(body, &BOOK_CREATE)?;
    let book = state.store.create(&book).await?;
    tracing::info!(isbn = %book.isbn, "book created");
    Ok(book_created(book))
}

pub async fn update(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
    JsonBody(body): JsonBody,
) -> Result<impl IntoResponse, AppError> {
    RequestValidator::validate(&body, &BOOK_UPDATE)?;
    let patch: BookPatch = decode(body, &BOOK_UPDATE)?;
    if let Some(body_isbn) = &patch.isbn {
        if *body_isbn != isbn {
            return Err(AppError::BadRequest(format!(
                "isbn cannot be changed (path {}, body {})",
                isbn, body_isbn
            )));
        }
    }
    let book = state
        .store
        .update(&isbn, &patch)
        .await?
        .ok_or(AppError::NotFound(isbn))?;
    tracing::info!(isbn = %book.isbn, "book updated");
    Ok(book_ok(book))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let book = state
        .store
        .delete(&isbn)
        .await?
        .ok_or(AppError::NotFound(isbn))?;
    tracing::info!(isbn = %book.isbn, "book deleted");
    Ok(message_ok("Book deleted"))
}
