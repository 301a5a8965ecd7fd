//! PgBookStore against a live database. Set `TEST_DB_URI` (base URI, no database name)
//! to run; the tests use the `books-test` database and return early otherwise.

use bookstore::config::database_url;
use bookstore::{apply_migrations, ensure_database_exists, AppError, Book, BookPatch, BookStore, PgBookStore, RunMode};
use sqlx::postgres::PgPoolOptions;
use tokio::sync::OnceCell;

/// Database and table creation race when run concurrently; do it once per test binary.
static SETUP: OnceCell<()> = OnceCell::const_new();

async fn store() -> Option<PgBookStore> {
    let base = std::env::var("TEST_DB_URI").ok()?;
    let url = database_url(&base, RunMode::Test);
    SETUP
        .get_or_init(|| async {
            ensure_database_exists(&url).await.unwrap();
            let pool = PgPoolOptions::new().max_connections(1).connect(&url).await.unwrap();
            apply_migrations(&pool).await.unwrap();
            pool.close().await;
        })
        .await;
    let pool = PgPoolOptions::new().max_connections(2).connect(&url).await.unwrap();
    Some(PgBookStore::new(pool))
}

/// Each test owns its isbn so tests can share the table while running in parallel.
async fn fresh_book(store: &PgBookStore, isbn: &str) -> Book {
    store.delete(isbn).await.unwrap();
    Book {
        isbn: isbn.to_string(),
        amazon_url: "http://example.com".into(),
        author: "Test Author".into(),
        language: "English".into(),
        pages: 100,
        publisher: "Test Publisher".into(),
        title: "Test Book".into(),
        year: 2023,
    }
}

#[tokio::test]
async fn create_get_and_list() {
    let Some(store) = store().await else { return };
    let book = fresh_book(&store, "pg-create-0001").await;

    assert_eq!(store.create(&book).await.unwrap(), book);
    assert_eq!(store.get(&book.isbn).await.unwrap(), Some(book.clone()));
    let listed = store.list().await.unwrap();
    assert_eq!(listed.iter().filter(|b| b.isbn == book.isbn).count(), 1);

    store.delete(&book.isbn).await.unwrap();
}

#[tokio::test]
async fn duplicate_insert_conflicts() {
    let Some(store) = store().await else { return };
    let book = fresh_book(&store, "pg-dup-0001").await;

    store.create(&book).await.unwrap();
    let err = store.create(&book).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    store.delete(&book.isbn).await.unwrap();
}

#[tokio::test]
async fn partial_update_keeps_other_columns() {
    let Some(store) = store().await else { return };
    let book = fresh_book(&store, "pg-update-0001").await;
    store.create(&book).await.unwrap();

    let patch = BookPatch {
        title: Some("Updated Title".into()),
        ..Default::default()
    };
    let updated = store.update(&book.isbn, &patch).await.unwrap().unwrap();
    assert_eq!(updated, Book { title: "Updated Title".into(), ..book.clone() });

    let unchanged = store.update(&book.isbn, &BookPatch::default()).await.unwrap();
    assert_eq!(unchanged, Some(updated));

    assert!(store.update("pg-missing-0001", &patch).await.unwrap().is_none());
    store.delete(&book.isbn).await.unwrap();
}

#[tokio::test]
async fn delete_then_get_is_none() {
    let Some(store) = store().await else { return };
    let book = fresh_book(&store, "pg-delete-0001").await;
    store.create(&book).await.unwrap();

    assert_eq!(store.delete(&book.isbn).await.unwrap(), Some(book.clone()));
    assert!(store.get(&book.isbn).await.unwrap().is_none());
    assert!(store.delete(&book.isbn).await.unwrap().is_none());
    store.ping().await.unwrap();
}
