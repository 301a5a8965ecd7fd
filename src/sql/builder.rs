//! Builds parameterized statements for the `books` table.

use crate::model::{Book, BookPatch};
use crate::sql::BindValue;

pub const BOOKS_TABLE: &str = "books";

/// Column list in table order; every statement returns rows in this shape.
pub const BOOK_COLUMNS: &str = "isbn, amazon_url, author, language, pages, publisher, title, year";

pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<BindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: BindValue) -> usize {
        self.params.push(v);
        self.params.len()
    }
}

pub fn select_all() -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!("SELECT {} FROM {} ORDER BY isbn", BOOK_COLUMNS, BOOKS_TABLE);
    q
}

pub fn select_by_isbn(isbn: &str) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(BindValue::Text(isbn.to_string()));
    q.sql = format!("SELECT {} FROM {} WHERE isbn = ${}", BOOK_COLUMNS, BOOKS_TABLE, n);
    q
}

pub fn insert(book: &Book) -> QueryBuf {
    let mut q = QueryBuf::new();
    let values = [
        BindValue::Text(book.isbn.clone()),
        BindValue::Text(book.amazon_url.clone()),
        BindValue::Text(book.author.clone()),
        BindValue::Text(book.language.clone()),
        BindValue::Int(book.pages),
        BindValue::Text(book.publisher.clone()),
        BindValue::Text(book.title.clone()),
        BindValue::Int(book.year),
    ];
    let placeholders: Vec<String> = values
        .into_iter()
        .map(|v| format!("${}", q.push_param(v)))
        .collect();
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        BOOKS_TABLE,
        BOOK_COLUMNS,
        placeholders.join(", "),
        BOOK_COLUMNS
    );
    q
}

/// UPDATE of the columns present in `patch`. `None` when the patch sets nothing.
pub fn update(isbn: &str, patch: &BookPatch) -> Option<QueryBuf> {
    let assignments: Vec<(&str, BindValue)> = [
        ("amazon_url", patch.amazon_url.clone().map(BindValue::Text)),
        ("author", patch.author.clone().map(BindValue::Text)),
        ("language", patch.language.clone().map(BindValue::Text)),
        ("pages", patch.pages.map(BindValue::Int)),
        ("publisher", patch.publisher.clone().map(BindValue::Text)),
        ("title", patch.title.clone().map(BindValue::Text)),
        ("year", patch.year.map(BindValue::Int)),
    ]
    .into_iter()
    .filter_map(|(col, v)| v.map(|v| (col, v)))
    .collect();
    if assignments.is_empty() {
        return None;
    }

    let mut q = QueryBuf::new();
    let mut sets = Vec::with_capacity(assignments.len());
    for (col, v) in assignments {
        let n = q.push_param(v);
        sets.push(format!("{} = ${}", col, n));
    }
    let key = q.push_param(BindValue::Text(isbn.to_string()));
    q.sql = format!(
        "UPDATE {} SET {} WHERE isbn = ${} RETURNING {}",
        BOOKS_TABLE,
        sets.join(", "),
        key,
        BOOK_COLUMNS
    );
    Some(q)
}

pub fn delete(isbn: &str) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(BindValue::Text(isbn.to_string()));
    q.sql = format!(
        "DELETE FROM {} WHERE isbn = ${} RETURNING {}",
        BOOKS_TABLE, n, BOOK_COLUMNS
    );
    q
}
