//! Typed bind values for the books statements.

use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::QueryAs;

/// A value bound to a PostgreSQL placeholder. Columns are either TEXT or INTEGER.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BindValue {
    Text(String),
    Int(i32),
}

/// Bind `params` to `query` in placeholder order.
pub fn bind_all<'q, O>(
    mut query: QueryAs<'q, Postgres, O, PgArguments>,
    params: &'q [BindValue],
) -> QueryAs<'q, Postgres, O, PgArguments> {
    for p in params {
        query = match p {
            BindValue::Text(s) => query.bind(s.as_str()),
            BindValue::Int(n) => query.bind(*n),
        };
    }
    query
}
