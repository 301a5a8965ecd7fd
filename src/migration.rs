//! Database bootstrap: create the target database and the `books` table when missing.

use crate::config::DB_URI_VAR;
use crate::error::{AppError, ConfigError};
use sqlx::postgres::PgConnectOptions;
use sqlx::{ConnectOptions, PgConnection, PgPool};
use std::str::FromStr;

const CREATE_BOOKS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS books (
        isbn TEXT PRIMARY KEY,
        amazon_url TEXT NOT NULL,
        author TEXT NOT NULL,
        language TEXT NOT NULL,
        pages INTEGER NOT NULL CHECK (pages >= 1),
        publisher TEXT NOT NULL,
        title TEXT NOT NULL,
        year INTEGER NOT NULL
    )
"#;

/// Create the `books` table. Idempotent.
pub async fn apply_migrations(pool: &PgPool) -> Result<(), AppError> {
    sqlx::query(CREATE_BOOKS_TABLE).execute(pool).await?;
    tracing::info!("books table ready");
    Ok(())
}

/// Create the database named in `database_url` when it is missing, working through
/// the `postgres` maintenance database. Call before building the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin, target) = admin_target(database_url)?;
    let Some(target) = target else {
        return Ok(());
    };
    let mut conn: PgConnection = admin.connect().await?;
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&target)
        .fetch_one(&mut conn)
        .await?;
    if exists {
        return Ok(());
    }
    tracing::info!(database = %target, "creating database");
    match sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&target)))
        .execute(&mut conn)
        .await
    {
        Ok(_) => Ok(()),
        // Another process created it between the check and here.
        Err(sqlx::Error::Database(e)) if e.code().as_deref() == Some(DUPLICATE_DATABASE) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

const DUPLICATE_DATABASE: &str = "42P04";
const MAINTENANCE_DB: &str = "postgres";

/// Connection options for the maintenance database, plus the database to create.
/// The target is `None` when the url names no database or names `postgres` itself.
fn admin_target(url: &str) -> Result<(PgConnectOptions, Option<String>), AppError> {
    let opts = PgConnectOptions::from_str(url).map_err(|_| invalid_url(url))?;
    let target = opts
        .get_database()
        .map(str::trim)
        .filter(|name| !name.is_empty() && *name != MAINTENANCE_DB)
        .map(str::to_owned);
    Ok((opts.database(MAINTENANCE_DB), target))
}

fn invalid_url(url: &str) -> AppError {
    AppError::Config(ConfigError::Invalid {
        key: DB_URI_VAR,
        value: url.to_string(),
    })
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
