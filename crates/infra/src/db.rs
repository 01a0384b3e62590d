//! Database wiring: connection pool and schema.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::store::StoreError;

/// Idempotent schema. `persons.user_id` is unique so find-or-create cannot
/// produce duplicates; `habits.owner_id` ties every habit to its owner.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS persons (
        id      BIGSERIAL PRIMARY KEY,
        user_id TEXT NOT NULL UNIQUE CHECK (length(btrim(user_id)) > 0)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS habits (
        id            BIGSERIAL PRIMARY KEY,
        owner_id      BIGINT NOT NULL REFERENCES persons (id),
        title         TEXT NOT NULL CHECK (length(title) > 0),
        behavior      TEXT NOT NULL CHECK (length(behavior) > 0),
        created       TIMESTAMPTZ NOT NULL,
        last_modified TIMESTAMPTZ NOT NULL
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS habits_owner_created_idx
        ON habits (owner_id, created DESC, id DESC)
    "#,
];

/// Open a pool against `database_url`.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, StoreError> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .map_err(|e| StoreError::Storage(format!("failed to connect to database: {e}")))
}

/// Create tables and indexes if they are missing.
pub async fn apply_schema(pool: &PgPool) -> Result<(), StoreError> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| StoreError::Storage(format!("failed to apply schema: {e}")))?;
    }
    tracing::info!(statements = SCHEMA.len(), "database schema applied");
    Ok(())
}
