//! Postgres-backed store for people and habits.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | Database (unique violation) | `23505` | `Conflict` |
//! | Database (foreign key violation) | `23503` | `Conflict` |
//! | Database (other) | Any other | `Storage` |
//! | Other | N/A | `Storage` |
//!
//! ## Owner Isolation
//!
//! Every habit query carries `owner_id` in its WHERE clause.

use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use hipnosis_auth::ExternalUserId;
use hipnosis_core::{HabitId, PersonId};
use hipnosis_habits::{Habit, HabitDraft, Person};

use super::r#trait::{HabitStore, PersonStore, StoreError};

const HABIT_COLUMNS: &str = "id, owner_id, title, behavior, created, last_modified";

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Wrap an existing pool. The schema must already be applied
    /// (see [`crate::db::apply_schema`]).
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait::async_trait]
impl PersonStore for PostgresStore {
    #[instrument(skip(self), fields(user_id = %user_id), err)]
    async fn find_or_create(&self, user_id: &ExternalUserId) -> Result<Person, StoreError> {
        // The no-op update makes RETURNING yield the existing row on conflict.
        let row = sqlx::query(
            r#"
            INSERT INTO persons (user_id)
            VALUES ($1)
            ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
            RETURNING id, user_id
            "#,
        )
        .bind(user_id.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_or_create_person", e))?;

        person_from_row(&row)
    }

    #[instrument(skip(self), fields(user_id = %user_id), err)]
    async fn find_by_user_id(&self, user_id: &ExternalUserId) -> Result<Option<Person>, StoreError> {
        let row = sqlx::query("SELECT id, user_id FROM persons WHERE user_id = $1")
            .bind(user_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_person", e))?;

        row.as_ref().map(person_from_row).transpose()
    }
}

#[async_trait::async_trait]
impl HabitStore for PostgresStore {
    #[instrument(skip(self, draft), fields(owner = %owner), err)]
    async fn insert(
        &self,
        owner: PersonId,
        draft: HabitDraft,
        now: DateTime<Utc>,
    ) -> Result<Habit, StoreError> {
        // Timestamps come back at column precision (microseconds).
        let row = sqlx::query(&format!(
            "INSERT INTO habits (owner_id, title, behavior, created, last_modified) \
             VALUES ($1, $2, $3, $4, $4) RETURNING {HABIT_COLUMNS}"
        ))
        .bind(owner.get())
        .bind(draft.title())
        .bind(draft.behavior())
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_habit", e))?;

        habit_from_row(&row)
    }

    #[instrument(skip(self), fields(owner = %owner), err)]
    async fn list_by_owner(&self, owner: PersonId) -> Result<Vec<Habit>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {HABIT_COLUMNS} FROM habits WHERE owner_id = $1 ORDER BY created DESC, id DESC"
        ))
        .bind(owner.get())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_habits", e))?;

        rows.iter().map(habit_from_row).collect()
    }

    #[instrument(skip(self), fields(owner = %owner, habit_id = %id), err)]
    async fn get(&self, owner: PersonId, id: HabitId) -> Result<Option<Habit>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {HABIT_COLUMNS} FROM habits WHERE id = $1 AND owner_id = $2"
        ))
        .bind(id.get())
        .bind(owner.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_habit", e))?;

        row.as_ref().map(habit_from_row).transpose()
    }

    #[instrument(skip(self), fields(owner = %owner, habit_id = %id), err)]
    async fn touch(
        &self,
        owner: PersonId,
        id: HabitId,
        now: DateTime<Utc>,
    ) -> Result<Option<Habit>, StoreError> {
        let row = sqlx::query(&format!(
            "UPDATE habits SET last_modified = $3 WHERE id = $1 AND owner_id = $2 RETURNING {HABIT_COLUMNS}"
        ))
        .bind(id.get())
        .bind(owner.get())
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("touch_habit", e))?;

        row.as_ref().map(habit_from_row).transpose()
    }
}

fn person_from_row(row: &PgRow) -> Result<Person, StoreError> {
    let id: i64 = row.try_get("id").map_err(|e| map_sqlx_error("decode_person", e))?;
    let user_id: String = row
        .try_get("user_id")
        .map_err(|e| map_sqlx_error("decode_person", e))?;
    let user_id = ExternalUserId::new(user_id)
        .map_err(|e| StoreError::Storage(format!("corrupt person row {id}: {e}")))?;

    Ok(Person::new(PersonId::new(id), user_id))
}

fn habit_from_row(row: &PgRow) -> Result<Habit, StoreError> {
    let decode = |e: sqlx::Error| map_sqlx_error("decode_habit", e);

    Ok(Habit {
        id: HabitId::new(row.try_get("id").map_err(decode)?),
        owner: PersonId::new(row.try_get("owner_id").map_err(decode)?),
        title: row.try_get("title").map_err(decode)?,
        behavior: row.try_get("behavior").map_err(decode)?,
        created: row.try_get("created").map_err(decode)?,
        last_modified: row.try_get("last_modified").map_err(decode)?,
    })
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                // Unique / foreign key violation
                Some("23505") | Some("23503") => StoreError::Conflict(msg),
                _ => StoreError::Storage(msg),
            }
        }
        sqlx::Error::PoolClosed => {
            StoreError::Storage(format!("connection pool closed in {}", operation))
        }
        _ => StoreError::Storage(format!("sqlx error in {}: {}", operation, err)),
    }
}
