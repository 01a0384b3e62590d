use chrono::{DateTime, Utc};
use thiserror::Error;

use hipnosis_auth::ExternalUserId;
use hipnosis_core::{HabitId, PersonId};
use hipnosis_habits::{Habit, HabitDraft, Person};

/// Storage operation error.
///
/// These are infrastructure failures, as opposed to domain errors
/// (validation, not found).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A uniqueness or referential constraint rejected the write.
    #[error("constraint violated: {0}")]
    Conflict(String),

    /// Anything else: connectivity, poisoned locks, decoding.
    #[error("storage error: {0}")]
    Storage(String),
}

/// Person records, keyed by the identity provider's user id.
#[async_trait::async_trait]
pub trait PersonStore: Send + Sync {
    /// Return the person for `user_id`, inserting one if none exists.
    ///
    /// Must be atomic: concurrent first calls for the same `user_id` converge
    /// on a single record.
    async fn find_or_create(&self, user_id: &ExternalUserId) -> Result<Person, StoreError>;

    /// Look up a person without creating one.
    async fn find_by_user_id(&self, user_id: &ExternalUserId) -> Result<Option<Person>, StoreError>;
}

/// Habit records, always addressed through their owner.
#[async_trait::async_trait]
pub trait HabitStore: Send + Sync {
    /// Persist a validated draft under `owner` with `created = last_modified = now`.
    async fn insert(
        &self,
        owner: PersonId,
        draft: HabitDraft,
        now: DateTime<Utc>,
    ) -> Result<Habit, StoreError>;

    /// All habits of `owner`, newest first (`created` desc, then id desc).
    async fn list_by_owner(&self, owner: PersonId) -> Result<Vec<Habit>, StoreError>;

    /// The habit `id` if and only if it belongs to `owner`.
    async fn get(&self, owner: PersonId, id: HabitId) -> Result<Option<Habit>, StoreError>;

    /// Refresh `last_modified` of an owned habit. `None` if `owner` has no such habit.
    async fn touch(
        &self,
        owner: PersonId,
        id: HabitId,
        now: DateTime<Utc>,
    ) -> Result<Option<Habit>, StoreError>;
}
