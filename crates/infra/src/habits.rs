//! Owner-scoped habit operations used by the HTTP layer.

use std::sync::Arc;

use chrono::Utc;

use hipnosis_core::{DomainError, HabitId};
use hipnosis_habits::{Habit, HabitDraft, Person};

use crate::error::ServiceError;
use crate::store::HabitStore;

/// Creates, lists and fetches habits on behalf of a resolved [`Person`].
#[derive(Clone)]
pub struct HabitService {
    habits: Arc<dyn HabitStore>,
}

impl HabitService {
    pub fn new(habits: Arc<dyn HabitStore>) -> Self {
        Self { habits }
    }

    /// Validate and persist a new habit for `owner`.
    ///
    /// A blank title or behavior fails with `Validation` before anything is
    /// written.
    pub async fn create(
        &self,
        owner: &Person,
        title: &str,
        behavior: &str,
    ) -> Result<HabitId, ServiceError> {
        let draft = HabitDraft::new(title, behavior)?;
        let habit = self.habits.insert(owner.id, draft, Utc::now()).await?;

        tracing::info!(person_id = %owner.id, habit_id = %habit.id, "habit created");
        Ok(habit.id)
    }

    /// Every habit of `owner`, most recently created first.
    pub async fn list_by_owner(&self, owner: &Person) -> Result<Vec<Habit>, ServiceError> {
        Ok(self.habits.list_by_owner(owner.id).await?)
    }

    /// The habit `habit_id` if `owner` owns it, otherwise `NotFound`.
    pub async fn get_by_id(&self, owner: &Person, habit_id: HabitId) -> Result<Habit, ServiceError> {
        self.habits
            .get(owner.id, habit_id)
            .await?
            .ok_or(ServiceError::Domain(DomainError::NotFound))
    }
}
