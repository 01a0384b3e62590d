use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::RwLock;

use chrono::{DateTime, Utc};

use hipnosis_auth::ExternalUserId;
use hipnosis_core::{HabitId, PersonId};
use hipnosis_habits::{Habit, HabitDraft, Person};

use super::r#trait::{HabitStore, PersonStore, StoreError};

#[derive(Debug, Default)]
struct State {
    persons: HashMap<ExternalUserId, Person>,
    person_ids: HashSet<PersonId>,
    habits: BTreeMap<HabitId, Habit>,
    last_person_id: i64,
    last_habit_id: i64,
}

impl State {
    fn has_person(&self, id: PersonId) -> bool {
        self.person_ids.contains(&id)
    }
}

/// In-memory store for people and habits.
///
/// Intended for tests/dev. Ids are assigned sequentially from 1, like the
/// `BIGSERIAL` columns of the Postgres schema.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> StoreError {
        StoreError::Storage("lock poisoned".to_string())
    }
}

#[async_trait::async_trait]
impl PersonStore for InMemoryStore {
    async fn find_or_create(&self, user_id: &ExternalUserId) -> Result<Person, StoreError> {
        // Lookup and insert happen under one write lock.
        let mut state = self.state.write().map_err(|_| Self::poisoned())?;

        if let Some(existing) = state.persons.get(user_id) {
            return Ok(existing.clone());
        }

        state.last_person_id += 1;
        let person = Person::new(PersonId::new(state.last_person_id), user_id.clone());
        state.person_ids.insert(person.id);
        state.persons.insert(user_id.clone(), person.clone());
        Ok(person)
    }

    async fn find_by_user_id(&self, user_id: &ExternalUserId) -> Result<Option<Person>, StoreError> {
        let state = self.state.read().map_err(|_| Self::poisoned())?;
        Ok(state.persons.get(user_id).cloned())
    }
}

#[async_trait::async_trait]
impl HabitStore for InMemoryStore {
    async fn insert(
        &self,
        owner: PersonId,
        draft: HabitDraft,
        now: DateTime<Utc>,
    ) -> Result<Habit, StoreError> {
        let mut state = self.state.write().map_err(|_| Self::poisoned())?;

        if !state.has_person(owner) {
            return Err(StoreError::Conflict(format!("unknown owner {owner}")));
        }

        state.last_habit_id += 1;
        let id = HabitId::new(state.last_habit_id);
        let habit = draft.into_habit(id, owner, now);
        state.habits.insert(id, habit.clone());
        Ok(habit)
    }

    async fn list_by_owner(&self, owner: PersonId) -> Result<Vec<Habit>, StoreError> {
        let state = self.state.read().map_err(|_| Self::poisoned())?;

        let mut habits: Vec<Habit> = state
            .habits
            .values()
            .filter(|h| h.owner == owner)
            .cloned()
            .collect();
        habits.sort_by(|a, b| b.created.cmp(&a.created).then(b.id.cmp(&a.id)));
        Ok(habits)
    }

    async fn get(&self, owner: PersonId, id: HabitId) -> Result<Option<Habit>, StoreError> {
        let state = self.state.read().map_err(|_| Self::poisoned())?;
        Ok(state.habits.get(&id).filter(|h| h.owner == owner).cloned())
    }

    async fn touch(
        &self,
        owner: PersonId,
        id: HabitId,
        now: DateTime<Utc>,
    ) -> Result<Option<Habit>, StoreError> {
        let mut state = self.state.write().map_err(|_| Self::poisoned())?;

        match state.habits.get_mut(&id) {
            Some(habit) if habit.owner == owner => {
                habit.last_modified = now;
                Ok(Some(habit.clone()))
            }
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn user(id: &str) -> ExternalUserId {
        ExternalUserId::new(id).unwrap()
    }

    fn draft(title: &str) -> HabitDraft {
        HabitDraft::new(title, "some behavior").unwrap()
    }

    #[tokio::test]
    async fn find_or_create_is_idempotent() {
        let store = InMemoryStore::new();

        let first = store.find_or_create(&user("alice")).await.unwrap();
        let second = store.find_or_create(&user("alice")).await.unwrap();
        let other = store.find_or_create(&user("bob")).await.unwrap();

        assert_eq!(first, second);
        assert_ne!(first.id, other.id);
        assert_eq!(store.find_by_user_id(&user("alice")).await.unwrap(), Some(first));
        assert_eq!(store.find_by_user_id(&user("carol")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn habits_are_owner_isolated() {
        let store = InMemoryStore::new();
        let alice = store.find_or_create(&user("alice")).await.unwrap();
        let bob = store.find_or_create(&user("bob")).await.unwrap();

        let habit = store.insert(bob.id, draft("Run"), Utc::now()).await.unwrap();

        // Can't read bob's habit as alice
        assert_eq!(store.get(alice.id, habit.id).await.unwrap(), None);
        assert!(store.list_by_owner(alice.id).await.unwrap().is_empty());

        assert_eq!(store.get(bob.id, habit.id).await.unwrap(), Some(habit));
    }

    #[tokio::test]
    async fn insert_requires_known_owner() {
        let store = InMemoryStore::new();
        let err = store
            .insert(PersonId::new(99), draft("Run"), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        // Only ids handed out by find_or_create count as owners.
        let alice = store.find_or_create(&user("alice")).await.unwrap();
        let bob = store.find_or_create(&user("bob")).await.unwrap();
        assert!(store.insert(alice.id, draft("Run"), Utc::now()).await.is_ok());
        assert!(store.insert(bob.id, draft("Swim"), Utc::now()).await.is_ok());
        let unknown = PersonId::new(bob.id.get() + 1);
        assert!(store.insert(unknown, draft("Row"), Utc::now()).await.is_err());
    }

    #[tokio::test]
    async fn list_is_newest_first_with_id_tiebreak() {
        let store = InMemoryStore::new();
        let alice = store.find_or_create(&user("alice")).await.unwrap();
        let t0 = Utc::now();

        let old = store.insert(alice.id, draft("Old"), t0 - Duration::days(1)).await.unwrap();
        let a = store.insert(alice.id, draft("A"), t0).await.unwrap();
        let b = store.insert(alice.id, draft("B"), t0).await.unwrap();

        let ids: Vec<HabitId> = store
            .list_by_owner(alice.id)
            .await
            .unwrap()
            .into_iter()
            .map(|h| h.id)
            .collect();
        assert_eq!(ids, vec![b.id, a.id, old.id]);
    }

    #[tokio::test]
    async fn touch_refreshes_last_modified_only_for_owner() {
        let store = InMemoryStore::new();
        let alice = store.find_or_create(&user("alice")).await.unwrap();
        let bob = store.find_or_create(&user("bob")).await.unwrap();

        let created_at = Utc::now();
        let habit = store.insert(alice.id, draft("Read"), created_at).await.unwrap();
        let later = created_at + Duration::minutes(5);

        assert_eq!(store.touch(bob.id, habit.id, later).await.unwrap(), None);

        let touched = store.touch(alice.id, habit.id, later).await.unwrap().unwrap();
        assert_eq!(touched.created, created_at);
        assert_eq!(touched.last_modified, later);
        assert_eq!(store.get(alice.id, habit.id).await.unwrap(), Some(touched));
    }
}
