//! Maps an authenticated principal to its local `Person`.

use std::sync::Arc;

use hipnosis_auth::ExternalUserId;
use hipnosis_habits::Person;

use crate::error::ServiceError;
use crate::store::PersonStore;

/// Find-or-create of `Person` records by external user id.
#[derive(Clone)]
pub struct IdentityResolver {
    persons: Arc<dyn PersonStore>,
}

impl IdentityResolver {
    pub fn new(persons: Arc<dyn PersonStore>) -> Self {
        Self { persons }
    }

    /// Return the person for `external_user_id`, creating it on first sight.
    ///
    /// Repeated calls with the same id always yield the same person. An empty
    /// id is an `InvalidInput` error.
    pub async fn resolve_or_create(&self, external_user_id: &str) -> Result<Person, ServiceError> {
        let user_id = ExternalUserId::new(external_user_id)?;

        if let Some(person) = self.persons.find_by_user_id(&user_id).await? {
            return Ok(person);
        }

        // A concurrent first visit may have inserted the row in the meantime.
        let person = self.persons.find_or_create(&user_id).await?;
        tracing::debug!(person_id = %person.id, "person resolved after lookup miss");
        Ok(person)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;
    use hipnosis_core::DomainError;
    use std::collections::HashSet;

    #[tokio::test]
    async fn resolve_twice_yields_same_person() {
        let resolver = IdentityResolver::new(Arc::new(InMemoryStore::new()));

        let first = resolver.resolve_or_create("user-123").await.unwrap();
        let second = resolver.resolve_or_create("user-123").await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(first.user_id.as_str(), "user-123");

        let other = resolver.resolve_or_create("user-456").await.unwrap();
        assert_ne!(first.id, other.id);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn concurrent_first_visits_share_one_person() {
        let resolver = IdentityResolver::new(Arc::new(InMemoryStore::new()));

        let handles: Vec<_> = (0..64)
            .map(|_| {
                let resolver = resolver.clone();
                tokio::spawn(async move { resolver.resolve_or_create("u").await })
            })
            .collect();

        let mut ids = HashSet::new();
        for handle in handles {
            ids.insert(handle.await.unwrap().unwrap().id);
        }
        assert_eq!(ids.len(), 1);

        let again = resolver.resolve_or_create("u").await.unwrap();
        assert!(ids.contains(&again.id));
    }

    #[tokio::test]
    async fn empty_id_is_invalid_input() {
        let resolver = IdentityResolver::new(Arc::new(InMemoryStore::new()));

        let err = resolver.resolve_or_create("").await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::InvalidInput(_))));
    }
}
