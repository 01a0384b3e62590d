use hipnosis_core::PersonId;
use hipnosis_habits::Person;

/// Resolved owner for a request.
///
/// Present only when the caller carried a valid token; every habit route
/// scopes its queries to this person.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerContext {
    person: Person,
}

impl OwnerContext {
    pub fn new(person: Person) -> Self {
        Self { person }
    }

    pub fn person(&self) -> &Person {
        &self.person
    }

    pub fn person_id(&self) -> PersonId {
        self.person.id
    }
}
