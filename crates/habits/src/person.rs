use serde::{Deserialize, Serialize};

use hipnosis_auth::ExternalUserId;
use hipnosis_core::PersonId;

/// Local record of an externally authenticated user.
///
/// Root of the ownership tree: every habit belongs to exactly one person.
/// There is at most one person per `user_id`; records are never updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub user_id: ExternalUserId,
}

impl Person {
    pub fn new(id: PersonId, user_id: ExternalUserId) -> Self {
        Self { id, user_id }
    }
}
