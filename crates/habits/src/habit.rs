use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use hipnosis_core::{DomainError, DomainResult, HabitId, PersonId};

/// User-facing message for a submission missing its title or behavior.
pub const MISSING_FIELDS_MESSAGE: &str = "title and behavior, please!";

/// A stored habit.
///
/// `owner` is fixed at creation; `created` never changes after insert and
/// `last_modified` is refreshed by every write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub id: HabitId,
    pub owner: PersonId,
    pub title: String,
    pub behavior: String,
    pub created: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

/// Validated input for a new habit.
///
/// Construction is the only way to get one, so a store never sees a blank
/// title or behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitDraft {
    title: String,
    behavior: String,
}

impl HabitDraft {
    /// Trim both fields and reject the submission if either ends up empty.
    pub fn new(title: &str, behavior: &str) -> DomainResult<Self> {
        let title = title.trim();
        let behavior = behavior.trim();

        if title.is_empty() || behavior.is_empty() {
            return Err(DomainError::validation(MISSING_FIELDS_MESSAGE));
        }

        Ok(Self {
            title: title.to_string(),
            behavior: behavior.to_string(),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn behavior(&self) -> &str {
        &self.behavior
    }

    /// Materialize the draft as a habit owned by `owner`, stamped at `now`.
    pub fn into_habit(self, id: HabitId, owner: PersonId, now: DateTime<Utc>) -> Habit {
        Habit {
            id,
            owner,
            title: self.title,
            behavior: self.behavior,
            created: now,
            last_modified: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_trims_fields() {
        let draft = HabitDraft::new("  Exercise ", "\n30 minutes\nevery morning\n").unwrap();
        assert_eq!(draft.title(), "Exercise");
        assert_eq!(draft.behavior(), "30 minutes\nevery morning");
    }

    #[test]
    fn draft_rejects_missing_title() {
        let err = HabitDraft::new("", "do something").unwrap_err();
        assert_eq!(err, DomainError::Validation(MISSING_FIELDS_MESSAGE.to_string()));
    }

    #[test]
    fn draft_rejects_blank_behavior() {
        let err = HabitDraft::new("Read", " \t ").unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn into_habit_stamps_both_timestamps() {
        let now = Utc::now();
        let habit = HabitDraft::new("Read", "20 pages")
            .unwrap()
            .into_habit(HabitId::new(1), PersonId::new(9), now);

        assert_eq!(habit.owner, PersonId::new(9));
        assert_eq!(habit.created, now);
        assert_eq!(habit.last_modified, now);
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 500,
                ..ProptestConfig::default()
            })]

            /// Property: any title/behavior with visible content is accepted, trimmed.
            #[test]
            fn non_blank_input_is_accepted(
                title in "\\s{0,3}[A-Za-z0-9][A-Za-z0-9 ]{0,40}\\s{0,3}",
                behavior in "\\s{0,3}[A-Za-z0-9][A-Za-z0-9 \n]{0,200}\\s{0,3}"
            ) {
                let draft = HabitDraft::new(&title, &behavior).unwrap();
                prop_assert_eq!(draft.title(), title.trim());
                prop_assert_eq!(draft.behavior(), behavior.trim());
            }

            /// Property: whitespace-only fields always fail with the user-facing message.
            #[test]
            fn blank_field_is_rejected(
                blank in "\\s{0,10}",
                other in "[A-Za-z]{1,20}"
            ) {
                let expected = DomainError::Validation(MISSING_FIELDS_MESSAGE.to_string());
                prop_assert_eq!(HabitDraft::new(&blank, &other).unwrap_err(), expected.clone());
                prop_assert_eq!(HabitDraft::new(&other, &blank).unwrap_err(), expected);
            }
        }
    }
}
