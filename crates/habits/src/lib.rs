//! Habits domain module (people and their habits).
//!
//! Plain data plus creation rules; no IO, no HTTP, no storage.

pub mod habit;
pub mod person;

pub use habit::{Habit, HabitDraft, MISSING_FIELDS_MESSAGE};
pub use person::Person;
