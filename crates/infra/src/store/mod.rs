//! Owner-scoped storage for people and habits.
//!
//! Every habit read or write takes the owning [`hipnosis_core::PersonId`], and
//! every backend filters on it; no method can reach another person's habits.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryStore;
pub use postgres::PostgresStore;
pub use r#trait::{HabitStore, PersonStore, StoreError};
