//! Infrastructure layer: storage backends and the services built on them.

pub mod db;
pub mod error;
pub mod habits;
pub mod identity;
pub mod store;

pub use error::ServiceError;
pub use habits::HabitService;
pub use identity::IdentityResolver;
