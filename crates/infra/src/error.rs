use thiserror::Error;

use hipnosis_core::DomainError;

use crate::store::StoreError;

/// Error returned by the application services.
///
/// Domain failures are recoverable and shown to the user; store failures are
/// surfaced as a generic failure.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::Domain(DomainError::NotFound))
    }
}
