//! Shared error types for the services crate.

use thiserror::Error;

use storage::json::JsonInitError;
use storage::repository::StorageError;
use tracker_core::model::RegistrationError;

/// Errors emitted by `AuthService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error(transparent)]
    Validation(#[from] RegistrationError),

    #[error("Username already exists")]
    UsernameTaken,

    #[error("password hashing failed")]
    Hashing,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `ProgressService` and `CatalogService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<ProgressError> for AuthError {
    fn from(err: ProgressError) -> Self {
        match err {
            ProgressError::Storage(storage) => AuthError::Storage(storage),
        }
    }
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Init(#[from] JsonInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<ProgressError> for AppServicesError {
    fn from(err: ProgressError) -> Self {
        match err {
            ProgressError::Storage(storage) => AppServicesError::Storage(storage),
        }
    }
}
