#![forbid(unsafe_code)]

pub mod json;
pub mod repository;

pub use json::{JsonInitError, JsonRepository, StoragePaths};
pub use repository::{
    CatalogRepository, CredentialRepository, InMemoryRepository, ProgressRepository, Storage,
    StorageError, UploadRepository,
};
