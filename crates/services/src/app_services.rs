use std::sync::Arc;

use storage::json::StoragePaths;
use storage::repository::Storage;

use crate::Clock;
use crate::auth_service::AuthService;
use crate::catalog_service::CatalogService;
use crate::error::AppServicesError;
use crate::progress_service::ProgressService;

/// Assembles the app-facing services over a storage backend.
#[derive(Clone)]
pub struct AppServices {
    catalog: CatalogService,
    auth: Arc<AuthService>,
    progress: Arc<ProgressService>,
}

impl AppServices {
    /// Build services backed by JSON files under the given layout.
    ///
    /// The catalog is loaded (and self-healed) here, before any service
    /// touches it.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or the catalog
    /// load fails.
    pub async fn new_json_files(
        paths: StoragePaths,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::json_files(paths).await?;
        Self::from_storage(storage, clock).await
    }

    /// Build services over in-memory storage, for tests and prototyping.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the catalog load fails.
    pub async fn new_in_memory(clock: Clock) -> Result<Self, AppServicesError> {
        Self::from_storage(Storage::in_memory(), clock).await
    }

    /// Wire services over an already-constructed storage backend.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the catalog load fails.
    pub async fn from_storage(storage: Storage, clock: Clock) -> Result<Self, AppServicesError> {
        let catalog = CatalogService::load(storage.catalog.as_ref()).await?;

        let progress = Arc::new(ProgressService::new(
            clock,
            catalog.catalog(),
            Arc::clone(&storage.progress),
            Arc::clone(&storage.uploads),
        ));
        let auth = Arc::new(AuthService::new(
            clock,
            Arc::clone(&storage.credentials),
            Arc::clone(&storage.uploads),
            Arc::clone(&progress),
        ));

        Ok(Self {
            catalog,
            auth,
            progress,
        })
    }

    #[must_use]
    pub fn catalog(&self) -> &CatalogService {
        &self.catalog
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracker_core::time::fixed_clock;

    #[tokio::test]
    async fn in_memory_wiring_serves_the_builtin_catalog() {
        let services = AppServices::new_in_memory(fixed_clock()).await.unwrap();
        assert_eq!(services.catalog().catalog().len(), 2);
    }
}
