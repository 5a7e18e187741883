use std::sync::Arc;

use storage::repository::CatalogRepository;
use tracker_core::model::{Catalog, CatalogEntry};

use crate::error::ProgressError;

/// Holds the catalog loaded once at startup.
///
/// The catalog is read-only configuration; edits to the backing file take
/// effect on the next launch, never mid-session.
#[derive(Clone)]
pub struct CatalogService {
    catalog: Arc<Catalog>,
}

impl CatalogService {
    /// Load the catalog through the repository's self-healing read.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` if the catalog store cannot be read
    /// or repaired.
    pub async fn load(repo: &dyn CatalogRepository) -> Result<Self, ProgressError> {
        let catalog = repo.load_catalog().await?;
        Ok(Self {
            catalog: Arc::new(catalog),
        })
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<Catalog> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn get(&self, algo_name: &str) -> Option<&CatalogEntry> {
        self.catalog.get(algo_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::InMemoryRepository;

    #[tokio::test]
    async fn load_serves_the_repository_catalog() {
        let repo = InMemoryRepository::new();
        let service = CatalogService::load(&repo).await.unwrap();

        assert_eq!(service.catalog().len(), 2);
        assert!(service.get("Linear Regression").is_some());
        assert!(service.get("Quantum Annealing").is_none());
    }
}
