use async_trait::async_trait;
use tracing::{info, warn};

use tracker_core::model::Catalog;

use super::JsonRepository;
use super::io::{ReadOutcome, read_json, write_json};
use crate::repository::{CatalogRepository, StorageError};

#[async_trait]
impl CatalogRepository for JsonRepository {
    async fn load_catalog(&self) -> Result<Catalog, StorageError> {
        let path = self.paths().catalog_file();
        let catalog = match read_json::<Catalog>(&path).await? {
            ReadOutcome::Value(catalog) => catalog,
            ReadOutcome::Missing => {
                info!(path = %path.display(), "no catalog file, writing built-in default");
                let builtin = Catalog::builtin();
                write_json(&path, &builtin).await?;
                builtin
            }
            ReadOutcome::Corrupt(reason) => {
                // The unreadable original is overwritten, not backed up.
                warn!(path = %path.display(), %reason, "catalog unparsable, replacing with built-in default");
                let builtin = Catalog::builtin();
                write_json(&path, &builtin).await?;
                builtin
            }
        };

        for issue in catalog.lint() {
            warn!(%issue, "catalog entry problem (kept as-is)");
        }
        Ok(catalog)
    }
}
