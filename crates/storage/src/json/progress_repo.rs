use async_trait::async_trait;
use tracing::warn;

use tracker_core::model::ProgressDocument;

use super::JsonRepository;
use super::io::{ReadOutcome, read_json, write_json};
use crate::repository::{ProgressRepository, StorageError};

#[async_trait]
impl ProgressRepository for JsonRepository {
    async fn load_document(
        &self,
        username: &str,
    ) -> Result<Option<ProgressDocument>, StorageError> {
        let path = self.paths().progress_file(username);
        match read_json(&path).await? {
            ReadOutcome::Value(document) => Ok(Some(document)),
            ReadOutcome::Missing => Ok(None),
            ReadOutcome::Corrupt(reason) => {
                // Reported as absent so the service rebuilds the document
                // once; the broken file stays until that rebuild saves.
                warn!(
                    path = %path.display(),
                    %reason,
                    "progress document unparsable, treating as missing"
                );
                Ok(None)
            }
        }
    }

    async fn save_document(
        &self,
        username: &str,
        document: &ProgressDocument,
    ) -> Result<(), StorageError> {
        write_json(&self.paths().progress_file(username), document).await
    }
}
