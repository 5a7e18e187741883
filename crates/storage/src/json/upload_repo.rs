use async_trait::async_trait;

use super::JsonRepository;
use crate::repository::{StorageError, UploadRepository, implementation_filename};

fn io_err(err: std::io::Error) -> StorageError {
    StorageError::Io(err.to_string())
}

#[async_trait]
impl UploadRepository for JsonRepository {
    async fn ensure_user_dir(&self, username: &str) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(self.paths().user_uploads_dir(username))
            .await
            .map_err(io_err)
    }

    async fn store_implementation(
        &self,
        username: &str,
        algo_name: &str,
        bytes: &[u8],
    ) -> Result<String, StorageError> {
        self.ensure_user_dir(username).await?;
        let filename = implementation_filename(algo_name);
        let path = self.paths().user_uploads_dir(username).join(&filename);
        tokio::fs::write(&path, bytes).await.map_err(io_err)?;
        Ok(filename)
    }

    async fn read_implementation(
        &self,
        username: &str,
        filename: &str,
    ) -> Result<Vec<u8>, StorageError> {
        let path = self.paths().user_uploads_dir(username).join(filename);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound)
            }
            Err(err) => Err(io_err(err)),
        }
    }
}
