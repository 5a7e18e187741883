use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use crate::repository::{
    CatalogRepository, CredentialRepository, ProgressRepository, Storage, UploadRepository,
};

mod catalog_repo;
mod credential_repo;
mod io;
mod progress_repo;
mod upload_repo;

/// File layout for the JSON backend, derived from a single root directory:
///
/// ```text
/// <root>/data/users.json
/// <root>/data/user_progress/<username>.json
/// <root>/algorithms/algorithm_list.json
/// <root>/uploads/<username>/<file>.py
/// ```
#[derive(Debug, Clone)]
pub struct StoragePaths {
    root: PathBuf,
}

impl StoragePaths {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.root.join("data")
    }

    #[must_use]
    pub fn users_file(&self) -> PathBuf {
        self.data_dir().join("users.json")
    }

    #[must_use]
    pub fn progress_dir(&self) -> PathBuf {
        self.data_dir().join("user_progress")
    }

    #[must_use]
    pub fn progress_file(&self, username: &str) -> PathBuf {
        self.progress_dir().join(format!("{username}.json"))
    }

    #[must_use]
    pub fn catalog_file(&self) -> PathBuf {
        self.root.join("algorithms").join("algorithm_list.json")
    }

    #[must_use]
    pub fn uploads_dir(&self) -> PathBuf {
        self.root.join("uploads")
    }

    #[must_use]
    pub fn user_uploads_dir(&self, username: &str) -> PathBuf {
        self.uploads_dir().join(username)
    }
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum JsonInitError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Flat-file JSON storage backend.
///
/// Every read and write covers a whole document; there is no locking, so
/// correctness assumes a single active session per user.
#[derive(Clone)]
pub struct JsonRepository {
    paths: Arc<StoragePaths>,
}

impl JsonRepository {
    /// Open the backend at the given layout, creating the directory tree.
    ///
    /// # Errors
    ///
    /// Returns `JsonInitError` if a directory cannot be created.
    pub async fn open(paths: StoragePaths) -> Result<Self, JsonInitError> {
        tokio::fs::create_dir_all(paths.progress_dir()).await?;
        tokio::fs::create_dir_all(paths.uploads_dir()).await?;
        if let Some(catalog_dir) = paths.catalog_file().parent() {
            tokio::fs::create_dir_all(catalog_dir).await?;
        }
        Ok(Self {
            paths: Arc::new(paths),
        })
    }

    #[must_use]
    pub fn paths(&self) -> &StoragePaths {
        &self.paths
    }
}

impl Storage {
    /// Build a `Storage` backed by JSON files under the given layout.
    ///
    /// # Errors
    ///
    /// Returns `JsonInitError` if the directory tree cannot be created.
    pub async fn json_files(paths: StoragePaths) -> Result<Self, JsonInitError> {
        let repo = JsonRepository::open(paths).await?;
        let catalog: Arc<dyn CatalogRepository> = Arc::new(repo.clone());
        let credentials: Arc<dyn CredentialRepository> = Arc::new(repo.clone());
        let progress: Arc<dyn ProgressRepository> = Arc::new(repo.clone());
        let uploads: Arc<dyn UploadRepository> = Arc::new(repo);
        Ok(Self {
            catalog,
            credentials,
            progress,
            uploads,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<JsonRepository>();
    }

    #[test]
    fn paths_derive_from_root() {
        let paths = StoragePaths::new("/tmp/tracker");
        assert_eq!(paths.users_file(), PathBuf::from("/tmp/tracker/data/users.json"));
        assert_eq!(
            paths.progress_file("ada"),
            PathBuf::from("/tmp/tracker/data/user_progress/ada.json")
        );
        assert_eq!(
            paths.catalog_file(),
            PathBuf::from("/tmp/tracker/algorithms/algorithm_list.json")
        );
        assert_eq!(
            paths.user_uploads_dir("ada"),
            PathBuf::from("/tmp/tracker/uploads/ada")
        );
    }
}
