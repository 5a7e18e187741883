use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use thiserror::Error;
use tracker_core::model::{Catalog, ProgressDocument, UserAccount};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("io error: {0}")]
    Io(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Derives the stored filename for an uploaded implementation.
///
/// Spaces become underscores and the extension is fixed; the result is a
/// basename with no directory component.
#[must_use]
pub fn implementation_filename(algo_name: &str) -> String {
    format!("{}.py", algo_name.replace(' ', "_"))
}

/// Read access to the algorithm catalog.
///
/// `load_catalog` self-heals: a missing or unreadable backing file is
/// replaced with the built-in default catalog rather than surfaced as an
/// error.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Load the catalog, creating or repairing the backing store if needed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` only when reading or rewriting the backing
    /// store fails outright.
    async fn load_catalog(&self) -> Result<Catalog, StorageError>;
}

/// Repository contract for user accounts, keyed by case-sensitive username.
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    /// Fetch one account; `Ok(None)` for an unknown username.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the account store cannot be read.
    async fn get_account(&self, username: &str) -> Result<Option<UserAccount>, StorageError>;

    /// Store a new account.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` when the username is already taken,
    /// or other storage errors.
    async fn insert_account(
        &self,
        username: &str,
        account: &UserAccount,
    ) -> Result<(), StorageError>;

    /// All accounts, for diagnostics and tests.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the account store cannot be read.
    async fn list_accounts(&self) -> Result<BTreeMap<String, UserAccount>, StorageError>;
}

/// Repository contract for per-user progress documents.
///
/// Documents are read and written whole; the last writer wins. A document
/// that exists but cannot be parsed is reported as absent so the caller can
/// rebuild it once — a failing rebuild write then surfaces as an error
/// instead of recursing.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Fetch a user's document; `Ok(None)` when missing or unparsable.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the underlying read fails.
    async fn load_document(&self, username: &str)
        -> Result<Option<ProgressDocument>, StorageError>;

    /// Replace a user's document in full.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the document cannot be written.
    async fn save_document(
        &self,
        username: &str,
        document: &ProgressDocument,
    ) -> Result<(), StorageError>;
}

/// Byte storage for uploaded implementation files, one directory per user.
#[async_trait]
pub trait UploadRepository: Send + Sync {
    /// Create the user's upload directory if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the directory cannot be created.
    async fn ensure_user_dir(&self, username: &str) -> Result<(), StorageError>;

    /// Write `bytes` verbatim for the given algorithm, overwriting any prior
    /// upload, and return the stored basename.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the file cannot be written.
    async fn store_implementation(
        &self,
        username: &str,
        algo_name: &str,
        bytes: &[u8],
    ) -> Result<String, StorageError>;

    /// Read a stored upload back by basename.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` when the referenced file is gone,
    /// or other storage errors.
    async fn read_implementation(
        &self,
        username: &str,
        filename: &str,
    ) -> Result<Vec<u8>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone)]
pub struct InMemoryRepository {
    catalog: Arc<Mutex<Catalog>>,
    accounts: Arc<Mutex<BTreeMap<String, UserAccount>>>,
    documents: Arc<Mutex<HashMap<String, ProgressDocument>>>,
    uploads: Arc<Mutex<HashMap<(String, String), Vec<u8>>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::with_catalog(Catalog::builtin())
    }

    /// An in-memory repository serving the given catalog.
    #[must_use]
    pub fn with_catalog(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(Mutex::new(catalog)),
            accounts: Arc::new(Mutex::new(BTreeMap::new())),
            documents: Arc::new(Mutex::new(HashMap::new())),
            uploads: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Swap the served catalog, simulating an out-of-band catalog edit.
    pub fn replace_catalog(&self, catalog: Catalog) {
        if let Ok(mut guard) = self.catalog.lock() {
            *guard = catalog;
        }
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned(err: impl std::fmt::Display) -> StorageError {
    StorageError::Io(err.to_string())
}

#[async_trait]
impl CatalogRepository for InMemoryRepository {
    async fn load_catalog(&self) -> Result<Catalog, StorageError> {
        let guard = self.catalog.lock().map_err(poisoned)?;
        Ok(guard.clone())
    }
}

#[async_trait]
impl CredentialRepository for InMemoryRepository {
    async fn get_account(&self, username: &str) -> Result<Option<UserAccount>, StorageError> {
        let guard = self.accounts.lock().map_err(poisoned)?;
        Ok(guard.get(username).cloned())
    }

    async fn insert_account(
        &self,
        username: &str,
        account: &UserAccount,
    ) -> Result<(), StorageError> {
        let mut guard = self.accounts.lock().map_err(poisoned)?;
        if guard.contains_key(username) {
            return Err(StorageError::Conflict);
        }
        guard.insert(username.to_string(), account.clone());
        Ok(())
    }

    async fn list_accounts(&self) -> Result<BTreeMap<String, UserAccount>, StorageError> {
        let guard = self.accounts.lock().map_err(poisoned)?;
        Ok(guard.clone())
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn load_document(
        &self,
        username: &str,
    ) -> Result<Option<ProgressDocument>, StorageError> {
        let guard = self.documents.lock().map_err(poisoned)?;
        Ok(guard.get(username).cloned())
    }

    async fn save_document(
        &self,
        username: &str,
        document: &ProgressDocument,
    ) -> Result<(), StorageError> {
        let mut guard = self.documents.lock().map_err(poisoned)?;
        guard.insert(username.to_string(), document.clone());
        Ok(())
    }
}

#[async_trait]
impl UploadRepository for InMemoryRepository {
    async fn ensure_user_dir(&self, _username: &str) -> Result<(), StorageError> {
        Ok(())
    }

    async fn store_implementation(
        &self,
        username: &str,
        algo_name: &str,
        bytes: &[u8],
    ) -> Result<String, StorageError> {
        let filename = implementation_filename(algo_name);
        let mut guard = self.uploads.lock().map_err(poisoned)?;
        guard.insert((username.to_string(), filename.clone()), bytes.to_vec());
        Ok(filename)
    }

    async fn read_implementation(
        &self,
        username: &str,
        filename: &str,
    ) -> Result<Vec<u8>, StorageError> {
        let guard = self.uploads.lock().map_err(poisoned)?;
        guard
            .get(&(username.to_string(), filename.to_string()))
            .cloned()
            .ok_or(StorageError::NotFound)
    }
}

/// Aggregates the repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub catalog: Arc<dyn CatalogRepository>,
    pub credentials: Arc<dyn CredentialRepository>,
    pub progress: Arc<dyn ProgressRepository>,
    pub uploads: Arc<dyn UploadRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_in_memory(InMemoryRepository::new())
    }

    /// An in-memory storage serving the given catalog.
    #[must_use]
    pub fn in_memory_with_catalog(catalog: Catalog) -> Self {
        Self::from_in_memory(InMemoryRepository::with_catalog(catalog))
    }

    fn from_in_memory(repo: InMemoryRepository) -> Self {
        let catalog: Arc<dyn CatalogRepository> = Arc::new(repo.clone());
        let credentials: Arc<dyn CredentialRepository> = Arc::new(repo.clone());
        let progress: Arc<dyn ProgressRepository> = Arc::new(repo.clone());
        let uploads: Arc<dyn UploadRepository> = Arc::new(repo);
        Self {
            catalog,
            credentials,
            progress,
            uploads,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracker_core::time::fixed_now;

    fn account() -> UserAccount {
        UserAccount {
            password_hash: "$argon2id$stub".to_string(),
            name: "Ada".to_string(),
            created_at: fixed_now(),
        }
    }

    #[test]
    fn implementation_filename_replaces_spaces() {
        assert_eq!(
            implementation_filename("Linear Regression"),
            "Linear_Regression.py"
        );
        assert_eq!(implementation_filename("PCA"), "PCA.py");
    }

    #[tokio::test]
    async fn duplicate_insert_is_a_conflict() {
        let repo = InMemoryRepository::new();
        repo.insert_account("ada", &account()).await.unwrap();

        let err = repo.insert_account("ada", &account()).await.unwrap_err();
        assert!(matches!(err, StorageError::Conflict));
    }

    #[tokio::test]
    async fn usernames_are_case_sensitive() {
        let repo = InMemoryRepository::new();
        repo.insert_account("ada", &account()).await.unwrap();

        assert!(repo.get_account("Ada").await.unwrap().is_none());
        assert!(repo.get_account("ada").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn uploads_round_trip_and_overwrite() {
        let repo = InMemoryRepository::new();
        let name = repo
            .store_implementation("ada", "Linear Regression", b"v1")
            .await
            .unwrap();
        assert_eq!(name, "Linear_Regression.py");

        repo.store_implementation("ada", "Linear Regression", b"v2")
            .await
            .unwrap();
        let bytes = repo.read_implementation("ada", &name).await.unwrap();
        assert_eq!(bytes, b"v2");
    }

    #[tokio::test]
    async fn missing_upload_is_not_found() {
        let repo = InMemoryRepository::new();
        let err = repo
            .read_implementation("ada", "Missing.py")
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }
}
