use std::collections::BTreeMap;

use async_trait::async_trait;
use tracing::warn;

use tracker_core::model::UserAccount;

use super::JsonRepository;
use super::io::{ReadOutcome, read_json, write_json};
use crate::repository::{CredentialRepository, StorageError};

impl JsonRepository {
    /// Read the whole users map, rewriting a missing or broken file as the
    /// empty map.
    async fn load_users(&self) -> Result<BTreeMap<String, UserAccount>, StorageError> {
        let path = self.paths().users_file();
        match read_json(&path).await? {
            ReadOutcome::Value(users) => Ok(users),
            ReadOutcome::Missing => {
                let empty = BTreeMap::new();
                write_json(&path, &empty).await?;
                Ok(empty)
            }
            ReadOutcome::Corrupt(reason) => {
                warn!(path = %path.display(), %reason, "users file unparsable, resetting to empty");
                let empty = BTreeMap::new();
                write_json(&path, &empty).await?;
                Ok(empty)
            }
        }
    }
}

#[async_trait]
impl CredentialRepository for JsonRepository {
    async fn get_account(&self, username: &str) -> Result<Option<UserAccount>, StorageError> {
        let users = self.load_users().await?;
        Ok(users.get(username).cloned())
    }

    async fn insert_account(
        &self,
        username: &str,
        account: &UserAccount,
    ) -> Result<(), StorageError> {
        let mut users = self.load_users().await?;
        if users.contains_key(username) {
            return Err(StorageError::Conflict);
        }
        users.insert(username.to_string(), account.clone());
        write_json(&self.paths().users_file(), &users).await
    }

    async fn list_accounts(&self) -> Result<BTreeMap<String, UserAccount>, StorageError> {
        self.load_users().await
    }
}
