use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use tracing::{info, warn};

use storage::repository::{CredentialRepository, StorageError, UploadRepository};
use tracker_core::model::{RegistrationDraft, UserAccount};

use crate::Clock;
use crate::error::AuthError;
use crate::progress_service::ProgressService;

/// Registration and login over the credential store.
///
/// Registering also materializes the user's progress document and upload
/// directory, so a fresh login always lands on a fully populated dashboard.
#[derive(Clone)]
pub struct AuthService {
    clock: Clock,
    credentials: Arc<dyn CredentialRepository>,
    uploads: Arc<dyn UploadRepository>,
    progress: Arc<ProgressService>,
}

impl AuthService {
    #[must_use]
    pub fn new(
        clock: Clock,
        credentials: Arc<dyn CredentialRepository>,
        uploads: Arc<dyn UploadRepository>,
        progress: Arc<ProgressService>,
    ) -> Self {
        Self {
            clock,
            credentials,
            uploads,
            progress,
        }
    }

    /// Register a new account and set up its per-user state.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` for form problems (password mismatch,
    /// missing fields), `AuthError::UsernameTaken` for a duplicate username,
    /// and `AuthError::Storage` for persistence failures.
    pub async fn register(&self, draft: RegistrationDraft) -> Result<(), AuthError> {
        let registration = draft.validate()?;

        let account = UserAccount {
            password_hash: hash_password(&registration.password)?,
            name: registration.name,
            created_at: self.clock.now(),
        };
        match self
            .credentials
            .insert_account(&registration.username, &account)
            .await
        {
            Ok(()) => {}
            Err(StorageError::Conflict) => return Err(AuthError::UsernameTaken),
            Err(err) => return Err(err.into()),
        }

        // Per-user state: a progress document with every catalog algorithm
        // at defaults, and an empty upload directory.
        self.progress.load(&registration.username).await?;
        self.uploads.ensure_user_dir(&registration.username).await?;

        info!(username = %registration.username, "registered new user");
        Ok(())
    }

    /// Check a password against the stored hash.
    ///
    /// Unknown usernames and malformed stored hashes both come back as
    /// `Ok(false)`; only storage access problems are errors.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the credential store cannot be read.
    pub async fn login(&self, username: &str, password: &str) -> Result<bool, AuthError> {
        let Some(account) = self.credentials.get_account(username).await? else {
            return Ok(false);
        };
        let parsed_hash = match PasswordHash::new(&account.password_hash) {
            Ok(hash) => hash,
            Err(err) => {
                warn!(username, %err, "stored password hash does not parse");
                return Ok(false);
            }
        };
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// The display name stored at registration; `Ok(None)` for an unknown
    /// username.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the credential store cannot be read.
    pub async fn display_name(&self, username: &str) -> Result<Option<String>, AuthError> {
        let account = self.credentials.get_account(username).await?;
        Ok(account.map(|a| a.name))
    }
}

fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::Hashing)
}
