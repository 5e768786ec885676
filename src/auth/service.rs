//! Register and login orchestration.

use secrecy::{ExposeSecret, SecretString};
use tokio::task;
use tracing::{debug, error, instrument};

use super::{
    error::{AuthError, StoreError},
    hasher::{HashError, Hasher, HasherConfig},
    store::CredentialStore,
    subject::{Subject, SubjectIssuer, UserSubjectIssuer},
    types::{CredentialRequest, PasswordHash},
};

/// Construction-time settings for [`CredentialService`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServiceConfig {
    hasher: HasherConfig,
}

impl ServiceConfig {
    #[must_use]
    pub const fn new(hasher: HasherConfig) -> Self {
        Self { hasher }
    }

    #[must_use]
    pub const fn hasher(&self) -> &HasherConfig {
        &self.hasher
    }
}

impl From<HashError> for AuthError {
    fn from(err: HashError) -> Self {
        Self::Hashing(err.to_string())
    }
}

#[derive(Debug)]
pub struct CredentialService<S, I = UserSubjectIssuer> {
    store: S,
    hasher: Hasher,
    issuer: I,
}

impl<S: CredentialStore> CredentialService<S> {
    /// # Errors
    /// Returns [`AuthError::Hashing`] if the configured cost is invalid.
    pub fn new(config: &ServiceConfig, store: S) -> Result<Self, AuthError> {
        Self::with_issuer(config, store, UserSubjectIssuer)
    }
}

impl<S: CredentialStore, I: SubjectIssuer> CredentialService<S, I> {
    /// # Errors
    /// Returns [`AuthError::Hashing`] if the configured cost is invalid.
    pub fn with_issuer(config: &ServiceConfig, store: S, issuer: I) -> Result<Self, AuthError> {
        Ok(Self {
            store,
            hasher: Hasher::new(config.hasher())?,
            issuer,
        })
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Set or replace the credential for `email` and return its subject.
    ///
    /// Registering an email that already exists overwrites the stored hash
    /// and keeps the existing user id.
    ///
    /// # Errors
    /// `InvalidInput` for an empty field, `StoreUnavailable` or
    /// `StoreInconsistent` from the store, `Hashing` if argon2 fails.
    #[instrument(skip(self, password))]
    pub async fn register(&self, email: &str, password: SecretString) -> Result<Subject, AuthError> {
        let (email, password) = CredentialRequest::new(email, password)?.into_parts();

        let hash = self.hash(password).await?;

        let id = self.store.upsert(&email, &hash).await.map_err(|e| {
            error!("Error storing credential: {}", e);
            AuthError::from(e)
        })?;

        debug!("credential stored for {}", id);

        Ok(self.issuer.issue(id))
    }

    /// Verify `password` against the stored credential for `email`.
    ///
    /// # Errors
    /// `InvalidInput` for an empty field, `UserNotFound` if no usable
    /// credential exists, `InvalidCredentials` on a wrong password,
    /// `StoreUnavailable` from the store, `Hashing` for an unreadable hash.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: SecretString) -> Result<Subject, AuthError> {
        let (email, password) = CredentialRequest::new(email, password)?.into_parts();

        let record = match self.store.find_by_email(&email).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                debug!("User not found");
                return Err(AuthError::UserNotFound);
            }
            Err(StoreError::Corrupt(e)) => {
                debug!("Stored credential unusable: {}", e);
                return Err(AuthError::UserNotFound);
            }
            Err(e) => {
                error!("Error looking up credential: {}", e);
                return Err(e.into());
            }
        };

        if !self.verify(password, record.password_hash().clone()).await? {
            debug!("Invalid password");
            return Err(AuthError::InvalidCredentials);
        }

        Ok(self.issuer.issue(record.id()))
    }

    // argon2 is CPU-bound, keep it off the async workers.
    async fn hash(&self, password: SecretString) -> Result<PasswordHash, AuthError> {
        let hasher = self.hasher.clone();

        task::spawn_blocking(move || hasher.hash(password.expose_secret()))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))?
            .map_err(AuthError::from)
    }

    async fn verify(&self, password: SecretString, stored: PasswordHash) -> Result<bool, AuthError> {
        let hasher = self.hasher.clone();

        task::spawn_blocking(move || hasher.verify(password.expose_secret(), &stored))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))?
            .map_err(|e| {
                error!("Error verifying password: {}", e);
                AuthError::from(e)
            })
    }
}
