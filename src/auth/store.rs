//! Store adapter contract and the in-memory implementation.

use std::{collections::HashMap, future::Future, sync::Arc};
use tokio::sync::RwLock;
use tracing::debug;

use super::{
    error::StoreError,
    postgres::PgStore,
    types::{Credential, Email, PasswordHash, UserId},
};

/// Upsert-by-email and lookup-by-email over a persistent store.
///
/// `upsert` is the atomicity boundary for concurrent registrations of the
/// same email: implementations must never lose an update or hand out two ids
/// for one email.
pub trait CredentialStore: Send + Sync {
    /// Insert a credential for an unseen email, otherwise overwrite its hash.
    /// Returns the (possibly pre-existing) user id.
    fn upsert(
        &self,
        email: &Email,
        password_hash: &PasswordHash,
    ) -> impl Future<Output = Result<UserId, StoreError>> + Send;

    fn find_by_email(
        &self,
        email: &Email,
    ) -> impl Future<Output = Result<Option<Credential>, StoreError>> + Send;

    /// Cheap reachability probe used by health checks.
    fn ping(&self) -> impl Future<Output = Result<(), StoreError>> + Send {
        async { Ok(()) }
    }
}

/// Credentials kept in process memory, keyed by exact email.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Arc<RwLock<HashMap<Email, Credential>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

impl CredentialStore for MemoryStore {
    async fn upsert(&self, email: &Email, password_hash: &PasswordHash) -> Result<UserId, StoreError> {
        let mut records = self.records.write().await;

        let credential = records
            .entry(email.clone())
            .and_modify(|credential| credential.set_password_hash(password_hash.clone()))
            .or_insert_with(|| Credential::new(UserId::new(), email.clone(), password_hash.clone()));

        debug!("memory upsert for {}", email);

        Ok(credential.id())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Credential>, StoreError> {
        Ok(self.records.read().await.get(email).cloned())
    }
}

/// Store selected at startup from the DSN scheme.
#[derive(Debug, Clone)]
pub enum Backend {
    Postgres(PgStore),
    Memory(MemoryStore),
}

impl Backend {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgresql",
            Self::Memory(_) => "memory",
        }
    }
}

impl CredentialStore for Backend {
    async fn upsert(&self, email: &Email, password_hash: &PasswordHash) -> Result<UserId, StoreError> {
        match self {
            Self::Postgres(store) => store.upsert(email, password_hash).await,
            Self::Memory(store) => store.upsert(email, password_hash).await,
        }
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Credential>, StoreError> {
        match self {
            Self::Postgres(store) => store.find_by_email(email).await,
            Self::Memory(store) => store.find_by_email(email).await,
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        match self {
            Self::Postgres(store) => store.ping().await,
            Self::Memory(store) => store.ping().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    fn hash(value: &str) -> Result<PasswordHash> {
        Ok(PasswordHash::new(value)?)
    }

    #[tokio::test]
    async fn upsert_keeps_id_and_replaces_hash() -> Result<()> {
        let store = MemoryStore::new();
        let email = Email::new("a@x.com")?;

        let first = store.upsert(&email, &hash("$argon2id$one")?).await?;
        let second = store.upsert(&email, &hash("$argon2id$two")?).await?;

        assert_eq!(first, second);
        assert_eq!(store.len().await, 1);

        let record = store.find_by_email(&email).await?;
        assert_eq!(
            record.map(|r| r.password_hash().as_str().to_string()),
            Some("$argon2id$two".to_string())
        );
        Ok(())
    }

    #[tokio::test]
    async fn different_emails_get_different_ids() -> Result<()> {
        let store = MemoryStore::new();
        let a = store.upsert(&Email::new("a@x.com")?, &hash("$h")?).await?;
        let b = store.upsert(&Email::new("b@x.com")?, &hash("$h")?).await?;
        assert_ne!(a, b);
        Ok(())
    }

    #[tokio::test]
    async fn lookup_is_case_sensitive() -> Result<()> {
        let store = MemoryStore::new();
        store.upsert(&Email::new("a@x.com")?, &hash("$h")?).await?;
        assert!(store.find_by_email(&Email::new("A@x.com")?).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_upserts_converge() -> Result<()> {
        let store = MemoryStore::new();
        let email = Email::new("race@x.com")?;

        let mut tasks = Vec::new();
        for n in 0..32 {
            let store = store.clone();
            let email = email.clone();
            let hash = hash(&format!("$argon2id${n}"))?;
            tasks.push(tokio::spawn(async move { store.upsert(&email, &hash).await }));
        }

        let mut ids = Vec::new();
        for task in tasks {
            ids.push(task.await??);
        }

        ids.dedup();
        assert_eq!(ids.len(), 1);
        assert_eq!(store.len().await, 1);
        Ok(())
    }

    #[tokio::test]
    async fn memory_backend_delegates() -> Result<()> {
        let backend = Backend::Memory(MemoryStore::new());
        assert_eq!(backend.name(), "memory");
        backend.ping().await?;

        let email = Email::new("a@x.com")?;
        let id = backend.upsert(&email, &hash("$h")?).await?;
        let found = backend.find_by_email(&email).await?;
        assert_eq!(found.map(|r| r.id()), Some(id));
        Ok(())
    }
}
