use crate::{
    auth::{Backend, CredentialService, HasherConfig, MemoryStore, PgStore, ServiceConfig},
    tessera,
};
use anyhow::{anyhow, Context, Result};
use std::sync::Arc;
use tracing::{info, warn};
use url::Url;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub hasher: HasherConfig,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the store cannot be opened, the hashing parameters are
/// invalid, or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let backend = connect(&args.dsn).await?;

    info!(
        "Using {} credential store, argon2 m={} t={} p={}",
        backend.name(),
        args.hasher.memory_kib(),
        args.hasher.iterations(),
        args.hasher.parallelism()
    );

    let service = CredentialService::new(&ServiceConfig::new(args.hasher), backend)
        .context("Invalid password hashing parameters")?;

    tessera::new(args.port, Arc::new(service)).await
}

async fn connect(dsn: &str) -> Result<Backend> {
    let url = Url::parse(dsn).context("Invalid DSN")?;

    match url.scheme() {
        "memory" => {
            warn!("Credentials are kept in memory and lost on exit");

            Ok(Backend::Memory(MemoryStore::new()))
        }
        "postgres" | "postgresql" => {
            let store = PgStore::connect(dsn)
                .await
                .context("Failed to connect to database")?;

            Ok(Backend::Postgres(store))
        }
        scheme => Err(anyhow!("Unsupported DSN scheme: {scheme}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_dsn_selects_memory_store() -> Result<()> {
        let backend = connect("memory://").await?;
        assert_eq!(backend.name(), "memory");
        Ok(())
    }

    #[tokio::test]
    async fn unsupported_scheme_is_rejected() {
        let err = connect("mysql://localhost/tessera").await.err();
        assert!(err.is_some_and(|e| e.to_string().contains("Unsupported DSN scheme: mysql")));
    }

    #[tokio::test]
    async fn garbage_dsn_is_rejected() {
        assert!(connect("not a dsn").await.is_err());
    }
}
