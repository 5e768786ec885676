//! Credential lifecycle: hashing, storage, register/login and subject issuance.

pub mod error;
pub mod hasher;
pub mod postgres;
pub mod service;
pub mod store;
pub mod subject;
pub mod types;

pub use self::error::{AuthError, ErrorKind, StoreError};
pub use self::hasher::{Hasher, HasherConfig};
pub use self::postgres::PgStore;
pub use self::service::{CredentialService, ServiceConfig};
pub use self::store::{Backend, CredentialStore, MemoryStore};
pub use self::subject::{Subject, SubjectIssuer, SubjectKind, UserSubjectIssuer};
pub use self::types::{Credential, Email, PasswordHash, UserId};
