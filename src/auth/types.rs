//! Typed records exchanged between the credential service and its store.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use super::error::AuthError;

/// Validation failure when building a record from raw values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("email must not be empty")]
    EmptyEmail,
    #[error("password hash must not be empty")]
    EmptyPasswordHash,
}

/// Stable identifier assigned by the store on first insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Fresh random identifier, for stores that do not generate their own.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for UserId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique credential key. Compared exactly as given, no case folding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// # Errors
    /// Returns [`RecordError::EmptyEmail`] for an empty string.
    pub fn new(value: impl Into<String>) -> Result<Self, RecordError> {
        let value = value.into();
        if value.is_empty() {
            return Err(RecordError::EmptyEmail);
        }
        Ok(Self(value))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// PHC-format string produced by the hasher.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// # Errors
    /// Returns [`RecordError::EmptyPasswordHash`] for an empty string.
    pub fn new(value: impl Into<String>) -> Result<Self, RecordError> {
        let value = value.into();
        if value.is_empty() {
            return Err(RecordError::EmptyPasswordHash);
        }
        Ok(Self(value))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Only the algorithm prefix is printed, the salt and digest stay out of logs.
impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let algorithm = self.0.split('$').nth(1).unwrap_or("unknown");
        write!(f, "PasswordHash(${algorithm}$...)")
    }
}

/// Persisted email to password-hash record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    id: UserId,
    email: Email,
    password_hash: PasswordHash,
}

impl Credential {
    #[must_use]
    pub const fn new(id: UserId, email: Email, password_hash: PasswordHash) -> Self {
        Self {
            id,
            email,
            password_hash,
        }
    }

    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    #[must_use]
    pub const fn email(&self) -> &Email {
        &self.email
    }

    #[must_use]
    pub const fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    pub(crate) fn set_password_hash(&mut self, password_hash: PasswordHash) {
        self.password_hash = password_hash;
    }
}

/// A validated email/password pair, shared by register and login.
pub struct CredentialRequest {
    email: Email,
    password: SecretString,
}

impl CredentialRequest {
    /// # Errors
    /// Returns [`AuthError::InvalidInput`] when either field is empty.
    pub fn new(email: &str, password: SecretString) -> Result<Self, AuthError> {
        let email = Email::new(email).map_err(|_| AuthError::InvalidInput("missing email"))?;

        if password.expose_secret().is_empty() {
            return Err(AuthError::InvalidInput("missing password"));
        }

        Ok(Self { email, password })
    }

    #[must_use]
    pub const fn email(&self) -> &Email {
        &self.email
    }

    #[must_use]
    pub fn into_parts(self) -> (Email, SecretString) {
        (self.email, self.password)
    }
}

impl fmt::Debug for CredentialRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_rejects_empty() {
        assert_eq!(Email::new(""), Err(RecordError::EmptyEmail));
        assert_eq!(Email::new("a@x.com").map(|e| e.to_string()), Ok("a@x.com".to_string()));
    }

    #[test]
    fn email_preserves_case() {
        let lower = Email::new("a@x.com");
        let upper = Email::new("A@x.com");
        assert_ne!(lower, upper);
    }

    #[test]
    fn password_hash_rejects_empty() {
        assert_eq!(PasswordHash::new(""), Err(RecordError::EmptyPasswordHash));
    }

    #[test]
    fn password_hash_debug_hides_digest() {
        let hash = PasswordHash::new("$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$ZGlnZXN0")
            .map(|hash| format!("{hash:?}"));
        assert_eq!(hash, Ok("PasswordHash($argon2id$...)".to_string()));
    }

    #[test]
    fn credential_request_requires_both_fields() {
        assert!(matches!(
            CredentialRequest::new("", SecretString::from("p")),
            Err(AuthError::InvalidInput(_))
        ));
        assert!(matches!(
            CredentialRequest::new("e@x.com", SecretString::from("")),
            Err(AuthError::InvalidInput(_))
        ));
        assert!(CredentialRequest::new("e@x.com", SecretString::from("p")).is_ok());
    }

    #[test]
    fn credential_request_debug_redacts_password() {
        let request = CredentialRequest::new("e@x.com", SecretString::from("hunter2"));
        let rendered = request.map(|r| format!("{r:?}")).unwrap_or_default();
        assert!(rendered.contains("e@x.com"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn user_id_serializes_as_plain_uuid() -> Result<(), serde_json::Error> {
        let uuid = Uuid::nil();
        let value = serde_json::to_value(UserId::from(uuid))?;
        assert_eq!(value, serde_json::json!("00000000-0000-0000-0000-000000000000"));
        Ok(())
    }
}
