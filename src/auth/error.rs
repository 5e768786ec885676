use thiserror::Error;

use super::types::RecordError;

/// Failure reported by a [`CredentialStore`](super::store::CredentialStore).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("write committed but identity read-back returned no row")]
    Inconsistent,
    #[error("stored record is invalid: {0}")]
    Corrupt(#[from] RecordError),
}

/// Stable error codes surfaced to callers and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    UserNotFound,
    InvalidCredentials,
    StoreUnavailable,
    StoreInconsistent,
    Hashing,
}

impl ErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidInput => "INVALID_INPUT",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::StoreUnavailable => "STORE_UNAVAILABLE",
            Self::StoreInconsistent => "STORE_INCONSISTENT",
            Self::Hashing => "HASHING_FAILED",
        }
    }
}

/// Terminal outcome of a failed register or login.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    #[error("user not found")]
    UserNotFound,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("store inconsistent: write committed but identity was not readable")]
    StoreInconsistent,
    #[error("password hashing failed: {0}")]
    Hashing(String),
}

impl AuthError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::UserNotFound => ErrorKind::UserNotFound,
            Self::InvalidCredentials => ErrorKind::InvalidCredentials,
            Self::StoreUnavailable(_) => ErrorKind::StoreUnavailable,
            Self::StoreInconsistent => ErrorKind::StoreInconsistent,
            Self::Hashing(_) => ErrorKind::Hashing,
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(message) => Self::StoreUnavailable(message),
            StoreError::Inconsistent => Self::StoreInconsistent,
            StoreError::Corrupt(err) => Self::StoreUnavailable(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_distinct_kinds() {
        let unavailable = AuthError::from(StoreError::Unavailable("connection refused".into()));
        let inconsistent = AuthError::from(StoreError::Inconsistent);

        assert_eq!(unavailable.kind(), ErrorKind::StoreUnavailable);
        assert_eq!(inconsistent.kind(), ErrorKind::StoreInconsistent);
        assert_ne!(unavailable.kind(), inconsistent.kind());
    }

    #[test]
    fn kind_codes_are_stable() {
        assert_eq!(ErrorKind::InvalidInput.as_str(), "INVALID_INPUT");
        assert_eq!(ErrorKind::UserNotFound.as_str(), "USER_NOT_FOUND");
        assert_eq!(ErrorKind::InvalidCredentials.as_str(), "INVALID_CREDENTIALS");
        assert_eq!(ErrorKind::StoreUnavailable.as_str(), "STORE_UNAVAILABLE");
        assert_eq!(ErrorKind::StoreInconsistent.as_str(), "STORE_INCONSISTENT");
    }
}
