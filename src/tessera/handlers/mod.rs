pub mod health;
pub use self::health::health;

pub mod register;
pub use self::register::register;

pub mod login;
pub use self::login::login;

// common types for the handlers
use crate::auth::{AuthError, Backend, CredentialService, ErrorKind, Subject};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::error;
use utoipa::ToSchema;

pub type Service = CredentialService<Backend>;

/// Request body for both `/register` and `/login`.
#[derive(ToSchema, Serialize, Deserialize, Default)]
pub struct Credentials {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct AuthResponse {
    message: String,
    subject: Subject,
}

impl AuthResponse {
    fn new(message: &str, subject: Subject) -> Self {
        Self {
            message: message.to_string(),
            subject,
        }
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    error: String,
    kind: String,
}

#[must_use]
pub const fn status_code(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
        ErrorKind::UserNotFound => StatusCode::NOT_FOUND,
        ErrorKind::InvalidCredentials => StatusCode::UNAUTHORIZED,
        ErrorKind::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::StoreInconsistent | ErrorKind::Hashing => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let status = status_code(kind);

        // Store and hashing details are for operators, not callers.
        let message = if status.is_server_error() {
            error!("{}: {}", kind.as_str(), self);
            match kind {
                ErrorKind::StoreUnavailable => "Service unavailable".to_string(),
                ErrorKind::StoreInconsistent => "Failed to create user".to_string(),
                _ => "Internal server error".to_string(),
            }
        } else {
            self.to_string()
        };

        let body = ErrorResponse {
            error: message,
            kind: kind.as_str().to_string(),
        };

        (status, Json(body)).into_response()
    }
}

fn missing_payload() -> Response {
    AuthError::InvalidInput("missing email or password").into_response()
}
