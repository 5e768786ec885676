use super::{missing_payload, AuthResponse, Credentials, ErrorResponse, Service};
use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use secrecy::SecretString;
use std::sync::Arc;
use tracing::{debug, instrument};

#[utoipa::path(
    post,
    path= "/register",
    request_body = Credentials,
    responses (
        (status = 200, description = "Credential created or replaced", body = AuthResponse, content_type = "application/json"),
        (status = 400, description = "Missing email or password", body = ErrorResponse),
        (status = 500, description = "Credential written but identity could not be read back", body = ErrorResponse),
        (status = 503, description = "Credential store unavailable", body = ErrorResponse),
    ),
    tag= "auth"
)]
// axum handler for register
#[instrument(skip(service, payload))]
pub async fn register(
    service: Extension<Arc<Service>>,
    payload: Option<Json<Credentials>>,
) -> Response {
    let Some(Json(credentials)) = payload else {
        return missing_payload();
    };

    debug!("register: {:?}", credentials);

    match service
        .register(&credentials.email, SecretString::from(credentials.password))
        .await
    {
        Ok(subject) => (
            StatusCode::OK,
            Json(AuthResponse::new("User registered", subject)),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}
