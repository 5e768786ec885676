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
    path= "/login",
    request_body = Credentials,
    responses (
        (status = 200, description = "Login successful", body = AuthResponse, content_type = "application/json"),
        (status = 400, description = "Missing email or password", body = ErrorResponse),
        (status = 401, description = "Invalid password", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 503, description = "Credential store unavailable", body = ErrorResponse),
    ),
    tag= "auth"
)]
// axum handler for login
#[instrument(skip(service, payload))]
pub async fn login(
    service: Extension<Arc<Service>>,
    payload: Option<Json<Credentials>>,
) -> Response {
    let Some(Json(credentials)) = payload else {
        return missing_payload();
    };

    debug!("login: {:?}", credentials);

    match service
        .login(&credentials.email, SecretString::from(credentials.password))
        .await
    {
        Ok(subject) => {
            debug!("Login successful");

            (
                StatusCode::OK,
                Json(AuthResponse::new("Login successful", subject)),
            )
                .into_response()
        }
        Err(e) => e.into_response(),
    }
}
