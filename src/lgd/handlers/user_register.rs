use crate::{
    auth::{CredentialHasher, HashError},
    lgd::{
        handlers::{valid_email, UserProfile},
        users::{insert_user, user_exists, Insert},
    },
};
use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use sqlx::PgPool;
use tracing::{debug, error, instrument};
use utoipa::ToSchema;

#[derive(ToSchema, Deserialize)]
pub struct UserRegister {
    name: String,
    email: String,
    password: String,
}

impl std::fmt::Debug for UserRegister {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserRegister")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

#[utoipa::path(
    post,
    path= "/register",
    request_body = UserRegister,
    responses (
        (status = 201, description = "Registration successful", body = UserProfile, content_type = "application/json"),
        (status = 400, description = "Missing payload, invalid email, empty name or password", body = String),
        (status = 409, description = "Email already registered", body = String),
    ),
    tag= "auth"
)]
#[instrument(skip(pool, hasher))]
pub async fn register(
    pool: Extension<PgPool>,
    hasher: Extension<CredentialHasher>,
    payload: Option<Json<UserRegister>>,
) -> Response {
    let user: UserRegister = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    let name = user.name.trim().to_string();
    let email = user.email.trim().to_string();

    if name.is_empty() {
        return (StatusCode::BAD_REQUEST, "Invalid name".to_string()).into_response();
    }

    if !valid_email(&email) {
        return (StatusCode::BAD_REQUEST, "Invalid email".to_string()).into_response();
    }

    if user.password.is_empty() {
        return (StatusCode::BAD_REQUEST, "Invalid password".to_string()).into_response();
    }

    match user_exists(&pool, &email).await {
        Ok(true) => {
            debug!("Email already registered");
            return (StatusCode::CONFLICT, "Email already registered".to_string()).into_response();
        }
        Ok(false) => (),
        Err(e) => {
            error!("Error checking if user exists: {:?}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error checking if user exists".to_string(),
            )
                .into_response();
        }
    }

    let hasher = *hasher;
    let password = user.password;
    let credential = match tokio::task::spawn_blocking(move || hasher.hash(&password)).await {
        Ok(Ok(credential)) => credential,
        Ok(Err(HashError::EmptyPassword)) => {
            return (StatusCode::BAD_REQUEST, "Invalid password".to_string()).into_response();
        }
        Ok(Err(e)) => {
            error!("Error hashing password: {e}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error hashing password".to_string(),
            )
                .into_response();
        }
        Err(e) => {
            error!("Password hashing task failed: {e}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error hashing password".to_string(),
            )
                .into_response();
        }
    };

    match insert_user(&pool, &name, &email, &credential).await {
        Ok(Insert::Created(id)) => {
            debug!("User created: {id}");

            (StatusCode::CREATED, Json(UserProfile { id, name, email })).into_response()
        }
        Ok(Insert::EmailTaken) => {
            (StatusCode::CONFLICT, "Email already registered".to_string()).into_response()
        }
        Err(e) => {
            error!("Error inserting user: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error inserting user".to_string(),
            )
                .into_response()
        }
    }
}
