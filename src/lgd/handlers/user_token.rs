use crate::{
    auth::{CredentialHasher, TokenAuthority},
    lgd::users::find_by_email,
};
use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    Form, Json,
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, error, instrument};
use utoipa::ToSchema;

/// OAuth2 password grant form; `username` carries the email.
#[derive(ToSchema, Deserialize)]
pub struct TokenRequest {
    username: String,
    password: String,
}

impl std::fmt::Debug for TokenRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenRequest")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
}

fn invalid_credentials() -> Response {
    (StatusCode::BAD_REQUEST, "Invalid credentials".to_string()).into_response()
}

#[utoipa::path(
    post,
    path= "/token",
    request_body(content = TokenRequest, content_type = "application/x-www-form-urlencoded"),
    responses (
        (status = 200, description = "Login successful", body = AccessToken, content_type = "application/json"),
        (status = 400, description = "Missing payload or invalid credentials", body = String),
    ),
    tag= "auth"
)]
#[instrument(skip(pool, hasher, authority))]
pub async fn token(
    pool: Extension<PgPool>,
    hasher: Extension<CredentialHasher>,
    authority: Extension<Arc<TokenAuthority>>,
    payload: Option<Form<TokenRequest>>,
) -> Response {
    let request: TokenRequest = match payload {
        Some(Form(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    let email = request.username.trim().to_string();

    let user = match find_by_email(&pool, &email).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            debug!("User not found");
            return invalid_credentials();
        }
        Err(e) => {
            error!("Error getting user from database: {:?}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error getting user".to_string(),
            )
                .into_response();
        }
    };

    let hasher = *hasher;
    let password = request.password;
    let credential = user.hashed_password;
    let valid = match tokio::task::spawn_blocking(move || hasher.verify(&password, &credential))
        .await
    {
        Ok(valid) => valid,
        Err(e) => {
            error!("Password verification task failed: {e}");
            false
        }
    };

    if !valid {
        debug!("Password mismatch");
        return invalid_credentials();
    }

    match authority.issue(&user.email) {
        Ok(access_token) => {
            debug!("Login successful");

            (
                StatusCode::OK,
                Json(AccessToken {
                    access_token,
                    token_type: "bearer".to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => {
            error!("Error issuing token: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error issuing token".to_string(),
            )
                .into_response()
        }
    }
}
