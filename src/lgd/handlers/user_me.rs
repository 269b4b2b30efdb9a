use crate::{
    auth::TokenAuthority,
    lgd::{
        handlers::{bearer_token, UserProfile},
        users::find_by_email,
    },
};
use axum::{
    extract::Extension,
    http::{header::WWW_AUTHENTICATE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, error, instrument};

fn invalid_token() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(WWW_AUTHENTICATE, "Bearer")],
        "Invalid token".to_string(),
    )
        .into_response()
}

#[utoipa::path(
    get,
    path= "/me",
    params(
        ("Authorization" = String, Header, description = "Bearer access token")
    ),
    responses (
        (status = 200, description = "Authenticated user", body = UserProfile, content_type = "application/json"),
        (status = 401, description = "Missing, invalid or expired token", body = String),
        (status = 404, description = "User not found", body = String),
    ),
    tag= "auth"
)]
#[instrument(skip_all)]
pub async fn me(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    authority: Extension<Arc<TokenAuthority>>,
) -> Response {
    let Some(token) = bearer_token(&headers) else {
        debug!("Missing bearer token");
        return invalid_token();
    };

    let Ok(email) = authority.verify(token) else {
        return invalid_token();
    };

    match find_by_email(&pool, &email).await {
        Ok(Some(user)) => (StatusCode::OK, Json(UserProfile::from(user))).into_response(),
        Ok(None) => {
            debug!("Token subject has no matching user");
            (StatusCode::NOT_FOUND, "User not found".to_string()).into_response()
        }
        Err(e) => {
            error!("Error getting user from database: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error getting user".to_string(),
            )
                .into_response()
        }
    }
}
