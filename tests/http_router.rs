//! Router behaviour that does not need a live database: request validation,
//! bearer token rejection and health reporting against an unreachable pool.

#![allow(clippy::unwrap_used)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use lgd::auth::{CredentialHasher, SigningSecret, TokenAuthority};
use sqlx::postgres::PgPoolOptions;
use std::{sync::Arc, time::Duration};
use tower::ServiceExt;

fn app() -> Router {
    let pool = PgPoolOptions::new()
        .acquire_timeout(Duration::from_millis(500))
        .connect_lazy("postgres://lgd@127.0.0.1:1/lgd")
        .unwrap();
    let authority = TokenAuthority::new(&SigningSecret::ephemeral(), Duration::from_secs(60));

    lgd::lgd::router(pool, CredentialHasher::new(4).unwrap(), Arc::new(authority))
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn register(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn root_greets() {
    let response = app()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn request_id_is_propagated() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/")
                .header("x-request-id", "01J0000000000000000000TEST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "01J0000000000000000000TEST"
    );
}

#[tokio::test]
async fn me_without_token_is_unauthorized() {
    let response = app()
        .oneshot(Request::builder().uri("/me").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
        "Bearer"
    );
    assert_eq!(body_string(response).await, "Invalid token");
}

#[tokio::test]
async fn me_with_foreign_token_is_unauthorized() {
    let other = TokenAuthority::new(&SigningSecret::ephemeral(), Duration::from_secs(60));
    let token = other.issue("bob@x.com").unwrap();

    for authorization in [format!("Bearer {token}"), "Bearer garbage".to_string()] {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/me")
                    .header(header::AUTHORIZATION, authorization)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }
}

#[tokio::test]
async fn register_rejects_invalid_input_before_database() {
    let cases = [
        r#"{"name":"Bob","email":"bob@x.com","password":""}"#,
        r#"{"name":"Bob","email":"not-an-email","password":"s3cret"}"#,
        r#"{"name":"  ","email":"bob@x.com","password":"s3cret"}"#,
        r#"{"name":"Bob"}"#,
    ];

    for body in cases {
        let response = app().oneshot(register(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
    }
}

#[tokio::test]
async fn register_without_payload_is_bad_request() {
    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/register")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_string(response).await, "Missing payload");
}

#[tokio::test]
async fn token_without_form_is_bad_request() {
    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_reports_unreachable_database() {
    let response = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(response.headers().contains_key("X-App"));

    let health: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(health["database"], "error");
    assert_eq!(health["name"], "lgd");
}

#[tokio::test]
async fn health_options_has_empty_body() {
    let response = app()
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(body_string(response).await.is_empty());
}
