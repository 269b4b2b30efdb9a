//! `users` table access.

use crate::auth::Credential;
use sqlx::{postgres::PgRow, PgPool, Row};

pub const SCHEMA_SQL: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/sql/schema.sql"));

#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub hashed_password: Credential,
}

impl User {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            hashed_password: Credential::from(row.try_get::<String, _>("hashed_password")?),
        })
    }
}

pub enum Insert {
    Created(i64),
    EmailTaken,
}

/// Create the `users` table if it does not exist yet.
///
/// # Errors
/// Returns the database error if the statement fails.
pub async fn apply_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(SCHEMA_SQL).execute(pool).await?;

    Ok(())
}

pub async fn user_exists(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
    let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1) AS exists")
        .bind(email)
        .fetch_one(pool)
        .await?;

    row.try_get("exists")
}

/// Insert a user, reporting a concurrent registration of the same email as
/// `Insert::EmailTaken`.
pub async fn insert_user(
    pool: &PgPool,
    name: &str,
    email: &str,
    hashed_password: &Credential,
) -> Result<Insert, sqlx::Error> {
    match sqlx::query(
        "INSERT INTO users (name, email, hashed_password) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(name)
    .bind(email)
    .bind(hashed_password.as_str())
    .fetch_one(pool)
    .await
    {
        Ok(row) => Ok(Insert::Created(row.try_get("id")?)),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Ok(Insert::EmailTaken),
        Err(e) => Err(e),
    }
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query("SELECT id, name, email, hashed_password FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?
        .as_ref()
        .map(User::from_row)
        .transpose()
}
