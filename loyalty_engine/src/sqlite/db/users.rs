use log::debug;
use sqlx::SqliteConnection;

use crate::{db_types::User, traits::AuthApiError};

/// Inserts the user, returning `DuplicateLogin` if the login is already taken. The conflict
/// check rides on the primary key, so concurrent registrations of the same login produce exactly
/// one row.
pub async fn insert_user(login: &str, password_hash: &str, conn: &mut SqliteConnection) -> Result<(), AuthApiError> {
    let result = sqlx::query("INSERT INTO users (login, password_hash) VALUES ($1, $2) ON CONFLICT (login) DO NOTHING")
        .bind(login)
        .bind(password_hash)
        .execute(conn)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AuthApiError::DuplicateLogin);
    }
    debug!("🧑️ New user [{login}] registered");
    Ok(())
}

pub async fn fetch_user_by_login(login: &str, conn: &mut SqliteConnection) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as("SELECT login, password_hash, created_at FROM users WHERE login = $1")
        .bind(login)
        .fetch_optional(conn)
        .await?;
    Ok(user)
}
