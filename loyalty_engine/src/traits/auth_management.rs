use thiserror::Error;

use crate::db_types::User;

#[derive(Debug, Error)]
pub enum AuthApiError {
    #[error("The login already exists")]
    DuplicateLogin,
    #[error("Login or password is incorrect")]
    InvalidCredentials,
    #[error("Could not hash the password. {0}")]
    PasswordHash(String),
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// User record storage. Credential *verification* is not part of the storage contract; the
/// backend only ever sees the password hash.
#[allow(async_fn_in_trait)]
pub trait AuthManagement {
    /// Create a new user. The insert is atomic: a concurrent registration of the same login
    /// results in exactly one row and a `DuplicateLogin` error for the loser.
    async fn create_user(&self, login: &str, password_hash: &str) -> Result<(), AuthApiError>;

    /// Fetch the user record for `login`, if it exists.
    async fn fetch_user(&self, login: &str) -> Result<Option<User>, AuthApiError>;
}
