use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use log::debug;

use crate::{
    db_types::User,
    traits::{AuthApiError, AuthManagement},
};

/// `AuthApi` handles registration and credential verification.
///
/// Passwords never reach the storage layer in the clear: registration stores an argon2 PHC
/// string, and login verifies against it here.
#[derive(Debug, Clone)]
pub struct AuthApi<B> {
    db: B,
}

impl<B> AuthApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> AuthApi<B>
where B: AuthManagement
{
    /// Register a new user. Fails with `DuplicateLogin` if the login is taken.
    pub async fn register_user(&self, login: &str, password: &str) -> Result<(), AuthApiError> {
        let hash = hash_password(password)?;
        self.db.create_user(login, &hash).await?;
        debug!("🧑️ Registered user [{login}]");
        Ok(())
    }

    /// Verify the login/password pair, returning the user record on success and
    /// `InvalidCredentials` otherwise. An unknown login takes the same path as a wrong password.
    pub async fn authenticate(&self, login: &str, password: &str) -> Result<User, AuthApiError> {
        let user = self.db.fetch_user(login).await?.ok_or(AuthApiError::InvalidCredentials)?;
        if verify_password(password, &user.password_hash) {
            Ok(user)
        } else {
            debug!("🧑️ Failed login attempt for [{login}]");
            Err(AuthApiError::InvalidCredentials)
        }
    }
}

fn hash_password(password: &str) -> Result<String, AuthApiError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthApiError::PasswordHash(e.to_string()))?;
    Ok(hash.to_string())
}

fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
        .unwrap_or(false)
}
